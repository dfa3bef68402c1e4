use std::fmt;

/// Final classification of one finished job
///
/// Exactly one outcome per job. The integer codes are part of the contract
/// with the external engine, which keys retry/alert decisions on them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Timeout,
    OutOfMemory,
    MissingOutputFiles,
    ParseFailure,
}

impl ExecutionOutcome {
    /// Result code reported to the external engine
    pub fn code(&self) -> i32 {
        match self {
            ExecutionOutcome::Success => 0,
            ExecutionOutcome::MissingOutputFiles => 100,
            ExecutionOutcome::ParseFailure => 101,
            ExecutionOutcome::Timeout => 400,
            ExecutionOutcome::OutOfMemory => 401,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ExecutionOutcome::Success => "Calculation completed successfully.",
            ExecutionOutcome::MissingOutputFiles => {
                "Calculation did not produce all expected output files."
            }
            ExecutionOutcome::ParseFailure => "Calculation output could not be parsed.",
            ExecutionOutcome::Timeout => {
                "Calculation did not finish because of a walltime issue."
            }
            ExecutionOutcome::OutOfMemory => {
                "Calculation did not finish because of a memory limit."
            }
        }
    }

    /// Timeout and out-of-memory are terminal scheduler-level failures;
    /// nothing detected later may override them
    pub fn is_scheduler_failure(&self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Timeout | ExecutionOutcome::OutOfMemory
        )
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let outcomes = [
            ExecutionOutcome::Success,
            ExecutionOutcome::Timeout,
            ExecutionOutcome::OutOfMemory,
            ExecutionOutcome::MissingOutputFiles,
            ExecutionOutcome::ParseFailure,
        ];
        for a in &outcomes {
            for b in &outcomes {
                if a != b {
                    assert_ne!(a.code(), b.code());
                }
            }
        }
    }

    #[test]
    fn only_scheduler_failures_are_terminal() {
        assert!(ExecutionOutcome::Timeout.is_scheduler_failure());
        assert!(ExecutionOutcome::OutOfMemory.is_scheduler_failure());
        assert!(!ExecutionOutcome::MissingOutputFiles.is_scheduler_failure());
        assert!(!ExecutionOutcome::ParseFailure.is_scheduler_failure());
        assert!(!ExecutionOutcome::Success.is_scheduler_failure());
    }
}
