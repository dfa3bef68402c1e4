use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::results::outcome::ExecutionOutcome;

/// Walltime-limit messages, one per supported scheduler
///
/// Checked before the memory patterns: a job killed at its time limit often
/// drags OOM noise into stderr as well, and timeout must win.
static TIMEOUT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        "DUE TO TIME LIMIT",            // slurm
        "exceeded hard wallclock time", // UGE
        "TERM_RUNLIMIT: job killed",    // LSF
        "walltime .* exceeded limit",   // PBS/Torque
    ])
});

/// Memory-limit messages, schedulers plus the generic OOM killer
static OOM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        "[oO]ut [oO]f [mM]emory",
        "oom-kill", // generic OOM messages
        "Exceeded .* memory limit", // slurm
        "exceeds job hard limit .*mem.* of queue", // UGE
        "TERM_MEMLIMIT: job killed after reaching LSF memory usage limit", // LSF
        "mem .* exceeded limit", // PBS/Torque
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("Valid pattern"))
        .collect()
}

/// Scan captured scheduler stderr for known failure messages
///
/// First match wins. `None` means the stderr carries no scheduler-level
/// failure and the pipeline proceeds to reconciliation.
pub fn classify(stderr: &str) -> Option<ExecutionOutcome> {
    for pattern in TIMEOUT_PATTERNS.iter() {
        if pattern.is_match(stderr) {
            info!("Scheduler stderr matches timeout pattern '{pattern}'");
            return Some(ExecutionOutcome::Timeout);
        }
    }
    for pattern in OOM_PATTERNS.iter() {
        if pattern.is_match(stderr) {
            info!("Scheduler stderr matches out-of-memory pattern '{pattern}'");
            return Some(ExecutionOutcome::OutOfMemory);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slurm_time_limit_is_timeout() {
        let stderr = "slurmstepd: error: *** JOB 1234 CANCELLED AT 2023-01-01 DUE TO TIME LIMIT ***";
        assert_eq!(classify(stderr), Some(ExecutionOutcome::Timeout));
    }

    #[test]
    fn timeout_wins_over_later_oom_message() {
        let stderr = "job CANCELLED DUE TO TIME LIMIT\nkernel: oom-kill triggered\n";
        assert_eq!(classify(stderr), Some(ExecutionOutcome::Timeout));
    }

    #[test]
    fn oom_killer_is_out_of_memory() {
        let stderr = "Memory cgroup out of memory: oom-kill: constraint=CONSTRAINT_NONE";
        assert_eq!(classify(stderr), Some(ExecutionOutcome::OutOfMemory));
    }

    #[test]
    fn scheduler_specific_memory_messages_match() {
        for stderr in [
            "slurmstepd: error: Exceeded step memory limit at some point.",
            "job 42 exceeds job hard limit h_vmem 2G of queue all.q",
            "TERM_MEMLIMIT: job killed after reaching LSF memory usage limit",
            "=>> PBS: job killed: mem 9000mb exceeded limit 8192mb",
        ] {
            assert_eq!(
                classify(stderr),
                Some(ExecutionOutcome::OutOfMemory),
                "stderr: {stderr}"
            );
        }
    }

    #[test]
    fn scheduler_specific_walltime_messages_match() {
        for stderr in [
            "job 42 exceeded hard wallclock time limit",
            "TERM_RUNLIMIT: job killed after reaching LSF run time limit",
            "=>> PBS: job killed: walltime 3605 exceeded limit 3600",
        ] {
            assert_eq!(
                classify(stderr),
                Some(ExecutionOutcome::Timeout),
                "stderr: {stderr}"
            );
        }
    }

    #[test]
    fn clean_stderr_yields_no_classification() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("srun: job 1234 has finished"), None);
    }
}
