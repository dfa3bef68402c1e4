use std::collections::HashSet;

use log::error;

use crate::results::outcome::ExecutionOutcome;

/// Check that every expected output file was actually retrieved
///
/// Extra retrieved files (error diagnostics caught by the glob entry) are
/// fine; missing expected files are not. Nothing is parsed when this fails.
pub fn reconcile(expected: &[String], retrieved: &[String]) -> Option<ExecutionOutcome> {
    let retrieved_set: HashSet<&str> = retrieved.iter().map(String::as_str).collect();
    let missing: Vec<&str> = expected
        .iter()
        .map(String::as_str)
        .filter(|name| !retrieved_set.contains(name))
        .collect();

    if missing.is_empty() {
        return None;
    }
    error!("Found files {retrieved:?}, expected to find {expected:?}");
    Some(ExecutionOutcome::MissingOutputFiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extra_retrieved_files_are_allowed() {
        let expected = names(&["log-X.yaml"]);
        let retrieved = names(&["log-X.yaml", "extra.txt"]);
        assert_eq!(reconcile(&expected, &retrieved), None);
    }

    #[test]
    fn missing_expected_file_is_reported() {
        let expected = names(&["log-X.yaml", "time.yaml"]);
        let retrieved = names(&["log-X.yaml"]);
        assert_eq!(
            reconcile(&expected, &retrieved),
            Some(ExecutionOutcome::MissingOutputFiles)
        );
    }

    #[test]
    fn empty_expectation_always_reconciles() {
        assert_eq!(reconcile(&[], &[]), None);
    }
}
