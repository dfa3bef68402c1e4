//! Classify scheduler failures and parse retrieved output artifacts
//!
//! Runs strictly after the remote process terminated, on the captured stderr
//! and the retrieved file set. Stages short-circuit in strength order:
//! timeout / out-of-memory end the pipeline before reconciliation, missing
//! files end it before parsing, and per-artifact parse failures only
//! downgrade the outcome when nothing harder was detected.

/// Enumerated job outcomes with stable result codes
pub mod outcome;

/// Pattern-based failure detection on scheduler stderr
pub mod classify;

/// Verify the retrieved file set against the retrieval manifest
pub mod reconcile;

/// Typed wrappers around retrieved YAML artifacts
pub mod artifacts;

/// The classify → reconcile → parse pipeline
pub mod parse;
