//! Typed inputs for one BigDFT job

/// Job configuration: name, resources, and execution-target snapshot
pub mod config;

/// Validated simulation parameter mappings
pub mod parameters;

/// Atomic structure read by the submission builder
pub mod structure;
