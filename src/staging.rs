//! Build submission bundles and stage them into a working directory

/// Assemble a bundle from typed inputs
pub mod builder;

/// Staged files, command line, and retrieval manifest
pub mod bundle;
