//! Stage BigDFT calculations for a batch scheduler and classify their results.
//!
//! The crate covers the two ends of a single job's lifecycle:
//!
//! - [`staging`] turns typed inputs (structure, parameters, job configuration)
//!   into a deterministic submission bundle: staged input files, the command
//!   line for the wrapped executable, and a retrieval manifest.
//! - [`results`] takes the scheduler's captured stderr and the retrieved
//!   output files and produces exactly one [`results::outcome::ExecutionOutcome`]
//!   plus typed artifact records.
//!
//! Everything in between (submission, polling, file transfer) belongs to the
//! external workflow engine.

use std::path::PathBuf;

pub mod job;
pub mod results;
pub mod staging;

/// A local directory where job files are staged before submission
pub struct WorkingDirectory {
    pub path: PathBuf,
}
