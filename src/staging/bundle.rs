use std::fs;
use std::io;

use log::{info, warn};

use crate::WorkingDirectory;

/// Fixed input filenames, stable across the whole job lifecycle
pub static STRUCTURE_FILE: &str = "structure.json";
pub static PARAMETERS_FILE: &str = "input.yaml";
pub static SUBMISSION_FILE: &str = "submission_parameters.yaml";

/// Primary log artifact produced by the run
pub fn log_filename(jobname: &str) -> String {
    format!("log-{jobname}.yaml")
}

/// Timing artifact, written under a per-job data subdirectory
pub fn time_filename(jobname: &str) -> String {
    format!("data-{jobname}/time-{jobname}.yaml")
}

/// One file staged into the working directory before submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub filename: String,
    pub content: String,
}

/// Retrieval manifest entry
///
/// Either a literal remote-relative filename, or a glob pattern with a
/// destination and a recursion depth bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrieveEntry {
    File(String),
    Glob {
        pattern: String,
        destination: String,
        max_depth: u32,
    },
}

/// Everything one job submission needs: staged files, the command line for
/// the wrapped executable, and the retrieval manifest
///
/// Built once per submission and immutable afterwards. The external engine
/// owns it until the remote run completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionBundle {
    files: Vec<StagedFile>,
    cmdline: Vec<String>,
    retrieve_list: Vec<RetrieveEntry>,
}

impl SubmissionBundle {
    pub(crate) fn new(
        files: Vec<StagedFile>,
        cmdline: Vec<String>,
        retrieve_list: Vec<RetrieveEntry>,
    ) -> Self {
        SubmissionBundle {
            files,
            cmdline,
            retrieve_list,
        }
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn cmdline(&self) -> &[String] {
        &self.cmdline
    }

    pub fn retrieve_list(&self) -> &[RetrieveEntry] {
        &self.retrieve_list
    }

    /// Named manifest entries that must exist after retrieval
    ///
    /// Glob entries are best-effort diagnostics and excluded here.
    pub fn expected_files(&self) -> Vec<String> {
        self.retrieve_list
            .iter()
            .filter_map(|entry| match entry {
                RetrieveEntry::File(name) => Some(name.clone()),
                RetrieveEntry::Glob { .. } => None,
            })
            .collect()
    }

    /// Write the staged files into `wd`
    ///
    /// The only side effect the bundle ever has, and it is confined to the
    /// caller-provided directory.
    pub fn stage(&self, wd: &WorkingDirectory) -> io::Result<()> {
        if wd.path.exists() {
            warn!(
                "Working directory {} already exists, files will be overwritten",
                wd.path.display()
            );
        } else {
            fs::create_dir_all(&wd.path)?;
        }
        for file in &self.files {
            let out_path = wd.path.join(&file.filename);
            info!("Writing {}", out_path.display());
            fs::write(out_path, &file.content)?;
        }
        Ok(())
    }
}
