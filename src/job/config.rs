use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How submission metadata is passed to the wrapped executable
///
/// Earlier plugin versions diverged into near-identical variants here; the
/// difference is now a configuration option instead of a separate code path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum SubmissionMode {
    /// Reference the staged `submission_parameters.yaml` with `--submission`
    SubmissionFile,
    /// Pass `--jobname` directly; the metadata file is still staged
    JobnameInline,
}

/// Scheduler resource counts for one job
///
/// Optional counts resolve to `null` in the submission metadata when unset.
/// That is a defined "unspecified" state the wrapped executable understands,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub num_machines: u32,
    pub num_mpiprocs_per_machine: Option<u32>,
    pub tot_num_mpiprocs: Option<u32>,
    pub num_cores_per_mpiproc: Option<u32>,
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            num_machines: 1,
            num_mpiprocs_per_machine: Some(1),
            tot_num_mpiprocs: Some(1),
            num_cores_per_mpiproc: None,
        }
    }
}

/// Immutable configuration for one job submission
///
/// `mpirun_command` and `connection` are snapshots of the execution target
/// taken by the caller. The builder only reads them; adjusting the target's
/// shared preferred command as a side effect of staging a job is exactly the
/// hazard this type exists to rule out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfiguration {
    pub jobname: String,
    pub resources: Resources,
    pub local_dir: Option<PathBuf>,
    pub mpirun_command: Vec<String>,
    pub connection: BTreeMap<String, String>,
    pub submission_mode: SubmissionMode,
}

impl JobConfiguration {
    pub fn new(jobname: &str) -> Self {
        JobConfiguration {
            jobname: jobname.to_string(),
            resources: Resources::default(),
            local_dir: None,
            mpirun_command: vec!["mpirun".to_string()],
            connection: BTreeMap::new(),
            submission_mode: SubmissionMode::SubmissionFile,
        }
    }

    /// Check invariants the builder relies on
    ///
    /// The jobname ends up in retrieval manifest paths, so it must be safe to
    /// use as a path component.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.jobname.is_empty() {
            return Err(ConfigurationError::EmptyJobName);
        }
        if !self
            .jobname
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(ConfigurationError::UnsafeJobName(self.jobname.clone()));
        }
        if self.resources.num_machines == 0 {
            return Err(ConfigurationError::ZeroResource("num_machines"));
        }
        for (key, count) in [
            (
                "num_mpiprocs_per_machine",
                self.resources.num_mpiprocs_per_machine,
            ),
            ("tot_num_mpiprocs", self.resources.tot_num_mpiprocs),
            ("num_cores_per_mpiproc", self.resources.num_cores_per_mpiproc),
        ] {
            if count == Some(0) {
                return Err(ConfigurationError::ZeroResource(key));
            }
        }
        if self.mpirun_command.is_empty() {
            return Err(ConfigurationError::MissingMpirunCommand);
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    EmptyJobName,
    UnsafeJobName(String),
    ZeroResource(&'static str),
    MissingMpirunCommand,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigurationError::EmptyJobName => write!(f, "jobname must not be empty"),
            ConfigurationError::UnsafeJobName(name) => {
                write!(f, "jobname '{name}' is not filesystem-safe")
            }
            ConfigurationError::ZeroResource(key) => {
                write!(f, "resource count '{key}' must be a positive integer")
            }
            ConfigurationError::MissingMpirunCommand => {
                write!(f, "mpirun command must not be empty")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
