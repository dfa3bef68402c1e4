use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use log::{error, info};
use walkdir::WalkDir;

use crate::results::artifacts::{ArtifactFile, LogArtifact, ParsedArtifact};
use crate::results::classify::classify;
use crate::results::outcome::ExecutionOutcome;
use crate::results::reconcile::reconcile;
use crate::staging::bundle::{log_filename, time_filename};

/// Output keys handed back to the external engine
pub static LOGFILE_KEY: &str = "logfile";
pub static TIMEFILE_KEY: &str = "timefile";

/// The output files one job is expected to produce, named by jobname
pub struct ExpectedOutputs {
    pub logfile: String,
    pub timefile: String,
}

impl ExpectedOutputs {
    pub fn for_job(jobname: &str) -> Self {
        ExpectedOutputs {
            logfile: log_filename(jobname),
            timefile: time_filename(jobname),
        }
    }

    pub fn names(&self) -> Vec<String> {
        vec![self.logfile.clone(), self.timefile.clone()]
    }
}

/// Retrieved file contents keyed by remote-relative path
#[derive(Debug, Default)]
pub struct RetrievedFiles {
    files: BTreeMap<String, String>,
}

impl RetrievedFiles {
    pub fn insert(&mut self, name: &str, content: &str) {
        self.files.insert(name.to_string(), content.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// Load a retrieved output tree from a local directory
    ///
    /// Keys are paths relative to `dir`, with `/` separators, matching the
    /// remote-relative names in the retrieval manifest.
    pub fn from_dir(dir: &Path) -> io::Result<Self> {
        let mut retrieved = RetrievedFiles::default();
        for entry in WalkDir::new(dir).min_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(dir)
                .expect("walkdir stays under its root");
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            info!("Loading retrieved file {name}");
            retrieved.insert(&name, &fs::read_to_string(entry.path())?);
        }
        Ok(retrieved)
    }
}

/// One job's final classification plus whatever artifacts parsed cleanly
#[derive(Debug)]
pub struct JobResult {
    pub outcome: ExecutionOutcome,
    pub artifacts: BTreeMap<String, ParsedArtifact>,
}

impl JobResult {
    fn bare(outcome: ExecutionOutcome) -> Self {
        JobResult {
            outcome,
            artifacts: BTreeMap::new(),
        }
    }
}

/// Run the full post-execution pipeline: classify, reconcile, parse
///
/// Stages short-circuit in strength order. A scheduler-level failure ends
/// the job before reconciliation; a missing file ends it before parsing; a
/// parse failure on one artifact does not stop the next artifact but caps
/// the outcome at `ParseFailure`. Every failure path returns an enumerated
/// outcome; nothing panics out of here.
pub fn analyze(stderr: &str, expected: &ExpectedOutputs, retrieved: &RetrievedFiles) -> JobResult {
    if !stderr.is_empty() {
        if let Some(outcome) = classify(stderr) {
            error!("Error in stderr: {}", outcome.message());
            return JobResult::bare(outcome);
        }
    }

    if let Some(outcome) = reconcile(&expected.names(), &retrieved.names()) {
        return JobResult::bare(outcome);
    }

    let mut artifacts = BTreeMap::new();
    let mut parse_failed = false;

    match parse_log(&expected.logfile, retrieved) {
        Ok(log) => {
            artifacts.insert(LOGFILE_KEY.to_string(), ParsedArtifact::Log(log));
        }
        Err(()) => parse_failed = true,
    }
    match parse_generic(&expected.timefile, retrieved) {
        Ok(file) => {
            artifacts.insert(TIMEFILE_KEY.to_string(), ParsedArtifact::File(file));
        }
        Err(()) => parse_failed = true,
    }

    let outcome = if parse_failed {
        ExecutionOutcome::ParseFailure
    } else {
        ExecutionOutcome::Success
    };
    info!("Job finished with outcome {outcome}");
    JobResult { outcome, artifacts }
}

fn parse_log(name: &str, retrieved: &RetrievedFiles) -> Result<LogArtifact, ()> {
    let text = retrieved.get(name).ok_or(())?;
    LogArtifact::parse(name, text).map_err(|err| {
        error!("Impossible to parse logfile: {err}");
    })
}

fn parse_generic(name: &str, retrieved: &RetrievedFiles) -> Result<ArtifactFile, ()> {
    let text = retrieved.get(name).ok_or(())?;
    ArtifactFile::parse(name, text).map_err(|err| {
        error!("Impossible to parse timefile: {err}");
    })
}
