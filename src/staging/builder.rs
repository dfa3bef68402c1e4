use std::collections::BTreeMap;
use std::fmt;

use log::info;
use serde::Serialize;

use crate::job::config::{ConfigurationError, JobConfiguration, Resources, SubmissionMode};
use crate::job::parameters::SimulationParameters;
use crate::job::structure::StructureDescriptor;
use crate::staging::bundle::{
    log_filename, time_filename, RetrieveEntry, StagedFile, SubmissionBundle, PARAMETERS_FILE,
    STRUCTURE_FILE, SUBMISSION_FILE,
};

/// Resolved submission metadata serialized to `submission_parameters.yaml`
///
/// `OMP`, `mpi` and `nodes` are the counts the wrapped launcher script
/// actually consumes; the full resource record is echoed for provenance.
#[derive(Serialize)]
struct SubmissionParameters<'a> {
    jobname: &'a str,
    #[serde(rename = "OMP")]
    omp: Option<u32>,
    mpi: Option<u32>,
    nodes: u32,
    resources: &'a Resources,
    #[serde(rename = "mpirun command")]
    mpirun_command: String,
    connection: &'a BTreeMap<String, String>,
}

/// Build the submission bundle for one job
///
/// Pure in its inputs: nothing is written anywhere until the caller stages
/// the bundle, and neither the configuration nor any shared execution-target
/// state is ever mutated.
pub fn build(
    structure: &StructureDescriptor,
    parameters: &SimulationParameters,
    config: &JobConfiguration,
) -> Result<SubmissionBundle, BuildError> {
    config.validate()?;
    let jobname = &config.jobname;
    info!("Building submission bundle for job {jobname}");

    let structure_content = structure
        .to_json()
        .map_err(|err| BuildError::Serialise(err.to_string()))?;

    let params_content = parameters
        .to_yaml()
        .map_err(|err| BuildError::Serialise(err.to_string()))?;

    let submission = SubmissionParameters {
        jobname,
        omp: config.resources.num_cores_per_mpiproc,
        mpi: config.resources.tot_num_mpiprocs,
        nodes: config.resources.num_machines,
        resources: &config.resources,
        mpirun_command: config.mpirun_command.join(" "),
        connection: &config.connection,
    };
    let submission_content = serde_yaml::to_string(&submission)
        .map_err(|err| BuildError::Serialise(err.to_string()))?;

    let files = vec![
        StagedFile {
            filename: STRUCTURE_FILE.to_string(),
            content: structure_content,
        },
        StagedFile {
            filename: PARAMETERS_FILE.to_string(),
            content: params_content,
        },
        StagedFile {
            filename: SUBMISSION_FILE.to_string(),
            content: submission_content,
        },
    ];

    let mut cmdline = vec![
        "--structure".to_string(),
        STRUCTURE_FILE.to_string(),
        "--parameters".to_string(),
        PARAMETERS_FILE.to_string(),
    ];
    match config.submission_mode {
        SubmissionMode::SubmissionFile => {
            cmdline.push("--submission".to_string());
            cmdline.push(SUBMISSION_FILE.to_string());
        }
        SubmissionMode::JobnameInline => {
            cmdline.push("--jobname".to_string());
            cmdline.push(jobname.clone());
        }
    }

    let retrieve_list = vec![
        RetrieveEntry::File(log_filename(jobname)),
        RetrieveEntry::File(time_filename(jobname)),
        RetrieveEntry::Glob {
            pattern: "debug/bigdft-err*".to_string(),
            destination: ".".to_string(),
            max_depth: 2,
        },
    ];

    Ok(SubmissionBundle::new(files, cmdline, retrieve_list))
}

#[derive(Debug, PartialEq, Eq)]
pub enum BuildError {
    Config(ConfigurationError),
    Serialise(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildError::Config(err) => write!(f, "bad job configuration: {err}"),
            BuildError::Serialise(msg) => write!(f, "serialisation failed: {msg}"),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<ConfigurationError> for BuildError {
    fn from(err: ConfigurationError) -> Self {
        BuildError::Config(err)
    }
}
