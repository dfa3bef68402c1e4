use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use bigdft_stager::job::config::{JobConfiguration, SubmissionMode};
use bigdft_stager::job::parameters::{
    ParameterValidator, PassThrough, SchemaValidator, SimulationParameters,
};
use bigdft_stager::job::structure::StructureDescriptor;
use bigdft_stager::results::parse::{analyze, ExpectedOutputs, RetrievedFiles};
use bigdft_stager::staging::builder::build;
use bigdft_stager::WorkingDirectory;

#[derive(Parser)]
#[command(
    name = "bigdft-stager",
    about = "Stage BigDFT jobs for a batch scheduler and classify their results"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a submission bundle and write it into a working directory
    Stage {
        /// Structure descriptor (JSON)
        #[arg(long)]
        structure: PathBuf,
        /// BigDFT input parameters (YAML mapping); empty mapping when omitted
        #[arg(long)]
        parameters: Option<PathBuf>,
        #[arg(long)]
        jobname: String,
        /// Directory the staged files are written into
        #[arg(long)]
        work_dir: PathBuf,
        #[arg(long, default_value_t = 1)]
        num_machines: u32,
        #[arg(long)]
        num_mpiprocs_per_machine: Option<u32>,
        #[arg(long)]
        tot_num_mpiprocs: Option<u32>,
        #[arg(long)]
        num_cores_per_mpiproc: Option<u32>,
        /// Launcher invocation, e.g. "srun --mpi=pmi2"
        #[arg(long, default_value = "mpirun")]
        mpirun: String,
        #[arg(long, value_enum, default_value_t = SubmissionMode::SubmissionFile)]
        submission_mode: SubmissionMode,
        /// Validate parameters against the bundled JSON schema
        #[arg(long)]
        validate: bool,
    },
    /// Classify a finished job from captured stderr and retrieved files
    Classify {
        #[arg(long)]
        jobname: String,
        /// Captured scheduler stderr; treated as empty when omitted
        #[arg(long)]
        stderr: Option<PathBuf>,
        /// Directory holding the retrieved output tree
        #[arg(long)]
        retrieved_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        // outcome codes are wider than a unix exit status, so the code is
        // printed by `run` and clamped here
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Stage {
            structure,
            parameters,
            jobname,
            work_dir,
            num_machines,
            num_mpiprocs_per_machine,
            tot_num_mpiprocs,
            num_cores_per_mpiproc,
            mpirun,
            submission_mode,
            validate,
        } => {
            let structure_text = fs::read_to_string(&structure)
                .with_context(|| format!("can't read structure {}", structure.display()))?;
            let structure = StructureDescriptor::from_json(&structure_text)
                .context("can't parse structure descriptor")?;

            let validator: Box<dyn ParameterValidator> = match validate {
                true => Box::new(SchemaValidator::bundled()),
                false => Box::new(PassThrough),
            };
            let params = match parameters {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("can't read parameters {}", path.display()))?;
                    let raw = SimulationParameters::from_yaml(&text)?;
                    SimulationParameters::new(raw.mapping().clone(), validator.as_ref())?
                }
                None => SimulationParameters::empty(),
            };

            let mut config = JobConfiguration::new(&jobname);
            config.resources.num_machines = num_machines;
            config.resources.num_mpiprocs_per_machine = num_mpiprocs_per_machine;
            config.resources.tot_num_mpiprocs = tot_num_mpiprocs;
            config.resources.num_cores_per_mpiproc = num_cores_per_mpiproc;
            config.mpirun_command = mpirun.split_whitespace().map(str::to_string).collect();
            config.submission_mode = submission_mode;
            config.local_dir = Some(work_dir.clone());

            let bundle = build(&structure, &params, &config)?;
            bundle.stage(&WorkingDirectory { path: work_dir })?;

            info!("Command line: {}", bundle.cmdline().join(" "));
            for name in bundle.expected_files() {
                info!("Will retrieve {name}");
            }
            Ok(0)
        }
        Command::Classify {
            jobname,
            stderr,
            retrieved_dir,
        } => {
            let stderr_text = match stderr {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("can't read stderr {}", path.display()))?,
                None => String::new(),
            };
            let expected = ExpectedOutputs::for_job(&jobname);
            let retrieved = RetrievedFiles::from_dir(&retrieved_dir).with_context(|| {
                format!("can't load retrieved files from {}", retrieved_dir.display())
            })?;

            let result = analyze(&stderr_text, &expected, &retrieved);
            println!("{}", result.outcome);
            for (key, artifact) in &result.artifacts {
                println!("{key}: {}", artifact.filename());
            }
            Ok(result.outcome.code())
        }
    }
}
