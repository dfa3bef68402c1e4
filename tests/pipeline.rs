//! End-to-end lifecycle tests: build a bundle, stage it, then classify the
//! (simulated) retrieved results.

use std::fs;

use bigdft_stager::job::config::JobConfiguration;
use bigdft_stager::job::parameters::{PassThrough, SimulationParameters};
use bigdft_stager::job::structure::StructureDescriptor;
use bigdft_stager::results::outcome::ExecutionOutcome;
use bigdft_stager::results::parse::{
    analyze, ExpectedOutputs, RetrievedFiles, LOGFILE_KEY, TIMEFILE_KEY,
};
use bigdft_stager::staging::builder::build;
use bigdft_stager::WorkingDirectory;

fn tio2_structure() -> StructureDescriptor {
    let alat = 4.0;
    let mut s = StructureDescriptor::cubic(alat);
    s.append_atom("Ti", [alat / 2.0, alat / 2.0, alat / 2.0]);
    s.append_atom("O", [alat / 2.0, alat / 2.0, 0.0]);
    s.append_atom("O", [alat / 2.0, 0.0, alat / 2.0]);
    s
}

fn lda_parameters() -> SimulationParameters {
    let mapping =
        serde_yaml::from_str("dft:\n  ixc: LDA\n  itermax: 5\noutput:\n  orbitals: binary\n")
            .expect("valid yaml");
    SimulationParameters::new(mapping, &PassThrough).expect("pass-through accepts anything")
}

fn t1_config() -> JobConfiguration {
    let mut config = JobConfiguration::new("T1");
    config.resources.num_machines = 1;
    config.resources.num_mpiprocs_per_machine = None;
    config.resources.tot_num_mpiprocs = Some(4);
    config
}

const LOG_YAML: &str = "Energy (Hartree): -17.243\nWalltime since initialization: 98.2\n";
const TIME_YAML: &str = "WFN_OPT:\n  Classes:\n    Communications: [12.3, 40.1]\n";

#[test]
fn staged_bundle_lands_on_disk() {
    let bundle = build(&tio2_structure(), &lda_parameters(), &t1_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let wd = WorkingDirectory {
        path: dir.path().to_path_buf(),
    };
    bundle.stage(&wd).unwrap();

    for name in ["structure.json", "input.yaml", "submission_parameters.yaml"] {
        assert!(wd.path.join(name).is_file(), "missing staged file {name}");
    }

    // the staged parameter file round-trips to the declared parameters
    let staged = fs::read_to_string(wd.path.join("input.yaml")).unwrap();
    assert_eq!(
        SimulationParameters::from_yaml(&staged).unwrap(),
        lda_parameters()
    );
}

#[test]
fn successful_run_yields_two_artifacts() {
    let bundle = build(&tio2_structure(), &lda_parameters(), &t1_config()).unwrap();

    let mut retrieved = RetrievedFiles::default();
    retrieved.insert("log-T1.yaml", LOG_YAML);
    retrieved.insert("data-T1/time-T1.yaml", TIME_YAML);
    let mut expected_names = bundle.expected_files();
    expected_names.sort();
    assert_eq!(expected_names, retrieved.names());

    let result = analyze("", &ExpectedOutputs::for_job("T1"), &retrieved);
    assert_eq!(result.outcome, ExecutionOutcome::Success);
    assert_eq!(result.outcome.code(), 0);

    let keys: Vec<&str> = result.artifacts.keys().map(String::as_str).collect();
    assert_eq!(keys, [LOGFILE_KEY, TIMEFILE_KEY]);
}

#[test]
fn missing_timefile_is_reported_before_parsing() {
    let mut retrieved = RetrievedFiles::default();
    retrieved.insert("log-T1.yaml", LOG_YAML);

    let result = analyze("", &ExpectedOutputs::for_job("T1"), &retrieved);
    assert_eq!(result.outcome, ExecutionOutcome::MissingOutputFiles);
    assert_eq!(result.outcome.code(), 100);
    assert!(result.artifacts.is_empty());
}

#[test]
fn oom_stderr_overrides_complete_retrieval() {
    let mut retrieved = RetrievedFiles::default();
    retrieved.insert("log-T1.yaml", LOG_YAML);
    retrieved.insert("data-T1/time-T1.yaml", TIME_YAML);

    let stderr = "kernel: oom-kill:constraint=CONSTRAINT_NONE,task=bigdft";
    let result = analyze(stderr, &ExpectedOutputs::for_job("T1"), &retrieved);
    assert_eq!(result.outcome, ExecutionOutcome::OutOfMemory);
    assert_eq!(result.outcome.code(), 401);
    assert!(result.artifacts.is_empty());
}

#[test]
fn retrieved_tree_loads_with_remote_relative_names() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("log-T1.yaml"), LOG_YAML).unwrap();
    fs::create_dir(dir.path().join("data-T1")).unwrap();
    fs::write(dir.path().join("data-T1").join("time-T1.yaml"), TIME_YAML).unwrap();

    let retrieved = RetrievedFiles::from_dir(dir.path()).unwrap();
    assert_eq!(
        retrieved.names(),
        ["data-T1/time-T1.yaml", "log-T1.yaml"]
    );

    let result = analyze("", &ExpectedOutputs::for_job("T1"), &retrieved);
    assert_eq!(result.outcome, ExecutionOutcome::Success);
}
