//! Library integration tests.

use launchkit::LaunchkitError;

#[test]
fn error_types_are_public() {
    let err = LaunchkitError::EntryPointNotFound {
        path: "main.py".into(),
    };
    assert!(err.to_string().contains("main.py"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> launchkit::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use launchkit::cli::{Cli, Commands};

    let cli = Cli::parse_from(["launchkit", "status", "--json"]);
    if let Some(Commands::Status(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Status command");
    }
}

#[test]
fn manifest_and_snapshot_work_together() {
    use launchkit::dependencies::{parse_manifest, unsatisfied, InstalledPackageSet};

    let specs = parse_manifest("Flask>=3\nrequests\nPillow\n");
    let installed = InstalledPackageSet::from_freeze("flask==3.0.0\npillow==10.2.0\n");

    let missing: Vec<&str> = unsatisfied(&specs, &installed)
        .into_iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(missing, vec!["requests"]);
}

#[test]
fn compatibility_policy_is_configurable() {
    use launchkit::interpreter::{CompatibilityPolicy, InterpreterInfo, PolicyAction};

    let policy: CompatibilityPolicy = serde_yaml::from_str(
        "- max: \"3.8.0\"\n  action: block\n  reason: too old\n",
    )
    .unwrap();

    assert_eq!(
        policy.evaluate(&InterpreterInfo::new(3, 7, 9)).action,
        PolicyAction::Block
    );
    assert_eq!(
        policy.evaluate(&InterpreterInfo::new(3, 12, 0)).action,
        PolicyAction::Allow
    );
}

#[test]
fn run_log_round_trips_through_disk() {
    use launchkit::state::RunLog;

    let temp = tempfile::TempDir::new().unwrap();
    let log = RunLog::open(temp.path().join("logs/launcher.log")).unwrap();
    log.info("bootstrap started").unwrap();
    log.warn("Could not list installed packages").unwrap();

    let lines = log.tail(10).unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("INFO bootstrap started"));
    assert!(lines[1].contains("] WARN "));
}
