//! End-to-end bootstrap passes against a mocked toolchain.

use launchkit::bootstrap::{BootstrapOutcome, BootstrapPipeline};
use launchkit::config::{LaunchConfig, ModuleSpec};
use launchkit::interpreter::{InterpreterAcquirer, COMPAT_PROMPT_KEY};
use launchkit::launch::RESTART_PROMPT_KEY;
use launchkit::state::RunLog;
use launchkit::toolchain::{MockToolchain, ToolCall};
use launchkit::ui::{MockUI, UserInterface};
use std::fs;
use tempfile::TempDir;

struct NoAcquirer;

impl InterpreterAcquirer for NoAcquirer {
    fn acquire(&self, _ui: &mut dyn UserInterface) -> launchkit::Result<()> {
        Err(anyhow::anyhow!("no installer configured").into())
    }
}

/// Stands in for a real installer by registering an interpreter.
struct InstallsPython<'a>(&'a MockToolchain);

impl InterpreterAcquirer for InstallsPython<'_> {
    fn acquire(&self, ui: &mut dyn UserInterface) -> launchkit::Result<()> {
        ui.message("Installing Python 3.12.4");
        self.0.add_interpreter("python3", "3.12.4");
        Ok(())
    }
}

fn setup_project(manifest: &str) -> (TempDir, LaunchConfig) {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("requirements.txt"), manifest).unwrap();
    fs::write(temp.path().join("main.py"), "print('ready')\n").unwrap();
    let mut config = LaunchConfig::for_project(temp.path());
    config.critical_modules = vec![
        ModuleSpec::new("environment files", "dotenv", Some("python-dotenv")),
        ModuleSpec::new("numerics", "numpy", None),
    ];
    (temp, config)
}

fn log_lines(config: &LaunchConfig) -> Vec<String> {
    RunLog::at(config.log_path()).tail(200).unwrap()
}

#[test]
fn fresh_project_bootstraps_and_launches() {
    let (_temp, config) = setup_project("requests\nrequests-toolbelt==1.0.0\nflask>=3\n");
    let tools = MockToolchain::new()
        .with_interpreter("python3", "3.12.1")
        .with_installed("requests==2.31.0")
        .with_installed("requests-toolbelt==1.0.0")
        .with_importable("numpy")
        .with_installable("python-dotenv", "dotenv");
    let mut ui = MockUI::new();

    let outcome = BootstrapPipeline::new(&config, &tools, &NoAcquirer)
        .unwrap()
        .run(&mut ui)
        .unwrap();

    match outcome {
        BootstrapOutcome::Completed(report) => {
            assert_eq!(report.runs(), 1);
            assert!(report.outcomes[0].is_normal());
        }
        other => panic!("expected completed pass, got {:?}", other),
    }
    assert_eq!(tools.create_calls(), 1);
    assert_eq!(tools.bulk_install_calls(), 1);
    assert_eq!(tools.installed_packages(), vec!["python-dotenv"]);
    assert_eq!(tools.launch_calls(), 1);
    assert_eq!(ui.prompts_shown(), &[RESTART_PROMPT_KEY]);
    assert!(ui.has_success("Application exited normally"));

    let lines = log_lines(&config);
    assert!(lines.iter().any(|l| l.contains("dependencies installed (missing: flask)")));
    assert!(lines.iter().any(|l| l.contains("launch finished: exit=0 class=normal")));
    assert!(lines.iter().any(|l| l.contains("session ended after 1 run(s)")));
}

#[test]
fn second_pass_reuses_everything() {
    let (_temp, config) = setup_project("flask\n");
    let tools = MockToolchain::new()
        .with_interpreter("python3", "3.12.1")
        .with_importable("numpy")
        .with_installable("python-dotenv", "dotenv");

    for _ in 0..2 {
        let mut ui = MockUI::new();
        BootstrapPipeline::new(&config, &tools, &NoAcquirer)
            .unwrap()
            .once(true)
            .run(&mut ui)
            .unwrap();
    }

    assert_eq!(tools.create_calls(), 1);
    assert_eq!(tools.bulk_install_calls(), 1);
    assert_eq!(tools.installed_packages(), vec!["python-dotenv"]);
    assert_eq!(tools.launch_calls(), 2);

    let lines = log_lines(&config);
    assert_eq!(
        lines.iter().filter(|l| l.contains("INFO bootstrap started")).count(),
        2
    );
    assert!(lines.iter().any(|l| l.contains("dependencies satisfied")));
}

#[test]
fn missing_interpreter_is_acquired_then_used() {
    let (_temp, config) = setup_project("flask\n");
    let tools = MockToolchain::new()
        .with_importable("numpy")
        .with_importable("dotenv");
    let acquirer = InstallsPython(&tools);
    let mut ui = MockUI::new();

    BootstrapPipeline::new(&config, &tools, &acquirer)
        .unwrap()
        .once(true)
        .run(&mut ui)
        .unwrap();

    assert!(ui.has_warning("No Python interpreter found"));
    assert!(ui.has_message("Installing Python 3.12.4"));
    assert!(ui.has_success("Python 3.12.4 (python3)"));
    assert_eq!(tools.launch_calls(), 1);
}

#[test]
fn warned_interpreter_can_be_overridden() {
    let (_temp, config) = setup_project("flask\n");
    let tools = MockToolchain::new()
        .with_interpreter("python3", "3.13.1")
        .with_importable("numpy")
        .with_importable("dotenv");
    let mut ui = MockUI::new();
    ui.set_prompt_response(COMPAT_PROMPT_KEY, "yes");

    BootstrapPipeline::new(&config, &tools, &NoAcquirer)
        .unwrap()
        .once(true)
        .run(&mut ui)
        .unwrap();

    assert_eq!(ui.prompts_shown(), &[COMPAT_PROMPT_KEY]);
    assert_eq!(tools.launch_calls(), 1);
    let lines = log_lines(&config);
    assert!(lines
        .iter()
        .any(|l| l.contains("WARN compatibility warning overridden for Python 3.13.1")));
}

#[test]
fn declined_warning_touches_nothing() {
    let (temp, config) = setup_project("flask\n");
    let tools = MockToolchain::new().with_interpreter("python3", "3.13.0");
    let mut ui = MockUI::new();

    let outcome = BootstrapPipeline::new(&config, &tools, &NoAcquirer)
        .unwrap()
        .run(&mut ui)
        .unwrap();

    assert!(matches!(outcome, BootstrapOutcome::UserAborted));
    assert!(!temp.path().join(".venv").exists());
    assert!(!tools
        .calls()
        .iter()
        .any(|c| matches!(c, ToolCall::CreateEnvironment(_) | ToolCall::Launch(_))));
}

#[test]
fn unrepairable_module_warns_and_still_launches() {
    let (_temp, config) = setup_project("flask\n");
    let tools = MockToolchain::new()
        .with_interpreter("python3", "3.12.1")
        .with_importable("dotenv");
    let mut ui = MockUI::new();

    BootstrapPipeline::new(&config, &tools, &NoAcquirer)
        .unwrap()
        .once(true)
        .run(&mut ui)
        .unwrap();

    assert!(ui.has_warning("numpy"));
    assert_eq!(tools.installed_packages(), vec!["numpy"]);
    assert_eq!(tools.launch_calls(), 1);
    let lines = log_lines(&config);
    assert!(lines.iter().any(|l| l.contains("WARN Could not repair")));
}

#[test]
fn fatal_error_is_logged_and_stops_the_pass() {
    let (_temp, config) = setup_project("flask\n");
    let tools = MockToolchain::new()
        .with_interpreter("python3", "3.12.1")
        .with_bulk_install_failure();
    let mut ui = MockUI::new();

    let err = BootstrapPipeline::new(&config, &tools, &NoAcquirer)
        .unwrap()
        .run(&mut ui)
        .unwrap_err();

    assert!(matches!(err, launchkit::LaunchkitError::BulkInstallFailed { .. }));
    assert_eq!(tools.launch_calls(), 0);
    let lines = log_lines(&config);
    assert!(lines.last().unwrap().contains("ERROR Dependency installation"));
}
