//! History command implementation.
//!
//! `launchkit history` prints the tail of the run log.

use std::path::{Path, PathBuf};

use crate::cli::args::HistoryArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::state::RunLog;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The history command implementation.
pub struct HistoryCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: HistoryArgs,
}

impl HistoryCommand {
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: HistoryArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    pub fn args(&self) -> &HistoryArgs {
        &self.args
    }
}

impl Command for HistoryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let log = RunLog::at(config.log_path());
        let lines = log.tail(self.args.limit)?;

        if lines.is_empty() {
            ui.message(&format!("No runs recorded in {}", log.path().display()));
            return Ok(CommandResult::success());
        }

        for line in &lines {
            if line.contains("] ERROR ") {
                ui.error(line);
            } else if line.contains("] WARN ") {
                ui.warning(line);
            } else {
                ui.message(line);
            }
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn empty_log_says_so() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        HistoryCommand::new(temp.path(), None, HistoryArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("No runs recorded"));
    }

    #[test]
    fn routes_lines_by_level_and_honours_limit() {
        let temp = TempDir::new().unwrap();
        let log = RunLog::open(temp.path().join("logs/launcher.log")).unwrap();
        log.info("first").unwrap();
        log.info("bootstrap started").unwrap();
        log.warn("compatibility warning overridden").unwrap();
        log.error("Dependency manifest not found").unwrap();
        let mut ui = MockUI::new();

        HistoryCommand::new(temp.path(), None, HistoryArgs { limit: 3 })
            .execute(&mut ui)
            .unwrap();

        assert!(!ui.has_message("first"));
        assert!(ui.has_message("bootstrap started"));
        assert!(ui.has_warning("compatibility warning overridden"));
        assert!(ui.has_error("Dependency manifest not found"));
    }
}
