//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Launchkit - Bootstrap a Python application's environment and keep it running.
#[derive(Debug, Parser)]
#[command(name = "launchkit")]
#[command(author, version, long_about = None)]
#[command(about = "Bootstrap a Python application's environment and keep it running")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .launchkit/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bootstrap the environment and launch the application (default)
    Run(RunArgs),

    /// Report interpreter, environment and dependency state without changing anything
    Status(StatusArgs),

    /// Show recent run log entries
    History(HistoryArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Answer prompts from LAUNCHKIT_PROMPT_* variables or their defaults
    #[arg(long)]
    pub non_interactive: bool,

    /// Launch once and exit instead of offering a restart
    #[arg(long)]
    pub once: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `history` command.
#[derive(Debug, Clone, clap::Args)]
pub struct HistoryArgs {
    /// Number of log lines to show
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

impl Default for HistoryArgs {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_describes_the_tool() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("Bootstrap a Python application"));
    }

    #[test]
    fn no_subcommand_is_none() {
        let cli = Cli::parse_from(["launchkit"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_flags() {
        let cli = Cli::parse_from(["launchkit", "run", "--non-interactive", "--once"]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.non_interactive);
                assert!(args.once);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["launchkit", "status", "--json", "--project", "/srv/app"]);
        assert_eq!(cli.project, Some(PathBuf::from("/srv/app")));
        assert!(matches!(cli.command, Some(Commands::Status(StatusArgs { json: true }))));
    }

    #[test]
    fn history_limit_defaults_to_twenty() {
        let cli = Cli::parse_from(["launchkit", "history"]);
        match cli.command {
            Some(Commands::History(args)) => assert_eq!(args.limit, 20),
            other => panic!("expected history, got {:?}", other),
        }
        let cli = Cli::parse_from(["launchkit", "history", "-n", "5"]);
        assert!(matches!(cli.command, Some(Commands::History(HistoryArgs { limit: 5 }))));
    }
}
