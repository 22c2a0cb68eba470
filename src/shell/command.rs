//! External command execution.
//!
//! Every interpreter, pip and application invocation goes through
//! [`execute`]. Commands are spawned directly (no intermediate shell) so that
//! paths containing spaces survive intact on every platform.

use crate::error::{LaunchkitError, Result};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Captured stdout followed by stderr, trimmed.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.trim().to_string();
        let err = self.stderr.trim();
        if !err.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(err);
        }
        out
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

impl CommandOptions {
    /// Options that capture both output streams.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }

    /// Options that let the child write straight to the terminal.
    pub fn inherited() -> Self {
        Self::default()
    }
}

/// Render a program and its arguments for messages and logs.
pub fn display_command<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(
        args.iter()
            .map(|a| AsRef::<OsStr>::as_ref(a).to_string_lossy().into_owned()),
    );
    parts.join(" ")
}

/// Execute a program with arguments.
///
/// Returns `Err(CommandFailed)` only when the program cannot be spawned at
/// all. A program that runs and exits non-zero yields `Ok` with
/// `success == false`.
pub fn execute<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    options: &CommandOptions,
) -> Result<CommandResult> {
    let start = Instant::now();
    let rendered = display_command(program, args);
    tracing::debug!("Executing: {}", rendered);

    let mut cmd = Command::new(program);
    cmd.args(args);

    // Set working directory
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    // Set environment
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::inherit());

    // Configure stdio
    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    // Execute
    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to spawn {}: {}", rendered, e);
        LaunchkitError::CommandFailed {
            command: rendered.clone(),
            code: None,
        }
    })?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    tracing::debug!(
        "{} exited with {:?} in {:?}",
        rendered,
        output.status.code(),
        duration
    );

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a program quietly and return success/failure.
pub fn execute_check<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> bool {
    execute(program, args, &CommandOptions::captured())
        .map(|r| r.success)
        .unwrap_or(false)
}

/// Execute a program and collect output without echoing it.
pub fn execute_quiet<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<CommandResult> {
    let options = CommandOptions {
        cwd: cwd.map(|p| p.to_path_buf()),
        ..CommandOptions::captured()
    };
    execute(program, args, &options)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh() -> PathBuf {
        PathBuf::from("/bin/sh")
    }

    #[test]
    fn execute_successful_command() {
        let result = execute(&sh(), &["-c", "echo hello"], &CommandOptions::captured()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute(&sh(), &["-c", "exit 3"], &CommandOptions::captured()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_missing_program_is_an_error() {
        let result = execute(
            Path::new("/definitely/not/a/program"),
            &["--version"],
            &CommandOptions::captured(),
        );

        match result {
            Err(LaunchkitError::CommandFailed { command, code }) => {
                assert!(command.contains("/definitely/not/a/program --version"));
                assert!(code.is_none());
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn execute_with_env() {
        let mut options = CommandOptions::captured();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = execute(&sh(), &["-c", "echo $MY_VAR"], &options).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = execute_quiet(&sh(), &["-c", "pwd"], Some(temp.path())).unwrap();

        assert!(result.success);
        let expected = temp.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(result.stdout.contains(&expected));
    }

    #[test]
    fn execute_check_returns_bool() {
        assert!(execute_check(&sh(), &["-c", "exit 0"]));
        assert!(!execute_check(&sh(), &["-c", "exit 1"]));
    }

    #[test]
    fn combined_output_joins_streams() {
        let result =
            execute_quiet(&sh(), &["-c", "echo out; echo err >&2; exit 1"], None).unwrap();
        let combined = result.combined_output();
        assert!(combined.contains("out"));
        assert!(combined.contains("err"));
    }

    #[test]
    fn display_command_joins_arguments() {
        let rendered = display_command(Path::new("python3"), &["-m", "venv", ".venv"]);
        assert_eq!(rendered, "python3 -m venv .venv");
    }
}
