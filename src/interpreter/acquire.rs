//! Interpreter acquisition.
//!
//! When no interpreter answers the probe, an [`InterpreterAcquirer`] gets one
//! chance to install it. [`InstallerDownload`] fetches a configured installer
//! and runs it unattended.

use anyhow::{anyhow, bail, Context};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::InterpreterConfig;
use crate::error::Result;
use crate::shell::{display_command, execute_quiet};
use crate::ui::UserInterface;

/// Installs an interpreter so a second probe can find it.
pub trait InterpreterAcquirer {
    fn acquire(&self, ui: &mut dyn UserInterface) -> Result<()>;
}

/// Downloads an installer over HTTP and runs it with silent arguments.
#[derive(Debug, Clone)]
pub struct InstallerDownload {
    url: Option<String>,
    sha256: Option<String>,
    args: Vec<String>,
    timeout: Duration,
    download_dir: PathBuf,
}

impl InstallerDownload {
    pub fn from_config(config: &InterpreterConfig) -> Self {
        Self {
            url: config.installer_url.clone(),
            sha256: config.installer_sha256.clone(),
            args: config.installer_args.clone(),
            timeout: Duration::from_secs(config.download_timeout_secs),
            download_dir: std::env::temp_dir(),
        }
    }

    /// Store the installer somewhere other than the system temp directory.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the installer, verify it and write it to the download directory.
    pub fn download(&self, url: &str) -> anyhow::Result<PathBuf> {
        let client = Client::builder()
            .user_agent(concat!("launchkit/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let response = client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;
        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }
        let bytes = response
            .bytes()
            .with_context(|| format!("Failed to read response from {}", url))?;

        if let Some(expected) = &self.sha256 {
            let actual = hex::encode(Sha256::digest(&bytes));
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                bail!(
                    "Checksum mismatch for {}: expected {}, got {}",
                    url,
                    expected,
                    actual
                );
            }
        }

        fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(installer_file_name(url));
        fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        make_executable(&path)?;
        Ok(path)
    }

    fn run_installer(&self, installer: &Path) -> anyhow::Result<()> {
        let result = execute_quiet(installer, &self.args, None)?;
        if !result.success {
            return Err(anyhow!(
                "{} exited with {:?}: {}",
                display_command(installer, &self.args),
                result.exit_code,
                result.combined_output()
            ));
        }
        Ok(())
    }
}

impl InterpreterAcquirer for InstallerDownload {
    fn acquire(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let url = self.url.as_deref().ok_or_else(|| {
            anyhow!(
                "no interpreter.installer_url is configured; install Python manually \
                 and make sure it is on PATH"
            )
        })?;

        let mut spinner = ui.start_spinner(&format!("Downloading Python installer from {}", url));
        let installer = match self.download(url) {
            Ok(path) => path,
            Err(e) => {
                spinner.finish_error("Download failed");
                return Err(e.into());
            }
        };

        spinner.set_message("Running Python installer");
        if let Err(e) = self.run_installer(&installer) {
            spinner.finish_error("Installer failed");
            return Err(e.into());
        }
        spinner.finish_success("Python installed");
        Ok(())
    }
}

/// Last path segment of the URL, or a generic name.
fn installer_file_name(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(String::from))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "python-installer".to_string())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
