//! Installed package snapshot.

use std::collections::BTreeSet;
use std::path::Path;

use crate::toolchain::Toolchain;

/// Lower-cased names of the packages installed in an environment, captured
/// once per reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackageSet {
    names: BTreeSet<String>,
}

impl InstalledPackageSet {
    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from bare package names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Parse `pip freeze` output.
    ///
    /// Understands `name==version`, `name @ url` and editable
    /// `-e <vcs-url>#egg=name` lines. Anything else that is not a comment is
    /// taken as a bare name.
    pub fn from_freeze(output: &str) -> Self {
        Self::from_names(output.lines().filter_map(freeze_line_name))
    }

    /// Whether nothing is installed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Installed names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

fn freeze_line_name(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if let Some(editable) = line.strip_prefix("-e") {
        return editable
            .split_once("#egg=")
            .map(|(_, egg)| egg.split('&').next().unwrap_or(egg));
    }
    let end = [line.find("=="), line.find(" @ ")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    Some(&line[..end])
}

/// A captured snapshot plus the reason it is empty, if listing failed.
#[derive(Debug, Clone)]
pub struct SnapshotCapture {
    pub packages: InstalledPackageSet,
    pub warning: Option<String>,
}

/// List the packages installed in `env_dir`.
///
/// A failed listing is not fatal: the snapshot comes back empty with a
/// warning, which makes reconciliation fall through to a bulk install.
pub fn capture_snapshot(toolchain: &dyn Toolchain, env_dir: &Path) -> SnapshotCapture {
    let failure = match toolchain.list_installed(env_dir) {
        Ok(result) if result.success => {
            let packages = InstalledPackageSet::from_freeze(&result.stdout);
            tracing::debug!("Captured {} installed packages", packages.len());
            return SnapshotCapture {
                packages,
                warning: None,
            };
        }
        Ok(result) => format!(
            "exit code {:?}: {}",
            result.exit_code,
            result.combined_output()
        ),
        Err(e) => e.to_string(),
    };

    tracing::warn!("Listing installed packages failed: {}", failure);
    SnapshotCapture {
        packages: InstalledPackageSet::empty(),
        warning: Some(format!(
            "Could not list installed packages ({}); assuming none are installed",
            failure
        )),
    }
}
