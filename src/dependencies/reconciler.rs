//! Manifest-versus-snapshot reconciliation.

use std::path::Path;

use crate::error::{LaunchkitError, Result};
use crate::toolchain::Toolchain;

use super::manifest::{load_manifest, DependencySpec};
use super::snapshot::InstalledPackageSet;

/// Whether a declared package counts as installed.
///
/// Matching is a prefix test on lower-cased names, so `requests` is also
/// satisfied by an installed `requests-toolbelt`. Version constraints are not
/// consulted.
pub fn is_declared_satisfied(name: &str, snapshot: &InstalledPackageSet) -> bool {
    let declared = name.to_lowercase();
    snapshot
        .names()
        .any(|installed| installed.starts_with(&declared))
}

/// Declared specs with no match in the snapshot, in manifest order.
pub fn unsatisfied<'a>(
    specs: &'a [DependencySpec],
    snapshot: &InstalledPackageSet,
) -> Vec<&'a DependencySpec> {
    specs
        .iter()
        .filter(|spec| !is_declared_satisfied(&spec.name, snapshot))
        .collect()
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Every declared dependency was already present; nothing was installed.
    Satisfied { declared: usize },
    /// A bulk install ran because these names were missing.
    Installed { missing: Vec<String> },
}

/// Diffs a manifest against installed packages and bulk-installs on any gap.
pub struct DependencyReconciler<'a> {
    toolchain: &'a dyn Toolchain,
    env_dir: &'a Path,
}

impl<'a> DependencyReconciler<'a> {
    pub fn new(toolchain: &'a dyn Toolchain, env_dir: &'a Path) -> Self {
        Self { toolchain, env_dir }
    }

    /// Reconcile `manifest_path` against `snapshot`.
    ///
    /// # Errors
    ///
    /// `ManifestNotFound` if the manifest is absent; `BulkInstallFailed` if
    /// the installer exits non-zero.
    pub fn reconcile(
        &self,
        manifest_path: &Path,
        snapshot: &InstalledPackageSet,
    ) -> Result<ReconcileOutcome> {
        let specs = load_manifest(manifest_path)?;
        let missing: Vec<String> = unsatisfied(&specs, snapshot)
            .into_iter()
            .map(|spec| spec.name.clone())
            .collect();

        if missing.is_empty() {
            tracing::debug!("All {} declared dependencies present", specs.len());
            return Ok(ReconcileOutcome::Satisfied {
                declared: specs.len(),
            });
        }

        tracing::info!(
            "Installing dependencies from {} (missing: {})",
            manifest_path.display(),
            missing.join(", ")
        );
        let result = self.toolchain.install_manifest(self.env_dir, manifest_path)?;
        if !result.success {
            return Err(LaunchkitError::BulkInstallFailed {
                manifest: manifest_path.to_path_buf(),
                code: result.exit_code,
            });
        }

        Ok(ReconcileOutcome::Installed { missing })
    }
}
