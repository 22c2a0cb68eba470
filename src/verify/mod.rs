//! Critical module verification and repair.
//!
//! Each configured module is import-probed inside the environment. A failed
//! probe gets exactly one install attempt of the module's alias and one
//! re-probe. Nothing here is fatal: modules that stay broken are reported as
//! [`ModuleStatus::Unrepairable`] and the launch goes ahead.

use std::fmt;
use std::path::Path;

use crate::config::ModuleSpec;
use crate::toolchain::Toolchain;

/// Result of checking one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Imported on the first probe.
    Ok,
    /// Not yet checked, or the import failed and no repair has run.
    Missing,
    /// Import failed, the install succeeded, and the re-probe passed.
    Repaired,
    /// Still not importable after the repair attempt.
    Unrepairable,
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Missing => "missing",
            Self::Repaired => "repaired",
            Self::Unrepairable => "unrepairable",
        })
    }
}

/// A module and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCheckEntry {
    pub capability: String,
    pub import_name: String,
    pub install_alias: String,
    pub status: ModuleStatus,
}

impl ModuleCheckEntry {
    fn pending(spec: &ModuleSpec) -> Self {
        Self {
            capability: spec.capability.clone(),
            import_name: spec.import_name.clone(),
            install_alias: spec.install_target().to_string(),
            status: ModuleStatus::Missing,
        }
    }
}

/// Entries in table order after a verification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub entries: Vec<ModuleCheckEntry>,
}

impl VerificationReport {
    pub fn unrepairable(&self) -> Vec<&ModuleCheckEntry> {
        self.with_status(ModuleStatus::Unrepairable)
    }

    pub fn repaired(&self) -> Vec<&ModuleCheckEntry> {
        self.with_status(ModuleStatus::Repaired)
    }

    fn with_status(&self, status: ModuleStatus) -> Vec<&ModuleCheckEntry> {
        self.entries.iter().filter(|e| e.status == status).collect()
    }

    /// True when nothing is left broken.
    pub fn is_healthy(&self) -> bool {
        self.unrepairable().is_empty()
    }

    /// One-line warning naming every unrepairable module, if any.
    pub fn warning(&self) -> Option<String> {
        let broken = self.unrepairable();
        if broken.is_empty() {
            return None;
        }
        let names: Vec<String> = broken
            .iter()
            .map(|e| format!("{} ({})", e.import_name, e.install_alias))
            .collect();
        Some(format!(
            "Could not repair {} critical module(s): {}",
            broken.len(),
            names.join(", ")
        ))
    }
}

/// Import-checks critical modules and repairs the missing ones.
pub struct ModuleVerifier<'a> {
    toolchain: &'a dyn Toolchain,
    env_dir: &'a Path,
}

impl<'a> ModuleVerifier<'a> {
    pub fn new(toolchain: &'a dyn Toolchain, env_dir: &'a Path) -> Self {
        Self { toolchain, env_dir }
    }

    /// Verify every module in `table`, in order.
    pub fn verify(&self, table: &[ModuleSpec]) -> VerificationReport {
        let entries = table
            .iter()
            .map(|spec| self.verify_one(ModuleCheckEntry::pending(spec)))
            .collect();
        VerificationReport { entries }
    }

    /// Import-probe without repairing. Used by `status`.
    pub fn inspect(&self, table: &[ModuleSpec]) -> VerificationReport {
        let entries = table
            .iter()
            .map(|spec| {
                let mut entry = ModuleCheckEntry::pending(spec);
                if self.toolchain.can_import(self.env_dir, &entry.import_name) {
                    entry.status = ModuleStatus::Ok;
                }
                entry
            })
            .collect();
        VerificationReport { entries }
    }

    fn verify_one(&self, mut entry: ModuleCheckEntry) -> ModuleCheckEntry {
        if self.toolchain.can_import(self.env_dir, &entry.import_name) {
            entry.status = ModuleStatus::Ok;
            return entry;
        }

        tracing::info!(
            "Module {} missing, installing {}",
            entry.import_name,
            entry.install_alias
        );
        match self.toolchain.install_package(self.env_dir, &entry.install_alias) {
            Ok(result) if !result.success => {
                tracing::warn!(
                    "Installing {} failed: {}",
                    entry.install_alias,
                    result.combined_output()
                );
            }
            Err(e) => tracing::warn!("Installing {} failed: {}", entry.install_alias, e),
            Ok(_) => {}
        }

        // The re-probe decides, whatever the installer reported.
        entry.status = if self.toolchain.can_import(self.env_dir, &entry.import_name) {
            ModuleStatus::Repaired
        } else {
            ModuleStatus::Unrepairable
        };
        entry
    }
}
