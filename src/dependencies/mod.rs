//! Declared dependency reconciliation.
//!
//! A pass parses the manifest, snapshots what pip reports as installed, and
//! runs a single bulk install if any declared name is unmatched.

pub mod manifest;
pub mod reconciler;
pub mod snapshot;

pub use manifest::{load_manifest, parse_manifest, DependencySpec, CONSTRAINT_DELIMITERS};
pub use reconciler::{
    is_declared_satisfied, unsatisfied, DependencyReconciler, ReconcileOutcome,
};
pub use snapshot::{capture_snapshot, InstalledPackageSet, SnapshotCapture};
