//! Platform detection.

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Whether the host uses the Windows virtual environment layout
/// (`Scripts/python.exe` instead of `bin/python`).
pub fn is_windows() -> bool {
    cfg!(target_os = "windows")
}
