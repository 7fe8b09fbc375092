//! Error types for the release-time review protection toggle.
//!
//! Capture-phase failures are contained inside the toggle itself (a release
//! must never be blocked because protection could not be read), so the only
//! error this crate surfaces is the one that genuinely needs an operator:
//! a failed restore.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors surfaced by the peer review toggle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Re-applying captured review protection after publish failed.
    ///
    /// This leaves the branch without its review requirement, which is a
    /// security-relevant state no one asked for. It is the one failure the
    /// toggle refuses to swallow: the host must report it so an operator can
    /// restore protection by hand.
    #[error("Failed to restore review protection for branch '{branch}'")]
    Restore {
        /// The branch whose protection is still missing.
        branch: String,
        /// The underlying API failure.
        #[source]
        source: github_protection::Error,
    },
}
