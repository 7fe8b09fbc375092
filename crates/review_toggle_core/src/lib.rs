//! # Peer Review Toggle
//!
//! Core coordination logic for temporarily lifting the "require pull request
//! reviews before merging" rule around an automated release.
//!
//! ## Overview
//!
//! A release that pushes its version-bump commit straight to a protected
//! branch would be rejected by the review requirement. This crate removes
//! that requirement right after the version bump and restores the captured
//! settings, verbatim, right after publish:
//!
//! 1. [`PeerReviewToggle::after_version_bump`] - capture + disable
//! 2. [`PeerReviewToggle::after_publish`] - restore + discard
//!
//! The host release tool is responsible for invoking the two calls in that
//! order, once each per release cycle, and for passing the current
//! [`ReleaseSession`] so runs without a git remote are skipped.
//!
//! ## Examples
//!
//! ```no_run
//! use github_protection::{create_token_client, GitHubProtectionClient};
//! use review_toggle_core::{PeerReviewToggle, ReleaseSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let octocrab = create_token_client("ghp_example")?;
//! let mut toggle = PeerReviewToggle::new(GitHubProtectionClient::new(octocrab));
//!
//! let session = ReleaseSession::active("my-org", "my-repo", "main");
//!
//! // Driven by the host's release lifecycle:
//! toggle.after_version_bump(&session).await?;
//! // ... publish happens here ...
//! toggle.after_publish(&session).await?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub use errors::Error;

pub mod session;
pub use session::{ReleaseSession, RepositoryId};

pub mod toggle;
pub use toggle::PeerReviewToggle;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The identity under which the toggle registers with its host release tool.
pub const PLUGIN_NAME: &str = "gh-action-toggle-peer-review";
