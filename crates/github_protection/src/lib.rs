//! Crate for reading and toggling pull-request-review branch protection
//! through the GitHub REST API.
//!
//! The surface is deliberately narrow: query the review settings of one
//! branch, remove them, and write a previously captured set of them back.
//! Anything else about branch protection (status checks, admin enforcement,
//! push restrictions) is out of scope and left untouched on the branch.

use async_trait::async_trait;
use octocrab::{Octocrab, Result as OctocrabResult};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod review_protection;
pub use review_protection::{
    DismissalRestrictions, DismissalRestrictionsUpdate, ReviewProtection, ReviewProtectionStatus,
    ReviewProtectionUpdate,
};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Trait for branch review-protection operations.
///
/// This is the capability a release-time coordinator consumes: it carries
/// exactly the three calls the toggle sequence needs. Query outcomes that are
/// expected during a release (no protection rule, reviews switched off) are
/// reported through [`ReviewProtectionStatus`] rather than as errors.
#[async_trait]
pub trait ReviewProtectionClient: Send + Sync {
    /// Queries the review-protection settings of a branch.
    ///
    /// # Arguments
    ///
    /// * `owner` - The owner of the repository (user or organization name).
    /// * `repo` - The name of the repository.
    /// * `branch` - The branch whose protection rule is queried.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport or protocol failures. An
    /// unprotected branch is reported as
    /// [`ReviewProtectionStatus::NotConfigured`].
    async fn get_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<ReviewProtectionStatus, Error>;

    /// Removes the required-pull-request-reviews rule from a branch.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the repository or branch does not exist,
    /// and `Error::ApiError` for other failures.
    async fn delete_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<(), Error>;

    /// Writes review-protection settings back onto a branch.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the repository or branch does not exist,
    /// and `Error::ApiError` for other failures.
    async fn update_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        settings: &ReviewProtectionUpdate,
    ) -> Result<(), Error>;
}

#[async_trait]
impl<T: ReviewProtectionClient + ?Sized> ReviewProtectionClient for Arc<T> {
    async fn get_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<ReviewProtectionStatus, Error> {
        (**self).get_review_protection(owner, repo, branch).await
    }

    async fn delete_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<(), Error> {
        (**self).delete_review_protection(owner, repo, branch).await
    }

    async fn update_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        settings: &ReviewProtectionUpdate,
    ) -> Result<(), Error> {
        (**self)
            .update_review_protection(owner, repo, branch, settings)
            .await
    }
}

/// A client for the review-protection endpoints of the GitHub REST API.
#[derive(Debug)]
pub struct GitHubProtectionClient {
    client: Octocrab,
}

impl GitHubProtectionClient {
    /// Creates a new `GitHubProtectionClient` on top of an authenticated
    /// `Octocrab` instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReviewProtectionClient for GitHubProtectionClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn get_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<ReviewProtectionStatus, Error> {
        let path = format!("/repos/{}/{}/branches/{}/protection", owner, repo, branch);

        let response: OctocrabResult<serde_json::Value> = self.client.get(path, None::<&()>).await;
        match response {
            Ok(body) => {
                let status = ReviewProtectionStatus::from_protection_response(&body)?;
                debug!(branch = branch, status = status_name(&status), "Read review protection");
                Ok(status)
            }
            // GitHub answers 404 for branches without a protection rule.
            Err(e) if is_not_found(&e) => {
                debug!(branch = branch, "Branch has no protection rule");
                Ok(ReviewProtectionStatus::NotConfigured)
            }
            Err(e) => {
                log_octocrab_error("Failed to read branch protection", e);
                Err(Error::InvalidResponse)
            }
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn delete_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<(), Error> {
        let path = format!(
            "/repos/{}/{}/branches/{}/protection/required_pull_request_reviews",
            owner, repo, branch
        );

        // The endpoint answers 204 with no body, so the raw request is used
        // instead of the JSON-parsing helper.
        let response = match self.client._delete(path.as_str(), None::<&()>).await {
            Ok(response) => response,
            Err(e) => {
                log_octocrab_error("Failed to remove review protection", e);
                return Err(Error::ApiError());
            }
        };

        match octocrab::map_github_error(response).await {
            Ok(_) => {
                info!(branch = branch, "Removed required pull request reviews");
                Ok(())
            }
            Err(e) if is_not_found(&e) => {
                log_octocrab_error("Failed to remove review protection", e);
                Err(Error::NotFound)
            }
            Err(e) => {
                log_octocrab_error("Failed to remove review protection", e);
                Err(Error::ApiError())
            }
        }
    }

    #[instrument(skip(self, settings), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn update_review_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        settings: &ReviewProtectionUpdate,
    ) -> Result<(), Error> {
        let path = format!(
            "/repos/{}/{}/branches/{}/protection/required_pull_request_reviews",
            owner, repo, branch
        );

        let response: OctocrabResult<serde_json::Value> =
            self.client.patch(path, Some(settings)).await;
        match response {
            Ok(_) => {
                info!(
                    branch = branch,
                    required_approving_review_count = settings.required_approving_review_count,
                    "Updated required pull request reviews"
                );
                Ok(())
            }
            Err(e) if is_not_found(&e) => {
                log_octocrab_error("Failed to update review protection", e);
                Err(Error::NotFound)
            }
            Err(e) => {
                log_octocrab_error("Failed to update review protection", e);
                Err(Error::ApiError())
            }
        }
    }
}

/// Creates an `Octocrab` client authenticated with a personal or installation
/// access token.
///
/// Release automation normally receives such a token from its environment;
/// the resulting client can be handed straight to
/// [`GitHubProtectionClient::new`].
///
/// # Errors
///
/// Returns an `Error::ApiError` if the client cannot be built.
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| {
            error!(
                error = %e,
                "Failed to build an authenticated client for the protection endpoints"
            );
            Error::ApiError()
        })
}

fn is_not_found(e: &octocrab::Error) -> bool {
    matches!(
        e,
        octocrab::Error::GitHub { source, .. }
            if source.status_code == http::StatusCode::NOT_FOUND
    )
}

fn status_name(status: &ReviewProtectionStatus) -> &'static str {
    match status {
        ReviewProtectionStatus::NotConfigured => "not-configured",
        ReviewProtectionStatus::Disabled => "disabled",
        ReviewProtectionStatus::Configured(_) => "configured",
    }
}

/// Logs an octocrab failure with the context the protection endpoints can
/// actually produce: a rejection from GitHub itself, a protection path that
/// did not form a valid URI, or a transport-level failure.
fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => error!(
            error_message = source.message,
            status_code = source.status_code.as_u16(),
            backtrace = backtrace.to_string(),
            "{}. GitHub rejected the protection request",
            message
        ),
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The protection endpoint path is not a valid URI",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The protection endpoint path is not a valid URI",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
