//! Release-time coordination of the peer review protection toggle.

use github_protection::{
    ReviewProtection, ReviewProtectionClient, ReviewProtectionStatus, ReviewProtectionUpdate,
};
use tracing::{debug, info, warn};

use crate::{Error, ReleaseSession};

#[cfg(test)]
#[path = "toggle_tests.rs"]
mod tests;

/// Switches required pull request reviews off around a release and back on
/// afterwards.
///
/// The host release tool drives the toggle through two calls per release
/// cycle, in order: [`after_version_bump`](PeerReviewToggle::after_version_bump)
/// once the new version is committed, then
/// [`after_publish`](PeerReviewToggle::after_publish) once the release has
/// been published. Between the two calls the toggle holds the captured
/// settings in memory only; if the process dies mid-release the snapshot is
/// gone and protection stays off. That limitation is accepted - the restore
/// error path exists precisely so a human hears about the cases where the
/// rule did not come back.
///
/// # Behavior
///
/// 1. After the version bump: read the branch's review protection. If none
///    is configured, or reviews are already disabled, do nothing. Otherwise
///    capture the settings and delete the rule so the release can push
///    directly to the branch.
/// 2. After publish: write the captured settings back, verbatim.
///
/// Capture is best-effort: any failure while reading or deleting is logged
/// and swallowed, and the release continues with protection untouched.
/// Restore failures propagate as [`Error::Restore`].
///
/// Calling `after_version_bump` twice without an intervening publish is
/// harmless: the second call finds no review protection configured (the rule
/// was deleted) and leaves the captured snapshot alone.
pub struct PeerReviewToggle<C> {
    /// Client used for the protection read/delete/update calls.
    client: C,
    /// The review protection settings we disabled, if any.
    captured: Option<ReviewProtection>,
}

impl<C: ReviewProtectionClient> PeerReviewToggle<C> {
    /// Creates a toggle with no captured state.
    pub fn new(client: C) -> Self {
        Self {
            client,
            captured: None,
        }
    }

    /// Disables required pull request reviews on the release branch, keeping
    /// a snapshot of the current settings for the restore phase.
    ///
    /// # Arguments
    ///
    /// * `session` - The VCS session of the current release run.
    ///
    /// # Errors
    ///
    /// None in practice: every capture-phase failure is contained here so
    /// the release itself is never blocked. The `Result` return keeps the
    /// two hook signatures uniform for hosts.
    pub async fn after_version_bump(&mut self, session: &ReleaseSession) -> Result<(), Error> {
        let ReleaseSession::Active {
            repository,
            base_branch,
        } = session
        else {
            debug!("No active VCS session, skipping peer review toggle");
            return Ok(());
        };

        let status = match self
            .client
            .get_review_protection(&repository.owner, &repository.name, base_branch)
            .await
        {
            Ok(status) => status,
            Err(error) => {
                warn!(
                    branch = %base_branch,
                    error = %error,
                    "Could not read review protection, leaving the branch untouched"
                );
                return Ok(());
            }
        };

        let settings = match status {
            ReviewProtectionStatus::NotConfigured => {
                debug!(branch = %base_branch, "No review protection configured, nothing to toggle");
                return Ok(());
            }
            ReviewProtectionStatus::Disabled => {
                debug!(branch = %base_branch, "Review protection already disabled, nothing to toggle");
                return Ok(());
            }
            ReviewProtectionStatus::Configured(settings) => settings,
        };

        if let Err(error) = self
            .client
            .delete_review_protection(&repository.owner, &repository.name, base_branch)
            .await
        {
            warn!(
                branch = %base_branch,
                error = %error,
                "Could not remove review protection, leaving the branch untouched"
            );
            return Ok(());
        }

        // The snapshot only exists once the rule is actually gone, so a
        // failed delete never leads to a spurious restore later.
        self.captured = Some(settings);

        info!(
            branch = %base_branch,
            "Turned off peer review for '{}' branch. Will re-enable after publish.",
            base_branch
        );
        Ok(())
    }

    /// Restores the review protection captured during the version-bump phase.
    ///
    /// The snapshot is consumed before the update call is issued: restoration
    /// is attempted exactly once per release cycle, even when it fails.
    ///
    /// # Arguments
    ///
    /// * `session` - The VCS session of the current release run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Restore`] if the update call fails. The branch is
    /// then still missing its review requirement, so the host must surface
    /// this to an operator rather than ignore it.
    pub async fn after_publish(&mut self, session: &ReleaseSession) -> Result<(), Error> {
        let ReleaseSession::Active {
            repository,
            base_branch,
        } = session
        else {
            debug!("No active VCS session, skipping peer review restore");
            return Ok(());
        };

        let Some(settings) = self.captured.take() else {
            debug!(branch = %base_branch, "No review protection was captured, nothing to restore");
            return Ok(());
        };

        let update = ReviewProtectionUpdate::from(&settings);
        self.client
            .update_review_protection(&repository.owner, &repository.name, base_branch, &update)
            .await
            .map_err(|source| Error::Restore {
                branch: base_branch.clone(),
                source,
            })?;

        info!(
            branch = %base_branch,
            "Re-enabled peer review for '{}' branch!",
            base_branch
        );
        Ok(())
    }
}
