//! Pull-request-review protection domain types.
//!
//! This module contains the types representing the review-related subset of a
//! branch protection rule: the settings GitHub reports for
//! `required_pull_request_reviews`, the typed outcome of querying them, and
//! the payload used to write them back.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "review_protection_tests.rs"]
mod tests;

/// Review-protection settings captured from a branch protection rule.
///
/// This is the snapshot a release run holds on to while peer review is
/// switched off: restoring it must reproduce the original rule exactly,
/// so every field GitHub reports for required pull request reviews is kept.
///
/// # Examples
///
/// ```rust
/// use github_protection::ReviewProtection;
///
/// let protection = ReviewProtection {
///     dismiss_stale_reviews: true,
///     require_code_owner_reviews: false,
///     required_approving_review_count: 2,
///     dismissal_restrictions: None,
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewProtection {
    /// Whether pushing new commits dismisses prior approving reviews
    pub dismiss_stale_reviews: bool,
    /// Whether designated code owners must approve before merging
    pub require_code_owner_reviews: bool,
    /// Required number of approving reviews before merging
    pub required_approving_review_count: u32,
    /// Who may dismiss reviews, when the rule restricts that at all
    pub dismissal_restrictions: Option<DismissalRestrictions>,
}

/// The users and teams permitted to dismiss pull request reviews.
///
/// Both lists preserve the order GitHub reports them in. Users are identified
/// by login, teams by slug.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DismissalRestrictions {
    /// User logins allowed to dismiss reviews
    pub users: Vec<String>,
    /// Team slugs allowed to dismiss reviews
    pub teams: Vec<String>,
}

/// Typed outcome of querying a branch's review protection.
///
/// An unprotected branch is an expected, non-exceptional condition for the
/// release flow, so it is reported as a variant here rather than as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewProtectionStatus {
    /// The branch has no protection rule, or the rule carries no
    /// required-pull-request-reviews settings.
    NotConfigured,

    /// Review settings exist but are explicitly marked disabled. Older
    /// GitHub Enterprise responses report this as `{"enabled": false}`.
    Disabled,

    /// Review protection is active with the contained settings.
    Configured(ReviewProtection),
}

impl ReviewProtectionStatus {
    /// Classifies a `GET .../branches/{branch}/protection` response body.
    ///
    /// # Arguments
    ///
    /// * `body` - The full branch protection object returned by GitHub.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the `required_pull_request_reviews`
    /// field is present but does not match the documented response shape.
    pub fn from_protection_response(
        body: &serde_json::Value,
    ) -> Result<ReviewProtectionStatus, serde_json::Error> {
        let response: BranchProtectionResponse = serde_json::from_value(body.clone())?;

        let reviews = match response.required_pull_request_reviews {
            Some(reviews) => reviews,
            None => return Ok(ReviewProtectionStatus::NotConfigured),
        };

        if reviews.enabled == Some(false) {
            return Ok(ReviewProtectionStatus::Disabled);
        }

        Ok(ReviewProtectionStatus::Configured(ReviewProtection {
            dismiss_stale_reviews: reviews.dismiss_stale_reviews.unwrap_or(false),
            require_code_owner_reviews: reviews.require_code_owner_reviews.unwrap_or(false),
            required_approving_review_count: reviews.required_approving_review_count.unwrap_or(0),
            dismissal_restrictions: reviews.dismissal_restrictions.map(|restrictions| {
                DismissalRestrictions {
                    users: restrictions.users.into_iter().map(|user| user.login).collect(),
                    teams: restrictions.teams.into_iter().map(|team| team.slug).collect(),
                }
            }),
        }))
    }
}

/// Payload for `PATCH .../protection/required_pull_request_reviews`.
///
/// GitHub expects dismissal restrictions as plain login/slug lists on this
/// endpoint, so the payload always carries both lists; a snapshot without
/// restrictions is written back as two empty lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReviewProtectionUpdate {
    pub dismiss_stale_reviews: bool,
    pub require_code_owner_reviews: bool,
    pub required_approving_review_count: u32,
    pub dismissal_restrictions: DismissalRestrictionsUpdate,
}

/// Dismissal restriction lists as the update endpoint expects them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DismissalRestrictionsUpdate {
    pub users: Vec<String>,
    pub teams: Vec<String>,
}

impl From<&ReviewProtection> for ReviewProtectionUpdate {
    fn from(protection: &ReviewProtection) -> Self {
        let restrictions = protection
            .dismissal_restrictions
            .clone()
            .unwrap_or_default();

        Self {
            dismiss_stale_reviews: protection.dismiss_stale_reviews,
            require_code_owner_reviews: protection.require_code_owner_reviews,
            required_approving_review_count: protection.required_approving_review_count,
            dismissal_restrictions: DismissalRestrictionsUpdate {
                users: restrictions.users,
                teams: restrictions.teams,
            },
        }
    }
}

/// Wire shape of the branch protection response, reduced to the fields this
/// crate reads.
#[derive(Debug, Deserialize)]
struct BranchProtectionResponse {
    #[serde(default)]
    required_pull_request_reviews: Option<RequiredPullRequestReviews>,
}

#[derive(Debug, Deserialize)]
struct RequiredPullRequestReviews {
    /// Only present on responses using the legacy `{"enabled": bool}` shape.
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    dismiss_stale_reviews: Option<bool>,
    #[serde(default)]
    require_code_owner_reviews: Option<bool>,
    #[serde(default)]
    required_approving_review_count: Option<u32>,
    #[serde(default)]
    dismissal_restrictions: Option<DismissalRestrictionsWire>,
}

/// GitHub reports dismissal restrictions as full user and team objects; only
/// the identifying login/slug is kept.
#[derive(Debug, Deserialize)]
struct DismissalRestrictionsWire {
    #[serde(default)]
    users: Vec<UserRef>,
    #[serde(default)]
    teams: Vec<TeamRef>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    login: String,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    slug: String,
}
