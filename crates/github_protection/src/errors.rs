//! Error types for GitHub review-protection operations.
//!
//! This module defines the error types that can occur when reading or toggling
//! pull-request-review branch protection through the github_protection crate.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during review-protection operations.
///
/// Note that an unprotected branch is not an error: the query operation reports
/// it through [`crate::ReviewProtectionStatus::NotConfigured`] instead. These
/// variants cover transport and protocol failures only.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic API request failure.
    ///
    /// This error occurs when a GitHub API request fails for unspecified reasons.
    /// Check the GitHub API status and ensure your request parameters are correct.
    #[error("API request failed")]
    ApiError(),

    /// Error deserializing the response from GitHub.
    ///
    /// This error occurs when the GitHub API returns a response that cannot be
    /// parsed into the expected data structure. This may indicate:
    /// - API version changes
    /// - Unexpected response format
    /// - Corrupted response data
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GitHub API returned a response in an unexpected format.
    ///
    /// This error indicates that the API response structure doesn't match
    /// what the client expects.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// This error occurs when a mutating request returns a 404 status code,
    /// indicating that the repository or branch does not exist or is not
    /// accessible with the current authentication.
    #[error("Resource not found")]
    NotFound,
}
