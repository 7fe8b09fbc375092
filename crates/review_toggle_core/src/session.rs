//! Release session state handed to the toggle by the host release tool.

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Identifies the repository a release runs against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryId {
    /// The owner of the repository (user or organization name).
    pub owner: String,
    /// The name of the repository.
    pub name: String,
}

impl RepositoryId {
    /// Creates a new `RepositoryId`.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

/// The version-control session state of the current release run.
///
/// Hosts can run releases without a git remote (dry runs, local-only
/// packaging). Rather than checking a nullable session object at every use
/// site, the state is explicit: the toggle does nothing for a
/// [`ReleaseSession::Detached`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseSession {
    /// No remote-backed VCS session is active; protection cannot and need
    /// not be touched.
    Detached,

    /// A release is running against a hosted repository.
    Active {
        /// The repository the release publishes from.
        repository: RepositoryId,
        /// The branch releases are published against.
        base_branch: String,
    },
}

impl ReleaseSession {
    /// Creates an active session for the given repository and base branch.
    pub fn active(
        owner: impl Into<String>,
        name: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self::Active {
            repository: RepositoryId::new(owner, name),
            base_branch: base_branch.into(),
        }
    }
}
