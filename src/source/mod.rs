//! Remote lookups used to resolve a release channel to a concrete version.
//!
//! Two services are involved: the source-control host (latest commit of a
//! branch) and the package registry (version behind a dist-tag). Both sit
//! behind traits so the resolver can be tested without a network.

mod github;
mod npm;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use github::{DEFAULT_API_URL, GitHubSource};
pub use npm::{DEFAULT_REGISTRY_URL, NpmRegistry};

use crate::error::InstallError;

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            anyhow::bail!("Invalid repository format. Expected 'owner/repo'.")
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// Looks up the head commit of a branch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Full commit hash at the tip of `branch`.
    async fn latest_commit(&self, repo: &RepoId, branch: &str) -> Result<String>;
}

/// Looks up the version a registry dist-tag points at.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Exact version published under `package@tag`.
    async fn dist_tag_version(&self, package: &str, tag: &str) -> Result<String>;
}

/// Prefixes a network failure with what was being fetched, keeping it a
/// network error. Other errors pass through untouched.
pub(crate) fn network_context(err: anyhow::Error, what: &str) -> anyhow::Error {
    match err.downcast::<InstallError>() {
        Ok(InstallError::Network(msg)) => {
            InstallError::Network(format!("Failed to fetch {}: {}", what, msg)).into()
        }
        Ok(other) => other.into(),
        Err(err) => err,
    }
}
