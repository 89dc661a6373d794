//! Resolution of a release channel (plus the optional positional argument)
//! into the version token every related package will share.

use anyhow::Result;
use log::debug;

use crate::channel::ReleaseChannel;
use crate::error::InstallError;
use crate::packages::{ROOT_PACKAGE, published_name};
use crate::source::{CommitSource, RegistrySource, RepoId};

/// Length of the abbreviated commit hash the build host indexes by.
pub const SHORT_HASH_LEN: usize = 7;

/// The branch edge builds are taken from.
pub const EDGE_BRANCH: &str = "main";

/// A resolved version token, tagged with how it must be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedVersion {
    /// A registry dist-tag such as `alpha` or `latest`.
    DistTag(String),
    /// An exact registry version such as `3.5.3`.
    Exact(String),
    /// A commit hash or PR number on the continuous build host.
    BuildRef(String),
}

impl ResolvedVersion {
    pub fn token(&self) -> &str {
        match self {
            ResolvedVersion::DistTag(t) | ResolvedVersion::Exact(t) | ResolvedVersion::BuildRef(t) => t,
        }
    }
}

/// First [`SHORT_HASH_LEN`] characters of a commit hash.
pub fn short_hash(sha: &str) -> String {
    sha.chars().take(SHORT_HASH_LEN).collect()
}

fn required(arg: Option<&str>, message: &str) -> Result<String> {
    arg.map(str::to_string)
        .ok_or_else(|| InstallError::MissingArgument(message.to_string()).into())
}

/// Resolves channels to versions, calling out to the network only for
/// `edge` (branch head) and for exact pinning (registry dist-tag).
pub struct VersionResolver<C: CommitSource, G: RegistrySource> {
    commits: C,
    registry: G,
    repo: RepoId,
    edge_branch: String,
}

impl<C: CommitSource, G: RegistrySource> VersionResolver<C, G> {
    pub fn new(commits: C, registry: G, repo: RepoId) -> Self {
        Self {
            commits,
            registry,
            repo,
            edge_branch: EDGE_BRANCH.to_string(),
        }
    }

    pub fn with_edge_branch(mut self, branch: &str) -> Self {
        self.edge_branch = branch.to_string();
        self
    }

    /// Resolve `channel` with the user's optional argument.
    ///
    /// Channels that need an argument fail with
    /// [`InstallError::MissingArgument`] before anything is fetched.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(
        &self,
        channel: ReleaseChannel,
        explicit: Option<&str>,
    ) -> Result<ResolvedVersion> {
        let explicit = explicit.map(str::trim).filter(|a| !a.is_empty());

        let resolved = match channel {
            ReleaseChannel::Alpha | ReleaseChannel::Beta | ReleaseChannel::Rc => match explicit {
                Some(v) => ResolvedVersion::Exact(v.to_string()),
                None => ResolvedVersion::DistTag(channel.to_string()),
            },
            ReleaseChannel::Canary => match explicit {
                Some(v) => ResolvedVersion::Exact(v.to_string()),
                None => ResolvedVersion::DistTag("latest".to_string()),
            },
            ReleaseChannel::CanaryMinor => match explicit {
                Some(v) => ResolvedVersion::Exact(v.to_string()),
                None => ResolvedVersion::DistTag("minor".to_string()),
            },
            ReleaseChannel::Version => ResolvedVersion::Exact(required(
                explicit,
                "Please provide a version to install",
            )?),
            ReleaseChannel::Commit => ResolvedVersion::BuildRef(required(
                explicit,
                "Please provide a short commit hash to install",
            )?),
            ReleaseChannel::Pr => ResolvedVersion::BuildRef(required(
                explicit,
                "Please provide a PR number to install",
            )?),
            ReleaseChannel::Edge => {
                // Branch aliases on the build host are unreliable, so the
                // branch head is resolved to a commit here.
                let sha = self
                    .commits
                    .latest_commit(&self.repo, &self.edge_branch)
                    .await?;
                ResolvedVersion::BuildRef(short_hash(&sha))
            }
        };

        debug!("Resolved {} to {:?}", channel, resolved);
        Ok(resolved)
    }

    /// Replace a dist-tag with the exact version it currently points at.
    ///
    /// npm overrides only take effect reliably with exact versions. Anything
    /// other than a dist-tag is returned unchanged without a lookup.
    #[tracing::instrument(skip(self))]
    pub async fn pin_exact(
        &self,
        channel: ReleaseChannel,
        resolved: ResolvedVersion,
    ) -> Result<ResolvedVersion> {
        let ResolvedVersion::DistTag(tag) = resolved else {
            return Ok(resolved);
        };

        let package = published_name(channel, ROOT_PACKAGE);
        let version = self.registry.dist_tag_version(&package, &tag).await?;
        debug!("{}@{} is {}", package, tag, version);
        Ok(ResolvedVersion::Exact(version))
    }
}
