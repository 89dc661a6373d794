use anyhow::Result;
use log::debug;

use crate::{
    channel::ReleaseChannel,
    http::HttpClient,
    overrides::{BuildHost, DEFAULT_BUILD_HOST, VUE_REPO},
    package_manager::PackageManager,
    runtime::Runtime,
    source::{
        CommitSource, DEFAULT_API_URL, DEFAULT_REGISTRY_URL, GitHubSource, NpmRegistry,
        RegistrySource, RepoId,
    },
    version::VersionResolver,
};

/// Channel baked in at build time (see build.rs).
pub const DEFAULT_CHANNEL: &str = env!("INSTALL_VUE_DEFAULT_CHANNEL");

/// Settings for one run, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub channel: ReleaseChannel,
    /// Version, commit hash or PR number, depending on the channel.
    pub target: Option<String>,
    /// Skip lockfile detection.
    pub package_manager: Option<PackageManager>,
    /// Resolve dist-tags to exact versions through the registry.
    pub exact: bool,
    pub api_url: Option<String>,
    pub registry_url: Option<String>,
    pub build_host: Option<String>,
    /// Branch the edge channel follows instead of `main`.
    pub edge_branch: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            channel: ReleaseChannel::Edge,
            target: None,
            package_manager: None,
            exact: false,
            api_url: None,
            registry_url: None,
            build_host: None,
            edge_branch: None,
        }
    }
}

pub struct Config<R: Runtime, C: CommitSource, G: RegistrySource> {
    pub runtime: R,
    pub resolver: VersionResolver<C, G>,
    pub build_host: BuildHost,
    pub options: Options,
}

impl<R: Runtime> Config<R, GitHubSource, NpmRegistry> {
    pub fn new(runtime: R, options: Options) -> Result<Self> {
        let token = runtime.env_var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        if let Some(token) = &token {
            debug!("Using GITHUB_TOKEN for authentication ({} chars)", token.len());
        }

        let repo: RepoId = VUE_REPO.parse()?;

        // The token is only for the GitHub API; the registry gets a client without it.
        let commits = GitHubSource::from_http_client(
            HttpClient::with_token(token.as_deref())?,
            options.api_url.as_deref().unwrap_or(DEFAULT_API_URL),
        );
        let registry = NpmRegistry::from_http_client(
            HttpClient::with_token(None)?,
            options.registry_url.as_deref().unwrap_or(DEFAULT_REGISTRY_URL),
        );
        let build_host = BuildHost::new(
            options.build_host.as_deref().unwrap_or(DEFAULT_BUILD_HOST),
            repo.clone(),
        );

        let mut resolver = VersionResolver::new(commits, registry, repo);
        if let Some(branch) = options.edge_branch.as_deref() {
            resolver = resolver.with_edge_branch(branch);
        }

        Ok(Self {
            runtime,
            resolver,
            build_host,
            options,
        })
    }
}
