//! GitHub branch lookup.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::{CommitSource, RepoId, network_context};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Branch {
        pub commit: Commit,
    }

    #[derive(Deserialize, Debug)]
    pub struct Commit {
        pub sha: String,
    }
}

pub struct GitHubSource {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubSource {
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl CommitSource for GitHubSource {
    #[tracing::instrument(skip(self))]
    async fn latest_commit(&self, repo: &RepoId, branch: &str) -> Result<String> {
        let url = format!(
            "{}/repos/{}/{}/branches/{}",
            self.api_url, repo.owner, repo.repo, branch
        );
        debug!("Fetching latest commit of {} from {}...", branch, url);

        let info: api::Branch = self
            .http_client
            .get_json(&url)
            .await
            .map_err(|e| network_context(e, "latest commit from GitHub"))?;

        debug!("{}@{} is at {}", repo, branch, info.commit.sha);
        Ok(info.commit.sha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;

    fn repo() -> RepoId {
        "vuejs/core".parse().unwrap()
    }

    #[tokio::test]
    async fn test_latest_commit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/vuejs/core/branches/main")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"name": "main", "commit": {"sha": "664d2e553d6e3e1b5a1e8c9b0f7a6d5c4b3a2918", "url": "x"}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let source = GitHubSource::from_http_client(HttpClient::with_token(None).unwrap(), &server.url());
        let sha = source.latest_commit(&repo(), "main").await.unwrap();

        mock.assert_async().await;
        assert_eq!(sha, "664d2e553d6e3e1b5a1e8c9b0f7a6d5c4b3a2918");
    }

    #[tokio::test]
    async fn test_latest_commit_failure_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/vuejs/core/branches/main")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let source = GitHubSource::from_http_client(HttpClient::with_token(None).unwrap(), &server.url());
        let err = source.latest_commit(&repo(), "main").await.unwrap_err();

        mock.assert_async().await;
        match err.downcast_ref::<InstallError>() {
            Some(InstallError::Network(msg)) => {
                assert!(msg.starts_with("Failed to fetch latest commit from GitHub"));
            }
            other => panic!("Expected network error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_url_trailing_slash() {
        let source = GitHubSource::from_http_client(
            HttpClient::with_token(None).unwrap(),
            "https://api.github.com/",
        );
        assert_eq!(source.api_url(), DEFAULT_API_URL);
    }
}
