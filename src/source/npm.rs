//! npm registry dist-tag lookup.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::{RegistrySource, network_context};

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

mod api {
    use serde::Deserialize;

    /// The version manifest the registry serves for `/<name>/<tag>`.
    #[derive(Deserialize, Debug)]
    pub struct VersionManifest {
        pub version: String,
    }
}

pub struct NpmRegistry {
    http_client: HttpClient,
    registry_url: String,
}

impl NpmRegistry {
    pub fn from_http_client(http_client: HttpClient, registry_url: &str) -> Self {
        Self {
            http_client,
            registry_url: registry_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Scoped names keep the `@` but escape the slash, as the npm CLI does.
fn escape_package_name(name: &str) -> String {
    name.replace('/', "%2f")
}

#[async_trait]
impl RegistrySource for NpmRegistry {
    #[tracing::instrument(skip(self))]
    async fn dist_tag_version(&self, package: &str, tag: &str) -> Result<String> {
        let url = format!(
            "{}/{}/{}",
            self.registry_url,
            escape_package_name(package),
            tag
        );
        debug!("Checking {}@{} at {}...", package, tag, url);

        let manifest: api::VersionManifest = self
            .http_client
            .get_json(&url)
            .await
            .map_err(|e| network_context(e, &format!("{}@{} from the registry", package, tag)))?;

        Ok(manifest.version)
    }
}
