//! Override mappings: which specifier each related package is forced to.
//!
//! [`build_override_map`] turns a resolved version into one specifier per
//! related package; [`apply`] projects that map onto the file format of the
//! active package manager.

mod pnpm;
mod writer;

use serde_json::{Map, Value};

use crate::channel::ReleaseChannel;
use crate::packages::{RELATED_PACKAGES, published_name};
use crate::source::RepoId;
use crate::version::ResolvedVersion;

pub use pnpm::{PNPM_WORKSPACE_FILE, render_workspace_overrides, replaced_keys};
pub use writer::{AppliedOverrides, FileKind, MANIFEST_FILE, ModifiedFile, apply};

/// Default host serving per-commit and per-PR package builds.
pub const DEFAULT_BUILD_HOST: &str = "https://pkg.pr.new";

/// Repository whose packages are overridden.
pub const VUE_REPO: &str = "vuejs/core";

/// Package name to version specifier, in insertion order.
///
/// Backed by an order-preserving JSON object, so it can be merged into a
/// manifest section as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    entries: Map<String, Value>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `specifier`; an existing entry keeps its position.
    pub fn insert(&mut self, name: &str, specifier: String) {
        self.entries
            .insert(name.to_string(), Value::String(specifier));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(n, s)| s.as_str().map(|s| (n.as_str(), s)))
    }

    /// The entries as JSON values, for merging into a manifest.
    pub fn as_json(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where commit and PR builds are downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildHost {
    pub url: String,
    pub repo: RepoId,
}

impl BuildHost {
    pub fn new(url: &str, repo: RepoId) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            repo,
        }
    }

    /// `{host}/{owner}/{repo}/{package}@{reference}`
    pub fn package_url(&self, package: &str, reference: &str) -> String {
        format!(
            "{}/{}/{}/{}@{}",
            self.url, self.repo.owner, self.repo.repo, package, reference
        )
    }
}

/// Build the override map for every related package.
///
/// Registry versions are shared verbatim (through an `npm:` alias on
/// channels that publish under other names); build references become a
/// per-package download URL.
pub fn build_override_map(
    channel: ReleaseChannel,
    resolved: &ResolvedVersion,
    build_host: &BuildHost,
) -> OverrideMap {
    let mut map = OverrideMap::new();

    for name in RELATED_PACKAGES {
        let specifier = match resolved {
            ResolvedVersion::BuildRef(reference) => build_host.package_url(name, reference),
            ResolvedVersion::DistTag(version) | ResolvedVersion::Exact(version) => {
                if channel.is_aliased() {
                    format!("npm:{}@{}", published_name(channel, name), version)
                } else {
                    version.clone()
                }
            }
        };
        map.insert(name, specifier);
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vue_build_host() -> BuildHost {
        BuildHost::new(DEFAULT_BUILD_HOST, VUE_REPO.parse().unwrap())
    }

    #[test]
    fn test_override_map_insert_replaces_in_place() {
        let mut map = OverrideMap::new();
        map.insert("vue", "alpha".into());
        map.insert("@vue/shared", "alpha".into());
        map.insert("vue", "beta".into());

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("vue"), Some("beta"));
        let names: Vec<&str> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["vue", "@vue/shared"]);
    }

    #[test]
    fn test_override_map_as_json() {
        let mut map = OverrideMap::new();
        map.insert("@vue/shared", "rc".into());
        map.insert("vue", "rc".into());

        let json = serde_json::to_string(map.as_json()).unwrap();
        assert_eq!(json, r#"{"@vue/shared":"rc","vue":"rc"}"#);
    }

    #[test]
    fn test_build_host_url() {
        let host = BuildHost::new("https://pkg.pr.new/", VUE_REPO.parse().unwrap());
        assert_eq!(
            host.package_url("@vue/runtime-dom", "12272"),
            "https://pkg.pr.new/vuejs/core/@vue/runtime-dom@12272"
        );
    }

    #[test]
    fn test_one_entry_per_related_package() {
        let host = vue_build_host();
        for (channel, resolved) in [
            (ReleaseChannel::Alpha, ResolvedVersion::DistTag("alpha".into())),
            (ReleaseChannel::Version, ResolvedVersion::Exact("3.5.3".into())),
            (ReleaseChannel::Pr, ResolvedVersion::BuildRef("12272".into())),
            (ReleaseChannel::Canary, ResolvedVersion::DistTag("latest".into())),
        ] {
            let map = build_override_map(channel, &resolved, &host);
            let names: Vec<&str> = map.iter().map(|(n, _)| n).collect();
            assert_eq!(names, RELATED_PACKAGES.to_vec(), "{}", channel);
        }
    }

    #[test]
    fn test_registry_versions_are_shared() {
        let map = build_override_map(
            ReleaseChannel::Alpha,
            &ResolvedVersion::DistTag("alpha".into()),
            &vue_build_host(),
        );
        assert!(map.iter().all(|(_, spec)| spec == "alpha"));
    }

    #[test]
    fn test_build_refs_become_per_package_urls() {
        let map = build_override_map(
            ReleaseChannel::Commit,
            &ResolvedVersion::BuildRef("664d2e5".into()),
            &vue_build_host(),
        );
        assert_eq!(
            map.get("vue"),
            Some("https://pkg.pr.new/vuejs/core/vue@664d2e5")
        );
        assert_eq!(
            map.get("@vue/compiler-sfc"),
            Some("https://pkg.pr.new/vuejs/core/@vue/compiler-sfc@664d2e5")
        );
    }

    #[test]
    fn test_canary_uses_npm_aliases() {
        let map = build_override_map(
            ReleaseChannel::Canary,
            &ResolvedVersion::DistTag("latest".into()),
            &vue_build_host(),
        );
        assert_eq!(map.get("vue"), Some("npm:@vue/canary@latest"));
        assert_eq!(
            map.get("@vue/shared"),
            Some("npm:@vue/shared-canary@latest")
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let host = vue_build_host();
        let resolved = ResolvedVersion::BuildRef("a1b2c3d".into());
        let first = build_override_map(ReleaseChannel::Edge, &resolved, &host);
        let second = build_override_map(ReleaseChannel::Edge, &resolved, &host);
        assert_eq!(first, second);
    }
}
