//! The fixed set of packages that are overridden together.

use crate::channel::ReleaseChannel;

/// The root package; every other related package is versioned in lockstep with it.
pub const ROOT_PACKAGE: &str = "vue";

/// Packages published from the Vue core repository, in override order.
pub const RELATED_PACKAGES: [&str; 11] = [
    "vue",
    "@vue/compiler-core",
    "@vue/compiler-dom",
    "@vue/compiler-sfc",
    "@vue/compiler-ssr",
    "@vue/reactivity",
    "@vue/runtime-core",
    "@vue/runtime-dom",
    "@vue/server-renderer",
    "@vue/shared",
    "@vue/compat",
];

/// Name a package is published under for `channel`.
///
/// Canary builds live under `@vue/canary` (for `vue`) and `<name>-canary`
/// for everything else; all other channels use the real name.
pub fn published_name(channel: ReleaseChannel, name: &str) -> String {
    if !channel.is_aliased() {
        return name.to_string();
    }
    if name == ROOT_PACKAGE {
        "@vue/canary".to_string()
    } else {
        format!("{}-canary", name)
    }
}
