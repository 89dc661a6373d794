//! The pnpm workspace document carrying overrides.

use super::OverrideMap;

/// Written at the workspace root, replacing whatever was there.
pub const PNPM_WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

const GENERATED_KEYS: [&str; 2] = ["overrides", "peerDependencyRules"];

/// Single-quoted YAML scalar; embedded quotes are doubled.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render the full workspace document: one `overrides` line per entry and
/// `peerDependencyRules.allowAny` for `peer_root`, so packages that declare
/// a peer range on it accept the overridden build.
pub fn render_workspace_overrides(map: &OverrideMap, peer_root: &str) -> String {
    let mut doc = String::from("overrides:\n");
    for (name, specifier) in map.iter() {
        doc.push_str(&format!("  {}: {}\n", quote(name), quote(specifier)));
    }
    doc.push_str("peerDependencyRules:\n");
    doc.push_str("  allowAny:\n");
    doc.push_str(&format!("    - {}\n", quote(peer_root)));
    doc
}

/// Top-level keys of an existing workspace document that the generated one
/// does not carry (e.g. `packages`), and which are lost on replacement.
pub fn replaced_keys(existing: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for line in existing.lines() {
        if line.is_empty() || line.starts_with([' ', '\t', '#', '-']) {
            continue;
        }
        let Some((key, _)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_matches(['\'', '"']);
        if key.is_empty() || GENERATED_KEYS.contains(&key) {
            continue;
        }
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}
