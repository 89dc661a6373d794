//! Projection of an [`OverrideMap`] onto each package manager's config.
//!
//! The writer is pure: it takes the parsed manifest and hands back the
//! updated document plus the files the caller has to write.

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;
use serde_json::{Map, Value};

use super::OverrideMap;
use super::pnpm::{PNPM_WORKSPACE_FILE, render_workspace_overrides};
use crate::error::InstallError;
use crate::package_manager::PackageManager;
use crate::packages::ROOT_PACKAGE;

pub const MANIFEST_FILE: &str = "package.json";

/// Dependency sections npm resolves direct dependencies from.
const DIRECT_DEPENDENCY_FIELDS: [&str; 3] =
    ["dependencies", "devDependencies", "optionalDependencies"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Manifest,
    PnpmWorkspace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedFile {
    pub kind: FileKind,
    pub path: PathBuf,
}

impl ModifiedFile {
    fn new(kind: FileKind, workspace_root: &Path) -> Self {
        let name = match kind {
            FileKind::Manifest => MANIFEST_FILE,
            FileKind::PnpmWorkspace => PNPM_WORKSPACE_FILE,
        };
        Self {
            kind,
            path: workspace_root.join(name),
        }
    }

    /// File name for display.
    pub fn name(&self) -> &str {
        match self.kind {
            FileKind::Manifest => MANIFEST_FILE,
            FileKind::PnpmWorkspace => PNPM_WORKSPACE_FILE,
        }
    }
}

/// Outcome of [`apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedOverrides {
    pub manifest: Value,
    /// Full replacement content for the pnpm workspace document.
    pub workspace_document: Option<String>,
    pub modified_files: Vec<ModifiedFile>,
}

impl AppliedOverrides {
    pub fn modifies(&self, kind: FileKind) -> bool {
        self.modified_files.iter().any(|f| f.kind == kind)
    }
}

/// How one package manager takes overrides.
trait OverrideStrategy {
    fn apply(&self, manifest: &mut Map<String, Value>, map: &OverrideMap) -> Option<String>;
    fn modified_file(&self) -> FileKind;
}

/// npm and bun: `overrides`, plus rewriting matching direct dependencies,
/// which npm otherwise resolves ahead of the override.
struct NpmOverrides;

/// pnpm: a regenerated workspace document; the manifest is left alone.
struct PnpmWorkspaceOverrides;

/// yarn: `resolutions`.
struct YarnResolutions;

impl OverrideStrategy for NpmOverrides {
    fn apply(&self, manifest: &mut Map<String, Value>, map: &OverrideMap) -> Option<String> {
        merge_section(manifest, "overrides", map);

        for field in DIRECT_DEPENDENCY_FIELDS {
            let Some(Value::Object(deps)) = manifest.get_mut(field) else {
                continue;
            };
            for (name, specifier) in map.iter() {
                if let Some(current) = deps.get_mut(name) {
                    if is_truthy(current) {
                        debug!("Rewriting {}.{} to {}", field, name, specifier);
                        *current = Value::String(specifier.to_string());
                    }
                }
            }
        }
        None
    }

    fn modified_file(&self) -> FileKind {
        FileKind::Manifest
    }
}

impl OverrideStrategy for PnpmWorkspaceOverrides {
    fn apply(&self, _manifest: &mut Map<String, Value>, map: &OverrideMap) -> Option<String> {
        Some(render_workspace_overrides(map, ROOT_PACKAGE))
    }

    fn modified_file(&self) -> FileKind {
        FileKind::PnpmWorkspace
    }
}

impl OverrideStrategy for YarnResolutions {
    fn apply(&self, manifest: &mut Map<String, Value>, map: &OverrideMap) -> Option<String> {
        merge_section(manifest, "resolutions", map);
        None
    }

    fn modified_file(&self) -> FileKind {
        FileKind::Manifest
    }
}

fn strategy_for(pm: PackageManager) -> &'static dyn OverrideStrategy {
    match pm {
        PackageManager::Npm | PackageManager::Bun => &NpmOverrides,
        PackageManager::Pnpm => &PnpmWorkspaceOverrides,
        PackageManager::Yarn => &YarnResolutions,
    }
}

/// Merge `map` into the object at `key`, keeping unrelated entries.
/// A missing or non-object value is replaced by a fresh object.
fn merge_section(manifest: &mut Map<String, Value>, key: &str, map: &OverrideMap) {
    let section = manifest
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !section.is_object() {
        *section = Value::Object(Map::new());
    }
    if let Value::Object(entries) = section {
        entries.extend(map.as_json().clone());
    }
}

/// Whether a dependency entry counts as present (`"": ...` or `null` do not).
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Apply `map` for `pm` to the parsed manifest of the project at `workspace_root`.
#[tracing::instrument(skip(manifest, map))]
pub fn apply(
    pm: PackageManager,
    manifest: Value,
    map: &OverrideMap,
    workspace_root: &Path,
) -> Result<AppliedOverrides> {
    let Value::Object(mut fields) = manifest else {
        return Err(InstallError::Configuration(format!(
            "{} must contain a JSON object",
            MANIFEST_FILE
        ))
        .into());
    };

    let strategy = strategy_for(pm);
    let workspace_document = strategy.apply(&mut fields, map);
    let modified = ModifiedFile::new(strategy.modified_file(), workspace_root);

    debug!("{} overrides go to {:?}", pm, modified.path);

    Ok(AppliedOverrides {
        manifest: Value::Object(fields),
        workspace_document,
        modified_files: vec![modified],
    })
}
