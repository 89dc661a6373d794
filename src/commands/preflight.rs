//! Checks run before anything is touched.

use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::error::InstallError;
use crate::overrides::MANIFEST_FILE;
use crate::runtime::Runtime;

/// Require a manifest in `dir` and warn about uncommitted changes.
///
/// The git check is best effort: a missing git binary or a directory that
/// is not a repository is ignored.
#[tracing::instrument(skip(runtime))]
pub fn preflight<R: Runtime + ?Sized>(runtime: &R, dir: &Path) -> Result<()> {
    if !runtime.exists(&dir.join(MANIFEST_FILE)) {
        return Err(InstallError::Configuration(format!(
            "Cannot find {} in the current directory",
            MANIFEST_FILE
        ))
        .into());
    }

    let args = vec!["status".to_string(), "--porcelain".to_string()];
    let status = match runtime.run_command("git", &args, dir) {
        Ok(output) if output.success => output.stdout,
        Ok(output) => {
            debug!("git status failed, skipping: {}", output.stderr.trim());
            return Ok(());
        }
        Err(e) => {
            debug!("git unavailable, skipping: {}", e);
            return Ok(());
        }
    };

    if status.trim().is_empty() {
        return Ok(());
    }

    println!(
        "There are uncommitted changes in the current repository, it's recommended to commit or stash them first."
    );
    match runtime.confirm("Still proceed?", false)? {
        Some(true) => Ok(()),
        Some(false) => Err(InstallError::Declined.into()),
        None => Err(InstallError::Cancelled.into()),
    }
}
