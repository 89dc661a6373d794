//! Running `<manager> install` after the overrides are written.

use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::error::InstallError;
use crate::package_manager::PackageManager;
use crate::runtime::Runtime;

/// Run `<pm> install` in `dir`. Nothing is rolled back on failure.
#[tracing::instrument(skip(runtime))]
pub fn run_install<R: Runtime + ?Sized>(runtime: &R, pm: PackageManager, dir: &Path) -> Result<()> {
    let args = vec!["install".to_string()];
    let output = runtime
        .run_command(pm.as_str(), &args, dir)
        .map_err(|e| InstallError::SubprocessFailure(format!("{:#}", e)))?;

    if output.success {
        debug!("{} install finished", pm);
        return Ok(());
    }

    let stderr = output.stderr.trim();
    let message = if stderr.is_empty() {
        format!("{} install exited with a non-zero status", pm)
    } else {
        stderr.to_string()
    };
    Err(InstallError::SubprocessFailure(message).into())
}
