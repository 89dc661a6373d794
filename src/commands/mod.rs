use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;

use crate::{
    error::InstallError,
    overrides::{
        AppliedOverrides, FileKind, MANIFEST_FILE, ModifiedFile, apply, build_override_map,
        replaced_keys,
    },
    package_manager::detect,
    runtime::Runtime,
    source::{CommitSource, RegistrySource},
    version::ResolvedVersion,
};

pub mod config;
mod install;
mod preflight;

pub use install::run_install;
pub use preflight::preflight;

use config::{Config, Options};

/// Point the project in the current directory at the configured Vue build.
#[tracing::instrument(skip(runtime))]
pub async fn install_vue<R: Runtime>(runtime: R, options: Options) -> Result<()> {
    let config = Config::new(runtime, options)?;
    run(config).await
}

/// preflight, detect, resolve, write, then offer to install.
pub async fn run<R: Runtime, C: CommitSource, G: RegistrySource>(
    config: Config<R, C, G>,
) -> Result<()> {
    let Config {
        runtime,
        resolver,
        build_host,
        options,
    } = config;
    let channel = options.channel;

    println!("Installing Vue.js ({})", channel);

    let root = runtime.current_dir()?;
    preflight(&runtime, &root)?;

    let pm = match options.package_manager {
        Some(pm) => pm,
        None => detect(&runtime, &root)?,
    };
    debug!("Using {} in {:?}", pm, root);

    let manifest_path = root.join(MANIFEST_FILE);
    let manifest: Value = serde_json::from_str(&runtime.read_to_string(&manifest_path)?)
        .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

    let mut resolved = resolver
        .resolve(channel, options.target.as_deref())
        .await?;
    if options.exact {
        if let ResolvedVersion::DistTag(tag) = resolved.clone() {
            println!("Checking for the latest {} version", tag);
            resolved = resolver.pin_exact(channel, resolved).await?;
            println!("Found {} version {}", tag, resolved.token());
        } else if channel.is_build_channel() {
            debug!("--exact has no effect on {} builds", channel);
        }
    }

    let map = build_override_map(channel, &resolved, &build_host);
    let applied = apply(pm, manifest, &map, &root)?;
    write_applied(&runtime, &applied)?;

    let files: Vec<&str> = applied.modified_files.iter().map(|f| f.name()).collect();
    println!("Updated {} for {} dependency overrides", files.join(", "), pm);

    let prompt = format!("Run {} install to install the updated dependencies?", pm);
    match runtime.confirm(&prompt, true)? {
        None => Err(InstallError::Cancelled.into()),
        Some(false) => {
            println!("Done! Don't forget to run {} install later.", pm);
            Ok(())
        }
        Some(true) => {
            println!("Installing via {}", pm);
            if let Err(e) = run_install(&runtime, pm, &root) {
                eprintln!("Installation failed");
                return Err(e);
            }
            println!("Installed via {}", pm);
            println!("Done!");
            Ok(())
        }
    }
}

/// Write every file the writer reported as modified.
fn write_applied<R: Runtime + ?Sized>(runtime: &R, applied: &AppliedOverrides) -> Result<()> {
    for file in &applied.modified_files {
        let contents = match file.kind {
            FileKind::Manifest => {
                let mut json = serde_json::to_string_pretty(&applied.manifest)?;
                json.push('\n');
                json
            }
            FileKind::PnpmWorkspace => {
                warn_replaced_keys(runtime, file)?;
                applied
                    .workspace_document
                    .clone()
                    .context("No workspace document was generated")?
            }
        };
        debug!("Writing {:?}", file.path);
        runtime.write(&file.path, contents.as_bytes())?;
    }
    Ok(())
}

/// The workspace document is replaced wholesale; tell the user which of
/// their own sections go with it.
fn warn_replaced_keys<R: Runtime + ?Sized>(runtime: &R, file: &ModifiedFile) -> Result<()> {
    if !runtime.exists(&file.path) {
        return Ok(());
    }
    let dropped = replaced_keys(&runtime.read_to_string(&file.path)?);
    if !dropped.is_empty() {
        warn!("{} sections replaced: {:?}", file.name(), dropped);
        eprintln!(
            "Warning: {} is regenerated and its existing {} section(s) will be removed",
            file.name(),
            dropped.join(", ")
        );
    }
    Ok(())
}
