//! Package manager detection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use log::debug;

use crate::error::InstallError;
use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PackageManager::ALL
            .into_iter()
            .find(|pm| pm.as_str() == wanted)
            .ok_or_else(|| InstallError::UnsupportedManager(s.to_string()).into())
    }
}

/// Lockfiles checked in the project root, in priority order.
pub const LOCKFILES: [(&str, PackageManager); 6] = [
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
    ("npm-shrinkwrap.json", PackageManager::Npm),
    ("bun.lock", PackageManager::Bun),
    ("bun.lockb", PackageManager::Bun),
];

/// Managers whose lockfiles exist in `dir`, first occurrence wins.
pub fn lockfile_candidates<R: Runtime + ?Sized>(runtime: &R, dir: &Path) -> Vec<PackageManager> {
    let mut candidates = Vec::new();
    for (lockfile, pm) in LOCKFILES {
        if runtime.exists(&dir.join(lockfile)) && !candidates.contains(&pm) {
            debug!("Found {}, candidate {}", lockfile, pm);
            candidates.push(pm);
        }
    }
    candidates
}

/// Decide which package manager to use for the project in `dir`.
///
/// A single lockfile decides on its own. Otherwise the user picks, either
/// among the conflicting candidates or among every supported manager.
#[tracing::instrument(skip(runtime))]
pub fn detect<R: Runtime + ?Sized>(runtime: &R, dir: &Path) -> Result<PackageManager> {
    let candidates = lockfile_candidates(runtime, dir);

    let (prompt, options) = match candidates.len() {
        1 => return Ok(candidates[0]),
        0 => (
            "Cannot infer which package manager to use, please select",
            PackageManager::ALL.to_vec(),
        ),
        _ => (
            "More than one lockfile found, please select the package manager you would like to use",
            candidates,
        ),
    };

    let labels: Vec<String> = options.iter().map(|pm| pm.to_string()).collect();
    match runtime.select(prompt, &labels)? {
        Some(index) => options
            .get(index)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Invalid selection: {}", index)),
        None => Err(InstallError::Cancelled.into()),
    }
}
