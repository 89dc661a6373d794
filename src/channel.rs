//! Release channels a build of the tool can target.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;

/// Where the Vue packages should come from.
///
/// Each published build of the tool has one channel baked in
/// (`install-vue@alpha`, `install-vue@pr`, ...), but the value is plain
/// configuration so any channel can be selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseChannel {
    Alpha,
    Beta,
    Rc,
    /// An exact version from the registry, e.g. `3.5.3`.
    Version,
    /// A commit build, e.g. `664d2e5`.
    Commit,
    /// A pull request build, e.g. `12272`.
    Pr,
    /// The latest commit on the mainline branch.
    Edge,
    /// Nightly builds published under `@vue/canary` and `*-canary` names.
    Canary,
    /// Canary builds of the next minor.
    CanaryMinor,
}

impl ReleaseChannel {
    pub const ALL: [ReleaseChannel; 9] = [
        ReleaseChannel::Alpha,
        ReleaseChannel::Beta,
        ReleaseChannel::Rc,
        ReleaseChannel::Version,
        ReleaseChannel::Commit,
        ReleaseChannel::Pr,
        ReleaseChannel::Edge,
        ReleaseChannel::Canary,
        ReleaseChannel::CanaryMinor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseChannel::Alpha => "alpha",
            ReleaseChannel::Beta => "beta",
            ReleaseChannel::Rc => "rc",
            ReleaseChannel::Version => "version",
            ReleaseChannel::Commit => "commit",
            ReleaseChannel::Pr => "pr",
            ReleaseChannel::Edge => "edge",
            ReleaseChannel::Canary => "canary",
            ReleaseChannel::CanaryMinor => "canary-minor",
        }
    }

    /// Channels whose packages are published under different names and
    /// installed through `npm:` aliases.
    pub fn is_aliased(&self) -> bool {
        matches!(self, ReleaseChannel::Canary | ReleaseChannel::CanaryMinor)
    }

    /// Channels served from the continuous build host instead of the registry.
    pub fn is_build_channel(&self) -> bool {
        matches!(
            self,
            ReleaseChannel::Commit | ReleaseChannel::Pr | ReleaseChannel::Edge
        )
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseChannel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ReleaseChannel::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = ReleaseChannel::ALL.iter().map(|c| c.as_str()).collect();
                anyhow::anyhow!(
                    "Unknown release channel: {}. Expected one of: {}.",
                    s,
                    known.join(", ")
                )
            })
    }
}
