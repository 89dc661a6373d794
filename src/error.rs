//! Error taxonomy surfaced to the terminal.
//!
//! Every failure is wrapped in `anyhow::Error`; `main` downcasts to
//! [`InstallError`] to decide the exit status.

/// Failures the tool reports directly to the user.
#[derive(Debug)]
pub enum InstallError {
    /// The project is not set up for the tool (e.g. no package.json).
    Configuration(String),
    /// The release channel needs an explicit version/commit/PR token.
    MissingArgument(String),
    /// A registry or source-control query failed.
    Network(String),
    /// A package manager name outside npm/pnpm/yarn/bun.
    UnsupportedManager(String),
    /// `<manager> install` exited non-zero; carries captured stderr.
    SubprocessFailure(String),
    /// The user cancelled a prompt. Not a failure: exits 0.
    Cancelled,
    /// The user answered no to proceeding past a preflight warning.
    Declined,
}

impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallError::Configuration(msg) => write!(f, "{}", msg),
            InstallError::MissingArgument(msg) => write!(f, "{}", msg),
            InstallError::Network(msg) => write!(f, "{}", msg),
            InstallError::UnsupportedManager(name) => write!(
                f,
                "Unsupported package manager: {}. Expected npm, pnpm, yarn, or bun.",
                name
            ),
            InstallError::SubprocessFailure(msg) => write!(f, "{}", msg),
            InstallError::Cancelled | InstallError::Declined => write!(f, "Operation cancelled."),
        }
    }
}

impl std::error::Error for InstallError {}

impl InstallError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::Cancelled => 0,
            _ => 1,
        }
    }
}

/// Exit status for any error bubbling out of a run.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<InstallError>()
        .map(InstallError::exit_code)
        .unwrap_or(1)
}
