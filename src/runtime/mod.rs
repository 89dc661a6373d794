//! Runtime abstraction for system operations.
//!
//! Everything that touches the outside world (environment, files, child
//! processes, the terminal) goes through [`Runtime`], so the override logic
//! can be exercised with a mock.
//!
//! # Structure
//!
//! - `env` - Environment variables and working directory
//! - `fs` - File system operations (read, write, exists)
//! - `process` - Child process execution
//! - `user` - User interaction (confirm and select prompts)

mod env;
mod fs;
mod process;
mod user;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

pub use process::CommandOutput;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
    fn current_dir(&self) -> Result<PathBuf>;

    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;

    // Processes
    /// Run `program` with `args` in `dir`, capturing stdout and stderr.
    /// Returns Err only if the process could not be started.
    fn run_command(&self, program: &str, args: &[String], dir: &Path) -> Result<CommandOutput>;

    // User interaction
    /// Ask a yes/no question. An empty answer picks `default`.
    /// Returns `None` if the user cancelled (end of input).
    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>>;

    /// Ask the user to pick one of `options`. Returns the chosen index,
    /// or `None` if the user cancelled (end of input).
    fn select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn run_command(&self, program: &str, args: &[String], dir: &Path) -> Result<CommandOutput> {
        self.run_command_impl(program, args, dir)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>> {
        self.confirm_impl(prompt, default)
    }

    fn select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        self.select_impl(prompt, options)
    }
}
