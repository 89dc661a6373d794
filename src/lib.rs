pub mod channel;
pub mod commands;
pub mod error;
pub mod http;
pub mod overrides;
pub mod package_manager;
pub mod packages;
pub mod runtime;
pub mod source;
pub mod version;
