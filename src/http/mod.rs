//! HTTP client module with status classification.

mod client;
mod status;

pub use client::HttpClient;
pub use status::{HttpFailure, check_response, classify_error, into_network_error};
