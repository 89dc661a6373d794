//! Classification of failed HTTP requests into user-facing messages.
//!
//! Nothing here is retried: every failure is terminal for the run.

use reqwest::{Response, StatusCode};

use crate::error::InstallError;

/// Why a request failed, phrased for the user.
#[derive(Debug, PartialEq, Eq)]
pub enum HttpFailure {
    /// Rate limit exceeded (HTTP 429, or 403 with an exhausted quota)
    RateLimitExceeded(String),
    /// Authentication failed (HTTP 401)
    AuthenticationFailed(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden(String),
    /// Other 4xx
    ClientError(String),
    /// 5xx
    ServerError(String),
    /// Connection, TLS, timeout, decoding
    Transport(String),
}

impl std::fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpFailure::RateLimitExceeded(msg) => write!(
                f,
                "Rate limit exceeded: {}. Try again later or set GITHUB_TOKEN environment variable.",
                msg
            ),
            HttpFailure::AuthenticationFailed(msg) => {
                write!(f, "Authentication failed: {}. Check your GITHUB_TOKEN.", msg)
            }
            HttpFailure::NotFound(msg) => write!(f, "Not found: {}", msg),
            HttpFailure::Forbidden(msg) => {
                write!(f, "Access forbidden: {}. You may need authentication.", msg)
            }
            HttpFailure::ClientError(msg) => write!(f, "Request error: {}", msg),
            HttpFailure::ServerError(msg) => write!(f, "Server error: {}", msg),
            HttpFailure::Transport(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

fn forbidden() -> HttpFailure {
    HttpFailure::Forbidden("Access to this resource is forbidden".to_string())
}

fn rate_limited() -> HttpFailure {
    HttpFailure::RateLimitExceeded("GitHub API rate limit exceeded".to_string())
}

/// Passes successful responses through and turns the rest into
/// [`InstallError::Network`].
///
/// GitHub answers an exhausted quota with 403, not 429. That case is only
/// visible in the `x-ratelimit-remaining` header or the body, so a 403 is
/// inspected before it is reduced to a status code.
pub async fn check_response(response: Response) -> anyhow::Result<Response> {
    if response.status() != StatusCode::FORBIDDEN {
        return response.error_for_status().map_err(into_network_error);
    }

    let exhausted = response
        .headers()
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    let failure = if exhausted {
        rate_limited()
    } else {
        let body = response.text().await.unwrap_or_default();
        if body.to_lowercase().contains("rate limit") {
            rate_limited()
        } else {
            forbidden()
        }
    };
    Err(InstallError::Network(failure.to_string()).into())
}

/// Classifies a reqwest error by status code when there is one.
pub fn classify_error(error: &reqwest::Error) -> HttpFailure {
    let Some(status) = error.status() else {
        return HttpFailure::Transport(error.to_string());
    };

    let reason = status.canonical_reason().unwrap_or("Unknown");
    match status {
        StatusCode::UNAUTHORIZED => {
            HttpFailure::AuthenticationFailed("Invalid or missing authentication token".to_string())
        }
        StatusCode::FORBIDDEN => forbidden(),
        StatusCode::TOO_MANY_REQUESTS => {
            HttpFailure::RateLimitExceeded("Too many requests".to_string())
        }
        StatusCode::NOT_FOUND => {
            HttpFailure::NotFound("The requested resource was not found".to_string())
        }
        s if s.is_client_error() => {
            HttpFailure::ClientError(format!("HTTP {} {}", s.as_u16(), reason))
        }
        s => HttpFailure::ServerError(format!("HTTP {} {}", s.as_u16(), reason)),
    }
}

/// Wraps a reqwest error as [`InstallError::Network`].
pub fn into_network_error(error: reqwest::Error) -> anyhow::Error {
    anyhow::Error::from(InstallError::Network(classify_error(&error).to_string()))
}
