//! AWS error types.

use thiserror::Error;

/// Error type for AWS requests and credential resolution.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request to {service} failed")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// AWS answered with a non-success status.
    #[error("{service} {action} failed with status {status}: {code}: {message}")]
    Api {
        service: &'static str,
        action: String,
        status: u16,
        code: String,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to parse {service} {action} response: {reason}")]
    Decode {
        service: &'static str,
        action: String,
        reason: String,
    },

    /// The request could not be signed.
    #[error("failed to sign request: {0}")]
    Signing(String),

    /// No usable credentials were found.
    #[error("{0}")]
    Credentials(String),
}

pub type Result<T> = std::result::Result<T, Error>;
