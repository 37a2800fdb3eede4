//! Errors surfaced by the HTTP transport.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the Iris API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request never produced a usable response.
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape the endpoint documents.
    #[error("unexpected response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{path} returned {status}: {message}")]
    Status {
        path: String,
        status: StatusCode,
        message: String,
    },

    /// No stored session; the operation requires signing in first.
    #[error("not signed in")]
    NotAuthenticated,

    /// The session could not be refreshed; the user has to sign in again.
    #[error("session expired, sign in again")]
    SessionExpired,
}

impl ApiError {
    pub(crate) fn transport(path: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            path: path.to_owned(),
            source,
        }
    }

    pub(crate) fn decode(path: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.to_owned(),
            source,
        }
    }
}
