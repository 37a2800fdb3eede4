//! Auth service errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::{api::ApiError, auth::session::SessionStoreError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not signed in")]
    NotSignedIn,

    #[error("api error")]
    Api(#[source] ApiError),

    #[error("session store error")]
    Session(#[from] SessionStoreError),
}

impl From<ApiError> for AuthServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Status { status, .. } if status == StatusCode::UNAUTHORIZED => {
                Self::InvalidCredentials
            }
            ApiError::NotAuthenticated => Self::NotSignedIn,
            other => Self::Api(other),
        }
    }
}
