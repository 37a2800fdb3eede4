//! Payments service errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    /// No order is currently awaiting payment.
    #[error("no payment is due")]
    NothingDue,

    #[error("not signed in")]
    NotSignedIn,

    #[error("api error")]
    Api(#[source] ApiError),
}

impl From<ApiError> for PaymentsServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND => Self::NothingDue,
            ApiError::NotAuthenticated => Self::NotSignedIn,
            other => Self::Api(other),
        }
    }
}
