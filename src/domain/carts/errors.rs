//! Cart errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// Quantities below one never leave the client.
    #[error("quantity must be at least 1")]
    QuantityBelowOne,

    #[error("not signed in")]
    NotSignedIn,

    #[error("api error")]
    Api(#[source] ApiError),
}

impl From<ApiError> for CartsServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotAuthenticated => Self::NotSignedIn,
            other => Self::Api(other),
        }
    }
}
