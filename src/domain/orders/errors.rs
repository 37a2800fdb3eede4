//! Orders service errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// Checkout was attempted with nothing in the cart. Caught before any
    /// request is issued.
    #[error("cart is empty")]
    EmptyCart,

    #[error("order not found")]
    NotFound,

    #[error("not signed in")]
    NotSignedIn,

    #[error("api error")]
    Api(#[source] ApiError),
}

impl From<ApiError> for OrdersServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND => Self::NotFound,
            ApiError::NotAuthenticated => Self::NotSignedIn,
            other => Self::Api(other),
        }
    }
}
