//! Catalog service errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("product not found")]
    NotFound,

    #[error("api error")]
    Api(#[source] ApiError),
}

impl From<ApiError> for CatalogServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND => Self::NotFound,
            other => Self::Api(other),
        }
    }
}
