//! HTTP handlers for the VR image service.

pub mod health;
pub mod image;
pub mod metrics;

use crate::error::ApiError;
use axum::{extract::rejection::JsonRejection, Json};
use validator::Validate;

/// Unwrap and validate a JSON body. Any failure (wrong content type,
/// malformed JSON, wrong field type, missing or empty field) becomes the same
/// `Validation` error.
fn validated<T: Validate>(
    payload: Result<Json<T>, JsonRejection>,
    message: &'static str,
) -> Result<T, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::Validation(message)
    })?;

    request.validate().map_err(|e| {
        tracing::debug!(error = %e, "Request failed validation");
        ApiError::Validation(message)
    })?;

    Ok(request)
}
