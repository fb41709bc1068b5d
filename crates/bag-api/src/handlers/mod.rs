//! HTTP request handlers for the gateway API

pub mod addresses;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for everything the address layer let through
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
