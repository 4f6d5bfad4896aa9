//! API Routes
//!
//! Route handlers organized by functionality.

pub mod chart;
pub mod dashboard;
pub mod health;
pub mod options;

use axum::http::Uri;

use crate::api::error::ApiError;

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
