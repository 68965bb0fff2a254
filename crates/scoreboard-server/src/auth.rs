//! Shared-secret check for mutating endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use scoreboard_core::{AdminToken, ADMIN_TOKEN_HEADER};

use crate::error::ApiError;
use crate::server::AppState;

/// Extractor that succeeds only when the request carries the configured
/// admin token. With no token configured every request passes.
#[derive(Debug)]
pub struct AdminGuard;

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        check(state.admin_token.as_ref(), header_value(parts))
    }
}

fn header_value(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
}

/// Pure decision used by the extractor.
pub fn check(expected: Option<&AdminToken>, presented: Option<&str>) -> Result<AdminGuard, ApiError> {
    let Some(expected) = expected else {
        return Ok(AdminGuard);
    };
    match presented {
        Some(value) if expected.verify(value) => Ok(AdminGuard),
        Some(_) => {
            tracing::warn!("Admin token mismatch");
            Err(ApiError::Unauthorized)
        }
        None => {
            tracing::warn!("Admin token missing");
            Err(ApiError::Unauthorized)
        }
    }
}
