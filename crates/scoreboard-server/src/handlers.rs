//! REST handlers for `/matches` plus health and banner.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use scoreboard_core::{Match, MatchId, MatchPatch, NewMatch, ValidationError};

use crate::auth::AdminGuard;
use crate::error::ApiError;
use crate::server::AppState;

pub const BANNER: &str = "Football Live Score Server (SSE)";

/// `GET /`
pub async fn banner() -> &'static str {
    BANNER
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "matches": state.scoreboard.match_count(),
        "subscribers": state.scoreboard.subscriber_count(),
    }))
}

/// `GET /matches`
pub async fn list_matches(State(state): State<AppState>) -> Json<Vec<Match>> {
    Json(state.scoreboard.list())
}

/// `POST /matches`
pub async fn create_match(
    _admin: AdminGuard,
    State(state): State<AppState>,
    body: Result<Json<NewMatch>, JsonRejection>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    // An unreadable body is reported the same way as missing fields.
    let Json(new) = body.map_err(|_| ApiError::Validation(ValidationError::MissingTeams))?;
    let created = state.scoreboard.create(&new)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /matches/{id}`
pub async fn update_match(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<MatchPatch>, JsonRejection>,
) -> Result<Json<Match>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(patch) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let updated = state.scoreboard.update(id, &patch)?;
    Ok(Json(updated))
}

/// `DELETE /matches/{id}`
pub async fn delete_match(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state.scoreboard.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<MatchId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}
