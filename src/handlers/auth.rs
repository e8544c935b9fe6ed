use axum::{Json, extract::State};

use crate::error::ApiError;
use crate::models::user::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::services;
use crate::state::AppState;

/// Registers a new user account.
///
/// The response carries name/username/email only. The password is hashed on
/// the way in and no form of it ever comes back out.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let created = services::user::register(&state.db, payload).await?;
    Ok(Json(created))
}

/// Checks credentials and hands back a signed bearer token.
///
/// Sits behind the per-IP rate limit; see routes. Both failure modes
/// (no such user, wrong password) produce the same 401 body.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = services::user::login(&state.db, &state.tokens, payload).await?;
    Ok(Json(session))
}
