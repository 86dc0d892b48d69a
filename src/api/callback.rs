use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;

use crate::{
    error::{AppError, Result},
    management,
    server::AppState,
    spotify,
};

use super::success;

pub async fn auth_url_dialog(State(state): State<AppState>) -> Result<Json<Value>> {
    success(spotify::auth::authorize_url(state.spotify.config(), true)?)
}

pub async fn auth_url_no_dialog(State(state): State<AppState>) -> Result<Json<Value>> {
    success(spotify::auth::authorize_url(state.spotify.config(), false)?)
}

pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    if let Some(error) = params.get("error") {
        return Err(AppError::Auth(format!("authorization denied: {error}")));
    }

    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        return Err(AppError::Validation("Missing authorization code".to_string()));
    };

    let token = spotify::auth::exchange_code(&state.spotify, code).await?;
    success(token)
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Path((expires_at, refresh_token)): Path<(String, String)>,
) -> Result<Json<Value>> {
    if refresh_token.trim().is_empty() {
        return Err(AppError::AuthMissing);
    }

    // Refreshing is allowed at any time, but the caller must still send the
    // expiry it holds.
    let expires_at = management::parse_expires_at(&expires_at)?;
    tracing::debug!(expires_at, "refreshing access token");

    let token = spotify::auth::refresh_token(&state.spotify, refresh_token.trim()).await?;
    success(token)
}
