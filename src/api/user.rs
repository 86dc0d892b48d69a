use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use crate::{error::Result, management::TokenManager, server::AppState, spotify};

use super::success;

pub async fn get_user_info(
    State(state): State<AppState>,
    Path((expires_at, access_token)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let credentials = TokenManager::from_path(&expires_at, &access_token)?;
    let token = credentials.valid_token()?;

    let user = spotify::user::current_user(&state.spotify, token).await?;
    success(user)
}
