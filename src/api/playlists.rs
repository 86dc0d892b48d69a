use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    error::{AppError, Result},
    management::TokenManager,
    server::AppState,
    spotify::{self, PlaylistRef},
};

use super::success;

pub async fn get_playlists(
    State(state): State<AppState>,
    Path((expires_at, access_token)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let credentials = TokenManager::from_path(&expires_at, &access_token)?;
    let token = credentials.valid_token()?;

    let playlists = spotify::playlists::list_playlists(&state.spotify, token).await?;
    success(playlists)
}

pub async fn get_tracks_total(
    State(state): State<AppState>,
    Path((playlist_id, expires_at, access_token)): Path<(String, String, String)>,
) -> Result<Json<Value>> {
    let credentials = TokenManager::from_path(&expires_at, &access_token)?;
    let token = credentials.valid_token()?;
    let playlist = PlaylistRef::parse(&playlist_id)?;

    let total = spotify::tracks::total_tracks(&state.spotify, &playlist, token).await?;
    Ok(Json(json!({
        "status": "Success",
        "totalTracks": total,
    })))
}

pub async fn get_all_tracks(
    State(state): State<AppState>,
    Path((playlist_id, expires_at, access_token, offset)): Path<(String, String, String, String)>,
) -> Result<Json<Value>> {
    let credentials = TokenManager::from_path(&expires_at, &access_token)?;
    let token = credentials.valid_token()?;
    let playlist = PlaylistRef::parse(&playlist_id)?;
    let offset: u32 = offset
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid offset '{offset}'")))?;

    let tracks = spotify::tracks::fetch_page(&state.spotify, &playlist, offset, token).await?;
    success(tracks)
}
