use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::{
    error::Result,
    management::TokenManager,
    server::AppState,
    spotify::{self, PlaylistRef},
    types::{AddToPlaylistsBody, TrackIdsBody},
};

use super::json_body;

fn done() -> Json<Value> {
    Json(json!({ "status": "Success" }))
}

fn parse_targets(ids: &[String]) -> Result<Vec<PlaylistRef>> {
    ids.iter().map(|id| PlaylistRef::parse(id)).collect()
}

pub async fn check_liked(
    State(state): State<AppState>,
    Path((expires_at, access_token)): Path<(String, String)>,
    body: std::result::Result<Json<TrackIdsBody>, JsonRejection>,
) -> Result<Json<Value>> {
    let credentials = TokenManager::from_path(&expires_at, &access_token)?;
    let token = credentials.valid_token()?;
    let body = json_body(body)?;

    let liked = spotify::library::check_liked(&state.spotify, &body.track_ids, token).await?;
    Ok(Json(json!({
        "status": "Success",
        "boolArray": liked,
    })))
}

pub async fn add_to_playlists(
    State(state): State<AppState>,
    Path((expires_at, access_token)): Path<(String, String)>,
    body: std::result::Result<Json<AddToPlaylistsBody>, JsonRejection>,
) -> Result<Json<Value>> {
    let credentials = TokenManager::from_path(&expires_at, &access_token)?;
    let token = credentials.valid_token()?;
    let body = json_body(body)?;
    let targets = parse_targets(&body.playlist_ids)?;

    spotify::batch::add_tracks(&state.spotify, &body.track_ids, &targets, token).await?;
    Ok(done())
}

pub async fn remove_tracks(
    State(state): State<AppState>,
    Path((origin_id, snapshot_id, expires_at, access_token)): Path<(String, String, String, String)>,
    body: std::result::Result<Json<TrackIdsBody>, JsonRejection>,
) -> Result<Json<Value>> {
    let credentials = TokenManager::from_path(&expires_at, &access_token)?;
    let token = credentials.valid_token()?;
    let body = json_body(body)?;
    let origin = PlaylistRef::parse(&origin_id)?;

    spotify::batch::remove_tracks(&state.spotify, &body.track_ids, &origin, &snapshot_id, token)
        .await?;
    Ok(done())
}

pub async fn move_to_playlists(
    State(state): State<AppState>,
    Path((origin_id, snapshot_id, expires_at, access_token)): Path<(String, String, String, String)>,
    body: std::result::Result<Json<AddToPlaylistsBody>, JsonRejection>,
) -> Result<Json<Value>> {
    let credentials = TokenManager::from_path(&expires_at, &access_token)?;
    let token = credentials.valid_token()?;
    let body = json_body(body)?;
    let origin = PlaylistRef::parse(&origin_id)?;
    let targets = parse_targets(&body.playlist_ids)?;

    spotify::batch::move_tracks(
        &state.spotify,
        &body.track_ids,
        &origin,
        &snapshot_id,
        &targets,
        token,
    )
    .await?;
    Ok(done())
}
