use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{AppError, Result},
    spotify::{CHUNK_SIZE, PlaylistRef, SpotifyClient},
    types::{AddTrackToPlaylistRequest, RemovePlaylistTracksRequest, SavedTracksRequest, TrackUri},
    utils,
};

/// Adds tracks to every playlist in `targets`.
///
/// The ids are sent in chunks of at most 50, one call per chunk and target,
/// chunks in the outer loop. Liked Songs is written with `PUT me/tracks` and
/// an `ids` body, playlists with `POST playlists/{id}/tracks` and a `uris`
/// body.
///
/// # Errors
///
/// - [`AppError::Validation`] if `track_ids` or `targets` is empty, or an id
///   is malformed. Nothing has been sent in that case.
/// - [`AppError::Upstream`] for the first call answered with anything other
///   than `200` or `201`. Calls already made are not undone.
pub async fn add_tracks(
    client: &SpotifyClient,
    track_ids: &[String],
    targets: &[PlaylistRef],
    token: &str,
) -> Result<()> {
    utils::validate_track_ids(track_ids)?;
    if targets.is_empty() {
        return Err(AppError::Validation("Missing playlist IDs".to_string()));
    }

    for chunk in utils::chunk_ids(track_ids, CHUNK_SIZE) {
        for target in targets {
            let (method, body) = match target {
                PlaylistRef::LikedSongs => (
                    Method::PUT,
                    serde_json::to_value(SavedTracksRequest { ids: chunk.clone() })?,
                ),
                PlaylistRef::Playlist(_) => (
                    Method::POST,
                    serde_json::to_value(AddTrackToPlaylistRequest {
                        uris: chunk.iter().map(|id| utils::track_uri(id)).collect(),
                    })?,
                ),
            };

            debug!(playlist = ?target, tracks = chunk.len(), "adding tracks");
            mutate(client, method, target, &body, token).await?;
        }
    }

    Ok(())
}

/// Removes tracks from `origin`.
///
/// Uses the same chunking as [`add_tracks`]. Liked Songs is cleared with
/// `DELETE me/tracks` and an `ids` body; for a playlist the body lists
/// `{uri}` objects and carries `snapshot_id` (when not empty) so Spotify can
/// reject the change if the playlist moved on.
///
/// # Errors
///
/// - [`AppError::Validation`] for an empty or malformed track list
/// - [`AppError::Upstream`] for the first non-2xx answer; no rollback
pub async fn remove_tracks(
    client: &SpotifyClient,
    track_ids: &[String],
    origin: &PlaylistRef,
    snapshot_id: &str,
    token: &str,
) -> Result<()> {
    utils::validate_track_ids(track_ids)?;

    let snapshot_id = Some(snapshot_id.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    for chunk in utils::chunk_ids(track_ids, CHUNK_SIZE) {
        let body = match origin {
            PlaylistRef::LikedSongs => serde_json::to_value(SavedTracksRequest { ids: chunk })?,
            PlaylistRef::Playlist(_) => serde_json::to_value(RemovePlaylistTracksRequest {
                tracks: chunk
                    .iter()
                    .map(|id| TrackUri {
                        uri: utils::track_uri(id),
                    })
                    .collect(),
                snapshot_id: snapshot_id.clone(),
            })?,
        };

        debug!(playlist = ?origin, "removing tracks");
        mutate(client, Method::DELETE, origin, &body, token).await?;
    }

    Ok(())
}

/// Copies tracks to `targets` and, once every add went through, removes them
/// from `origin`.
///
/// A failing add stops the move before anything is removed. A failing remove
/// leaves the tracks in both places.
pub async fn move_tracks(
    client: &SpotifyClient,
    track_ids: &[String],
    origin: &PlaylistRef,
    snapshot_id: &str,
    targets: &[PlaylistRef],
    token: &str,
) -> Result<()> {
    add_tracks(client, track_ids, targets, token).await?;
    remove_tracks(client, track_ids, origin, snapshot_id, token).await
}

async fn mutate(
    client: &SpotifyClient,
    method: Method,
    playlist: &PlaylistRef,
    body: &Value,
    token: &str,
) -> Result<()> {
    let adding = method != Method::DELETE;
    let response = client
        .send(method, &playlist.tracks_path(), &[], token, Some(body))
        .await?;

    if adding {
        SpotifyClient::classify(response, |s| s == StatusCode::OK || s == StatusCode::CREATED)
            .await?;
    } else {
        SpotifyClient::classify(response, |s| s.is_success()).await?;
    }
    Ok(())
}
