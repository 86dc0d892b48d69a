//! # API Module
//!
//! HTTP endpoints of the SpotHelper relay, built on [Axum](https://docs.rs/axum).
//!
//! ## Overview
//!
//! Each handler is a thin translation of an inbound request into one or more
//! calls of [`crate::spotify`]. No handler keeps state between requests: the
//! caller's access token and its expiry travel in the request path and are
//! checked by [`crate::management::TokenManager`] before Spotify is contacted.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`auth_url_dialog`] / [`auth_url_no_dialog`] - Spotify login URL, with
//!   or without forced re-consent
//! - [`callback`] - Exchanges the authorization code for a token triple
//! - [`refresh_token`] - Issues a fresh access token
//!
//! ### Playlists and tracks
//!
//! - [`get_playlists`] - The caller's playlists plus Liked Songs
//! - [`get_tracks_total`] - Track count of one playlist
//! - [`get_all_tracks`] - One normalized page of 50 tracks
//! - [`check_liked`] - Saved status of a list of tracks
//! - [`add_to_playlists`], [`remove_tracks`], [`move_to_playlists`] - Bulk
//!   mutations
//! - [`get_user_info`] - Profile of the caller
//!
//! ### Monitoring
//!
//! - [`health`] - Status and version
//!
//! ## Responses
//!
//! Successful calls answer `200` with `"status": "Success"` and their payload.
//! Every failure answers `400` with `{"status": "Failed", "message": ...}`
//! (see [`crate::error::AppError`]).

mod callback;
mod health;
mod library;
mod playlists;
mod user;

pub use callback::{auth_url_dialog, auth_url_no_dialog, callback, refresh_token};
pub use health::health;
pub use library::{add_to_playlists, check_liked, move_to_playlists, remove_tracks};
pub use playlists::{get_all_tracks, get_playlists, get_tracks_total};
pub use user::get_user_info;

use axum::{Json, extract::rejection::JsonRejection};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};

/// `{"status": "Success", "data": data}`
fn success<T: Serialize>(data: T) -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "Success",
        "data": serde_json::to_value(data)?,
    })))
}

/// Unwraps a JSON body, reporting malformed input as a validation failure.
fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e.body_text())))
}
