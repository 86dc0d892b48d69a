//! # Spotify Integration Module
//!
//! Everything the relay sends to Spotify goes through this module. It is split
//! by concern:
//!
//! ```text
//! HTTP handlers (crate::api)
//!          ↓
//! Spotify Integration Layer
//!     ├── auth      OAuth authorization-code flow (URL, exchange, refresh)
//!     ├── playlists the caller's playlists plus the synthetic Liked Songs entry
//!     ├── tracks    one normalized page of a playlist or of Liked Songs
//!     ├── batch     chunked add / remove / move of tracks
//!     ├── library   saved-status lookup
//!     └── user      profile of the current user
//!          ↓
//! client (SpotifyClient: bearer auth, timeout, retry on 429/5xx)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Liked Songs
//!
//! The user's saved tracks are presented to callers as a playlist with the
//! sentinel id [`LIKED_SONGS`]. It never exists upstream as a playlist object;
//! [`PlaylistRef`] routes it to the `me/tracks` endpoints instead of
//! `playlists/{id}/tracks`.
//!
//! ## Error Types
//!
//! All functions return [`crate::error::Result`]. Non-2xx answers from Spotify
//! become [`crate::error::AppError::Upstream`] with the status code and body
//! preserved. Nothing is retried beyond the transport-level policy of the
//! client, and nothing is rolled back.

pub mod auth;
pub mod batch;
pub mod client;
pub mod library;
pub mod playlists;
pub mod tracks;
pub mod user;

pub use client::SpotifyClient;

use crate::{error::Result, utils};

/// Sentinel playlist id of the user's saved tracks.
pub const LIKED_SONGS: &str = "Liked_Songs";

/// Maximum number of items Spotify returns per page.
pub const PAGE_SIZE: usize = 50;

/// Maximum number of tracks sent in one add/remove call.
pub const CHUNK_SIZE: usize = 50;

/// A playlist id supplied by a caller, resolved to its upstream endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistRef {
    LikedSongs,
    Playlist(String),
}

impl PlaylistRef {
    /// Validates `id` and resolves the [`LIKED_SONGS`] sentinel.
    pub fn parse(id: &str) -> Result<Self> {
        if id == LIKED_SONGS {
            return Ok(PlaylistRef::LikedSongs);
        }
        utils::validate_spotify_id("playlist", id)?;
        Ok(PlaylistRef::Playlist(id.to_string()))
    }

    pub fn is_liked_songs(&self) -> bool {
        matches!(self, PlaylistRef::LikedSongs)
    }

    /// Path of the track collection behind this playlist.
    pub fn tracks_path(&self) -> String {
        match self {
            PlaylistRef::LikedSongs => "me/tracks".to_string(),
            PlaylistRef::Playlist(id) => format!("playlists/{id}/tracks"),
        }
    }
}
