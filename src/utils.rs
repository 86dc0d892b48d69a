use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};

use crate::error::{AppError, Result};

/// Random nonce for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// `Authorization` header value for the client-credentials part of a token
/// request.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {encoded}")
}

/// Current unix time in fractional seconds.
pub fn now_timestamp() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

/// Splits `ids` into consecutive groups of at most `size` elements.
///
/// The last group holds the remainder and is always returned, so `n` ids
/// produce exactly `ceil(n / size)` groups.
pub fn chunk_ids(ids: &[String], size: usize) -> Vec<Vec<String>> {
    ids.chunks(size.max(1)).map(|chunk| chunk.to_vec()).collect()
}

/// Checks that `id` looks like a Spotify base62 id.
///
/// Ids end up in upstream paths and query strings, so anything outside
/// `[A-Za-z0-9]` is rejected.
pub fn validate_spotify_id(kind: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(AppError::Validation(format!("Missing {kind} ID")));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(format!("Invalid {kind} ID '{id}'")));
    }
    Ok(())
}

pub fn validate_track_ids(track_ids: &[String]) -> Result<()> {
    if track_ids.is_empty() {
        return Err(AppError::Validation("Missing track IDs".to_string()));
    }
    track_ids
        .iter()
        .try_for_each(|id| validate_spotify_id("track", id))
}
