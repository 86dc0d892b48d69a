use reqwest::Method;

use crate::{error::Result, spotify::SpotifyClient, utils};

/// Asks Spotify which of `track_ids` are in the user's Liked Songs.
///
/// All ids go into a single comma-separated `ids` query of
/// `me/tracks/contains`; the answer has one bool per id, in order. Spotify
/// caps that endpoint at 50 ids and will reject longer lists.
pub async fn check_liked(client: &SpotifyClient, track_ids: &[String], token: &str) -> Result<Vec<bool>> {
    utils::validate_track_ids(track_ids)?;

    let response = client
        .call(
            Method::GET,
            "me/tracks/contains",
            &[("ids", track_ids.join(","))],
            token,
            None,
        )
        .await?;

    Ok(response.json::<Vec<bool>>().await?)
}
