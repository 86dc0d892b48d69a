use reqwest::Method;

use crate::{
    error::{AppError, Result},
    spotify::{PAGE_SIZE, PlaylistRef, SpotifyClient},
    types::{Track, TrackItem, TrackMap, TracksPageResponse},
};

/// Fetches one page of up to 50 tracks starting at `offset`.
///
/// Liked Songs is read from `me/tracks`, any other playlist from
/// `playlists/{id}/tracks`. The page is normalized with [`normalize_page`].
///
/// The function is stateless: callers walk the offsets 0, 50, 100, ... until a
/// page comes back with fewer than 50 entries or [`total_tracks`] is reached.
///
/// # Errors
///
/// Returns [`AppError::Upstream`] if Spotify rejects the call.
pub async fn fetch_page(
    client: &SpotifyClient,
    playlist: &PlaylistRef,
    offset: u32,
    token: &str,
) -> Result<TrackMap> {
    let response = client
        .call(
            Method::GET,
            &playlist.tracks_path(),
            &[
                ("limit", PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ],
            token,
            None,
        )
        .await?;

    let page = response.json::<TracksPageResponse>().await?;
    Ok(normalize_page(page.items, playlist.is_liked_songs()))
}

/// Returns the number of tracks in `playlist` by asking for a single item.
///
/// A successful answer without `total` is reported as [`AppError::Upstream`]
/// carrying that answer.
pub async fn total_tracks(client: &SpotifyClient, playlist: &PlaylistRef, token: &str) -> Result<u64> {
    let response = client
        .call(
            Method::GET,
            &playlist.tracks_path(),
            &[("limit", "1".to_string())],
            token,
            None,
        )
        .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;
    let page: TracksPageResponse = serde_json::from_str(&body)?;
    page.total.ok_or(AppError::Upstream { status, body })
}

/// Normalizes the items of one page.
///
/// Deleted or local entries (no track, no id) and tracks without title,
/// artist or album images are skipped. A repeated id replaces the earlier
/// record and increments its `duplicates` counter.
pub fn normalize_page(items: Vec<Option<TrackItem>>, liked: bool) -> TrackMap {
    let mut tracks = TrackMap::new();

    for track in items.into_iter().flatten().filter_map(|item| item.track) {
        let Some(id) = track.id else {
            continue;
        };

        let title = track.name.unwrap_or_default();
        let artist = track
            .artists
            .into_iter()
            .flatten()
            .next()
            .and_then(|a| a.name)
            .unwrap_or_default();
        let images = track.album.and_then(|a| a.images).unwrap_or_default();

        if title.is_empty() || artist.is_empty() || images.is_empty() {
            continue;
        }

        tracks.upsert(Track {
            id,
            title,
            image_url: images,
            artist,
            preview_url: track.preview_url.unwrap_or_default(),
            duplicates: 0,
            liked,
        });
    }

    tracks
}
