use reqwest::Method;

use crate::{
    error::Result,
    spotify::{LIKED_SONGS, PAGE_SIZE, SpotifyClient},
    types::{GetUserPlaylistsResponse, Playlist, PlaylistListing, SimplifiedPlaylist},
};

/// Lists the current user's playlists followed by the synthetic Liked Songs
/// entry.
///
/// Only the first page of up to 50 playlists is fetched.
///
/// # Errors
///
/// Returns [`crate::error::AppError::Upstream`] if Spotify rejects the call.
pub async fn list_playlists(client: &SpotifyClient, token: &str) -> Result<PlaylistListing> {
    let response = client
        .call(
            Method::GET,
            "me/playlists",
            &[("limit", PAGE_SIZE.to_string())],
            token,
            None,
        )
        .await?;

    let page = response.json::<GetUserPlaylistsResponse>().await?;
    Ok(normalize_playlists(page.items.into_iter().flatten()))
}

/// Turns upstream playlists into [`Playlist`] records.
///
/// Playlists with an empty name are titled `Unnamed {n}`, `n` counting from 0
/// within this call. The Liked Songs entry is always appended last.
pub fn normalize_playlists(items: impl IntoIterator<Item = SimplifiedPlaylist>) -> PlaylistListing {
    let mut unnamed = 0;
    let mut playlists: Vec<Playlist> = items
        .into_iter()
        .map(|item| {
            let title = match item.name {
                Some(name) if !name.is_empty() => name,
                _ => {
                    let title = format!("Unnamed {unnamed}");
                    unnamed += 1;
                    title
                }
            };

            Playlist {
                id: item.id,
                title,
                link: item.tracks.and_then(|t| t.href).unwrap_or_default(),
                image_url: item.images.unwrap_or_default(),
                snapshot_id: item.snapshot_id.unwrap_or_default(),
                owner: item.owner.and_then(|o| o.display_name).unwrap_or_default(),
            }
        })
        .collect();

    playlists.push(liked_songs());
    PlaylistListing(playlists)
}

fn liked_songs() -> Playlist {
    Playlist {
        id: LIKED_SONGS.to_string(),
        title: "Liked Songs".to_string(),
        link: String::new(),
        image_url: Vec::new(),
        snapshot_id: LIKED_SONGS.to_string(),
        owner: "Liked Songs".to_string(),
    }
}
