use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Caller-held credentials. Never stored by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub link: String,
    pub image_url: Vec<Value>,
    pub snapshot_id: String,
    pub owner: String,
}

/// Ordered playlists, serialized as a JSON object keyed by playlist id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistListing(pub Vec<Playlist>);

impl PlaylistListing {
    pub fn get(&self, id: &str) -> Option<&Playlist> {
        self.0.iter().find(|p| p.id == id)
    }

    pub fn last(&self) -> Option<&Playlist> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PlaylistListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|p| (&p.id, p)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub image_url: Vec<Value>,
    pub artist: String,
    pub preview_url: String,
    pub duplicates: u32,
    pub liked: bool,
}

/// One page of normalized tracks keyed by track id, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMap {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl TrackMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `track`, or replaces the record with the same id and bumps its
    /// duplicate counter.
    pub fn upsert(&mut self, mut track: Track) {
        match self.index.get(&track.id) {
            Some(&pos) => {
                track.duplicates = self.tracks[pos].duplicates + 1;
                self.tracks[pos] = track;
            }
            None => {
                track.duplicates = 0;
                self.index.insert(track.id.clone(), self.tracks.len());
                self.tracks.push(track);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.index.get(id).map(|&pos| &self.tracks[pos])
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}

impl Serialize for TrackMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.tracks.iter().map(|t| (&t.id, t)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub display_name: String,
    pub id: String,
    pub uri: String,
}

// Upstream payloads. Everything that Spotify may omit or null is optional so a
// single odd item never fails a whole page.

#[derive(Debug, Clone, Deserialize)]
pub struct GetUserPlaylistsResponse {
    #[serde(default)]
    pub items: Vec<Option<SimplifiedPlaylist>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<Value>>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
    #[serde(default)]
    pub owner: Option<PlaylistOwner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracksPageResponse {
    #[serde(default)]
    pub items: Vec<Option<TrackItem>>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Entry of a playlist or saved-tracks page.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    #[serde(default)]
    pub track: Option<UpstreamTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub album: Option<UpstreamAlbum>,
    #[serde(default)]
    pub artists: Option<Vec<UpstreamArtist>>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamAlbum {
    #[serde(default)]
    pub images: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamArtist {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfileResponse {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedTracksRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovePlaylistTracksRequest {
    pub tracks: Vec<TrackUri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

// Inbound request bodies. Missing lists deserialize as empty and are rejected
// by validation with a readable message.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackIdsBody {
    #[serde(default)]
    pub track_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToPlaylistsBody {
    #[serde(default)]
    pub track_ids: Vec<String>,
    #[serde(default)]
    pub playlist_ids: Vec<String>,
}
