#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use spothelper::{
    config::Config,
    server::{self, AppState},
    spotify::SpotifyClient,
    utils,
};

pub const TOKEN: &str = "valid-token";

pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::with_credentials("cid", "secret", "http://127.0.0.1:5000/callback");
    config.api_url = base_url.to_string();
    config.token_url = format!("{base_url}/api/token");
    config.auth_url = format!("{base_url}/authorize");
    config.request_timeout = Duration::from_secs(5);
    config.max_retries = 0;
    config.retry_backoff = Duration::from_millis(10);
    config
}

pub fn test_client(base_url: &str) -> SpotifyClient {
    SpotifyClient::new(Arc::new(test_config(base_url))).unwrap()
}

/// Starts the relay on an ephemeral port and returns its base URL.
pub async fn spawn_relay(config: Config) -> String {
    let state = AppState::new(Arc::new(config)).unwrap();
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

pub fn future_expiry() -> String {
    format!("{}", utils::now_timestamp() + 3600.0)
}

pub fn past_expiry() -> String {
    format!("{}", utils::now_timestamp() - 60.0)
}

pub fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Playlist/saved-tracks page item in the shape Spotify returns it.
pub fn track_item(id: Option<&str>, name: &str, artist: Option<&str>, images: usize) -> serde_json::Value {
    let images: Vec<serde_json::Value> = (0..images)
        .map(|i| serde_json::json!({ "url": format!("https://i.scdn.co/image/{i}"), "height": 640, "width": 640 }))
        .collect();
    let artists: Vec<serde_json::Value> = artist
        .map(|a| vec![serde_json::json!({ "name": a })])
        .unwrap_or_default();

    serde_json::json!({
        "added_at": "2024-01-01T00:00:00Z",
        "track": {
            "id": id,
            "name": name,
            "album": { "images": images },
            "artists": artists,
            "preview_url": null
        }
    })
}
