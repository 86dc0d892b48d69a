use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    api,
    config::Config,
    error::{AppError, Result},
    spotify::SpotifyClient,
};

/// Shared, read-only state of the relay. Holds no per-user data.
#[derive(Debug, Clone)]
pub struct AppState {
    pub spotify: SpotifyClient,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Ok(Self {
            spotify: SpotifyClient::new(config)?,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/get-auth-url-dialog", get(api::auth_url_dialog))
        .route("/get-auth-url-no-dialog", get(api::auth_url_no_dialog))
        .route("/callback", get(api::callback))
        .route(
            "/refresh-token/{expires_at}/{refresh_token}",
            get(api::refresh_token),
        )
        .route(
            "/get-playlists/{expires_at}/{access_token}",
            get(api::get_playlists),
        )
        .route(
            "/get-tracks-total/{playlist_id}/{expires_at}/{access_token}",
            get(api::get_tracks_total),
        )
        .route(
            "/get-all-tracks/{playlist_id}/{expires_at}/{access_token}/{offset}",
            get(api::get_all_tracks),
        )
        .route(
            "/check-liked/{expires_at}/{access_token}",
            post(api::check_liked),
        )
        .route(
            "/add-to-playlists/{expires_at}/{access_token}",
            post(api::add_to_playlists),
        )
        .route(
            "/remove-tracks/{origin_id}/{snapshot_id}/{expires_at}/{access_token}",
            post(api::remove_tracks),
        )
        .route(
            "/move-to-playlists/{origin_id}/{snapshot_id}/{expires_at}/{access_token}",
            post(api::move_to_playlists),
        )
        .route(
            "/get-user-info/{expires_at}/{access_token}",
            get(api::get_user_info),
        )
        .with_state(state)
}

pub async fn start_api_server(config: Arc<Config>) -> Result<()> {
    let addr = SocketAddr::from_str(&config.server_addr).map_err(|e| {
        AppError::Config(format!(
            "Failed to parse server address '{}': {}",
            config.server_addr, e
        ))
    })?;

    let app = router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
