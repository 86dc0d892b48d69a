//! Configuration management for the SpotHelper relay.
//!
//! Configuration is read once at startup from environment variables and `.env`
//! files into a [`Config`] value, which is then handed to the server and the
//! Spotify client. Nothing in the crate reads credentials from globals.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory (`spothelper/.env`)
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::error::{AppError, Result};

const DEFAULT_SCOPE: &str = "playlist-read-private playlist-modify-private playlist-modify-public user-library-read user-library-modify user-read-private";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";

/// Runtime configuration of the relay.
///
/// Built with [`Config::from_env`] in the binary. Tests construct it directly
/// so that every URL can point at a local mock server.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub max_retry_after: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if one of the required credentials
    /// (`SPOTIFY_API_AUTH_CLIENT_ID`, `SPOTIFY_API_AUTH_CLIENT_SECRET`,
    /// `SPOTIFY_API_REDIRECT_URI`) is missing, or if a numeric setting cannot
    /// be parsed.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_API_REDIRECT_URI")?,
            scope: optional("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL),
            server_addr: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            request_timeout: Duration::from_secs(numeric("SPOTHELPER_REQUEST_TIMEOUT_SECS", 30)?),
            max_retries: numeric("SPOTHELPER_MAX_RETRIES", 3)?,
            retry_backoff: Duration::from_millis(numeric("SPOTHELPER_RETRY_BACKOFF_MS", 500)?),
            max_retry_after: Duration::from_secs(numeric("SPOTHELPER_MAX_RETRY_AFTER_SECS", 120)?),
        })
    }

    /// Returns a configuration with default endpoints and the given
    /// credentials. Timeouts and retry settings use their defaults.
    pub fn with_credentials(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_millis(500),
            max_retry_after: Duration::from_secs(120),
        }
    }
}

/// Loads environment variables from `.env` files.
///
/// Looks for `spothelper/.env` in the platform-specific local data directory
/// first and then for `.env` in the working directory. Missing files are not
/// an error; variables already present in the environment are never
/// overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spothelper/.env`
/// - macOS: `~/Library/Application Support/spothelper/.env`
/// - Windows: `%LOCALAPPDATA%/spothelper/.env`
///
/// # Errors
///
/// Returns an error string if an existing `.env` file cannot be parsed.
pub async fn load_env() -> std::result::Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spothelper/.env");

    if async_fs::metadata(&path).await.is_ok() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Config(format!("{key} must be set"))),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn numeric<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} must be a number, got '{value}'"))),
        _ => Ok(default),
    }
}
