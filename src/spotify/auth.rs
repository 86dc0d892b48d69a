use reqwest::{StatusCode, Url, header::AUTHORIZATION};

use crate::{
    config::Config,
    error::{AppError, Result},
    spotify::SpotifyClient,
    types::{Token, TokenResponse},
    utils,
};

/// Builds the Spotify authorization URL a user is sent to for login.
///
/// The URL requests an authorization code for the configured scope and
/// redirect URI and carries a random `state` nonce.
///
/// # Arguments
///
/// * `config` - Relay configuration with client id, redirect URI and scope
/// * `show_dialog` - Forces Spotify to show the consent dialog again, even if
///   the user already approved the application
///
/// # Errors
///
/// Returns [`AppError::Config`] if the configured authorize URL is not a
/// valid URL.
///
/// # Example
///
/// ```
/// let url = authorize_url(&config, true)?;
/// // https://accounts.spotify.com/authorize?client_id=...&show_dialog=true
/// ```
pub fn authorize_url(config: &Config, show_dialog: bool) -> Result<String> {
    let state = utils::generate_state();
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("scope", config.scope.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("state", state.as_str()),
            ("show_dialog", if show_dialog { "true" } else { "false" }),
        ],
    )
    .map_err(|e| AppError::Config(format!("invalid authorize URL: {e}")))?;

    Ok(url.into())
}

/// Exchanges an authorization code for an access/refresh token pair.
///
/// Posts `grant_type=authorization_code` to the token endpoint with the
/// client credentials in a Basic `Authorization` header.
///
/// # Errors
///
/// - [`AppError::Auth`] if the token endpoint answers anything but `200 OK`,
///   with status and body in the message
/// - [`AppError::Http`] for network failures or an unreadable body
pub async fn exchange_code(client: &SpotifyClient, code: &str) -> Result<Token> {
    let config = client.config();
    let json = request_token(
        client,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await?;

    let refresh_token = json
        .refresh_token
        .ok_or_else(|| AppError::Auth("token response has no refresh_token".to_string()))?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token,
        expires_at: utils::now_timestamp() + json.expires_in as f64,
    })
}

/// Obtains a new access token with `refresh_token`.
///
/// Only the access token and the expiry change; the refresh token handed in is
/// returned unchanged.
///
/// # Errors
///
/// Same as [`exchange_code`].
pub async fn refresh_token(client: &SpotifyClient, refresh_token: &str) -> Result<Token> {
    let json = request_token(
        client,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token: refresh_token.to_string(),
        expires_at: utils::now_timestamp() + json.expires_in as f64,
    })
}

async fn request_token(client: &SpotifyClient, form: &[(&str, &str)]) -> Result<TokenResponse> {
    let config = client.config();
    let res = client
        .http()
        .post(&config.token_url)
        .header(
            AUTHORIZATION,
            utils::basic_auth_header(&config.client_id, &config.client_secret),
        )
        .form(form)
        .send()
        .await?;

    let status = res.status();
    if status != StatusCode::OK {
        let body = res.text().await.unwrap_or_default();
        return Err(AppError::Auth(format!(
            "token endpoint returned {}: {}",
            status.as_u16(),
            body
        )));
    }

    Ok(res.json::<TokenResponse>().await?)
}
