use crate::{
    error::{AppError, Result},
    utils,
};

/// Caller-supplied credentials of a single request.
///
/// The relay keeps no session: every protected route hands its
/// `{expiresAt}/{accessToken}` path segments to [`TokenManager::from_path`]
/// and asks for a valid token before talking to Spotify. An expired token is
/// never refreshed here; the caller has to go through `/refresh-token`.
#[derive(Debug, Clone)]
pub struct TokenManager {
    access_token: String,
    expires_at: f64,
}

impl TokenManager {
    pub fn new(access_token: impl Into<String>, expires_at: f64) -> Self {
        TokenManager {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Builds the manager from raw path segments.
    ///
    /// # Errors
    ///
    /// - [`AppError::AuthMissing`] if the access token is blank
    /// - [`AppError::Validation`] if the expiry is missing, zero or not a number
    pub fn from_path(expires_at: &str, access_token: &str) -> Result<Self> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(AppError::AuthMissing);
        }

        let expires_at = parse_expires_at(expires_at)?;
        Ok(Self::new(access_token, expires_at))
    }

    pub fn is_expired(&self) -> bool {
        utils::now_timestamp() > self.expires_at
    }

    /// Returns the access token if it has not expired yet.
    pub fn valid_token(&self) -> Result<&str> {
        if self.is_expired() {
            tracing::debug!(expires_at = self.expires_at, "access token expired");
            return Err(AppError::TokenExpired);
        }
        Ok(&self.access_token)
    }
}

/// Parses an `expiresAt` path segment (unix seconds, fractions allowed).
pub fn parse_expires_at(raw: &str) -> Result<f64> {
    let missing = || AppError::Validation("No expiration time received".to_string());

    let value: f64 = raw.trim().parse().map_err(|_| missing())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(missing());
    }
    Ok(value)
}
