use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{AppError, Result},
};

/// Authenticated access to the Spotify Web API.
///
/// Cheap to clone: the underlying `reqwest::Client` pools connections and the
/// configuration is shared.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
}

impl SpotifyClient {
    /// Creates a client whose requests time out after
    /// [`Config::request_timeout`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`] if the TLS backend cannot be initialised.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Sends a bearer-authenticated request to `{api_url}/{path}`.
    ///
    /// Responses with `429 Too Many Requests` or a `5xx` status are retried up
    /// to [`Config::max_retries`] times, except that `POST` is only retried on
    /// `429`. A `Retry-After` header is honoured as long as it does not exceed
    /// [`Config::max_retry_after`]; otherwise the delay grows exponentially
    /// from [`Config::retry_backoff`].
    ///
    /// The response is returned as is, whatever its status. Use
    /// [`SpotifyClient::call`] or [`SpotifyClient::classify`] to turn failures
    /// into errors.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`] for network errors and timeouts.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        token: &str,
        body: Option<&Value>,
    ) -> Result<Response> {
        let url = format!(
            "{base}/{path}",
            base = self.config.api_url.trim_end_matches('/'),
            path = path.trim_start_matches('/')
        );

        let mut attempt: u32 = 0;
        loop {
            debug!(%method, %url, attempt, "calling Spotify API");

            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(token)
                .query(query);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            // A 5xx on POST may come after the write went through
            let retryable = status == StatusCode::TOO_MANY_REQUESTS
                || (status.is_server_error() && method != Method::POST);
            if !retryable || attempt >= self.config.max_retries {
                return Ok(response);
            }

            let Some(delay) = self.retry_delay(&response, attempt) else {
                return Ok(response);
            };

            warn!(
                %status,
                %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Spotify API call failed, retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    /// Like [`SpotifyClient::send`], but any non-2xx status becomes
    /// [`AppError::Upstream`].
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        token: &str,
        body: Option<&Value>,
    ) -> Result<Response> {
        let response = self.send(method, path, query, token, body).await?;
        Self::classify(response, |status| status.is_success()).await
    }

    /// Passes `response` through if `accept` approves its status, otherwise
    /// reads the body and reports status and body as [`AppError::Upstream`].
    pub async fn classify(
        response: Response,
        accept: impl Fn(StatusCode) -> bool,
    ) -> Result<Response> {
        let status = response.status();
        if accept(status) {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Upstream {
            status: status.as_u16(),
            body,
        })
    }

    fn retry_delay(&self, response: &Response, attempt: u32) -> Option<Duration> {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        match retry_after {
            Some(delay) if delay > self.config.max_retry_after => {
                warn!(
                    retry_after_secs = delay.as_secs(),
                    "Retry-After is abnormally high, giving up"
                );
                None
            }
            Some(delay) => Some(delay),
            None => Some(
                self.config
                    .retry_backoff
                    .saturating_mul(2u32.saturating_pow(attempt)),
            ),
        }
    }
}
