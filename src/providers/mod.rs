/// Upstream provider gateway — the single point of entry for outbound HTTP.
///
/// All four providers (weather, air quality, exchange rate, news) are
/// reached through the same `Fetcher` capability: one GET, JSON body out.
/// Route handlers never touch reqwest directly.
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod air_quality;
pub mod exchange_rate;
pub mod news;
pub mod weather;

/// What went wrong talking to a provider. Handlers collapse all of these
/// into one generic user-facing message; the kind survives for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("provider response is missing `{0}`")]
    MissingField(String),
}

impl FetchError {
    pub fn missing(field: impl Into<String>) -> Self {
        FetchError::MissingField(field.into())
    }
}

/// Generic "fetch JSON from URL" capability.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get_json(&self, url: Url) -> Result<Value, FetchError>;
}

/// reqwest-backed fetcher. No retry and no timeout override: a slow
/// provider stalls only the requesting session's in-flight request.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        debug!(host = ?url.host_str(), path = url.path(), "provider request");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        let value = serde_json::from_str(&body)?;
        Ok(value)
    }
}
