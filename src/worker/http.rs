//! HTTP transport that streams a document straight to disk

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::HttpSettings;
use crate::humanize::ByteSize;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("File was not completely downloaded {} / {}", human(.received), human(.expected))]
    Incomplete { received: u64, expected: u64 },

    #[error("Empty response body")]
    EmptyBody,

    #[error("Failed to write destination: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DownloadError>;

fn human(bytes: &u64) -> ByteSize {
    ByteSize(*bytes)
}

/// Retrieves one source reference into a destination file.
///
/// Implementations write directly to `dest` and may leave a partial file
/// behind on error; removing it is the caller's responsibility.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the number of bytes written on full success
    async fn download_to(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig::from(&HttpSettings::default())
    }
}

impl From<&HttpSettings> for HttpConfig {
    fn from(settings: &HttpSettings) -> Self {
        Self {
            connect_timeout: settings.connect_timeout(),
            read_timeout: settings.read_timeout(),
            user_agent: settings.user_agent.clone(),
        }
    }
}

/// HTTP downloader
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| DownloadError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }

    async fn open(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                DownloadError::InvalidUrl(format!("{}: {}", url, e))
            } else if e.is_timeout() {
                DownloadError::Timeout
            } else if e.is_redirect() {
                DownloadError::TooManyRedirects
            } else {
                DownloadError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        debug!(url, dest = %dest.display(), "Starting download");

        let mut response = self.open(url).await?;
        let expected = response.content_length();
        let mut file = File::create(dest).await?;
        let mut received: u64 = 0;

        loop {
            let chunk = match response.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                // A stream that breaks off before the declared length is a short transfer
                Err(e) => {
                    return Err(match expected {
                        Some(expected) if received < expected => {
                            DownloadError::Incomplete { received, expected }
                        }
                        _ if e.is_timeout() => DownloadError::Timeout,
                        _ => DownloadError::RequestFailed(format!("Failed to read body: {}", e)),
                    });
                }
            };

            file.write_all(&chunk).await?;
            received += chunk.len() as u64;
        }

        file.flush().await?;
        drop(file);

        if let Some(expected) = expected {
            if received < expected {
                return Err(DownloadError::Incomplete { received, expected });
            }
        }
        if received == 0 {
            return Err(DownloadError::EmptyBody);
        }

        debug!(url, size = %ByteSize(received), "Download completed");
        Ok(received)
    }
}
