//! Asset source abstraction for testability.
//!
//! The [`AssetSource`] trait is the fetch half of a cache load: it returns
//! the raw text of the asset export. Parsing happens in the cache so every
//! source gets the same validation.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default HTTP timeout for fetching a remote asset export.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching an asset source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Local file does not exist.
    #[error("Asset file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Local file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP client construction or transport failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Server answered with a non-success status.
    #[error("Failed to load {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },
}

/// Trait for fetching the raw text of an asset export.
///
/// Implementations only fetch; the cache parses and validates the text.
pub trait AssetSource: Send + Sync + 'static {
    /// Human-readable location of the source, used in logs and errors.
    fn describe(&self) -> String;

    /// Fetch the full source text.
    fn fetch(&self) -> impl Future<Output = Result<String, SourceError>> + Send;
}

/// Asset export stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(self.path.clone()))
            }
            Err(e) => Err(SourceError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Asset export served over HTTP(S).
///
/// Uses a reusable `reqwest::Client` with connection pooling and a timeout.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    http: reqwest::Client,
}

impl HttpSource {
    /// Creates a source with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_timeout(url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Creates a source with a custom request timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AssetSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| SourceError::HttpError(e.to_string()))?;

        tracing::debug!(url = %self.url, bytes = text.len(), "Fetched asset source");

        Ok(text)
    }
}

/// Source chosen at runtime from configuration or the command line.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    File(FileSource),
    Http(HttpSource),
}

impl ConfiguredSource {
    /// Interpret `location` as a URL if it has an http(s) scheme, else as a path.
    pub fn from_location(location: &str, timeout: Duration) -> Result<Self, SourceError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(Self::Http(HttpSource::with_timeout(location, timeout)?))
        } else {
            Ok(Self::File(FileSource::new(location)))
        }
    }
}

impl AssetSource for ConfiguredSource {
    fn describe(&self) -> String {
        match self {
            Self::File(source) => source.describe(),
            Self::Http(source) => source.describe(),
        }
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        match self {
            Self::File(source) => source.fetch().await,
            Self::Http(source) => source.fetch().await,
        }
    }
}

/// Fixed in-memory text, for embedded datasets and tests.
#[derive(Debug, Clone)]
pub struct StaticSource {
    text: std::sync::Arc<str>,
}

impl StaticSource {
    pub fn new(text: impl Into<std::sync::Arc<str>>) -> Self {
        Self { text: text.into() }
    }
}

impl AssetSource for StaticSource {
    fn describe(&self) -> String {
        "<static>".to_string()
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        Ok(self.text.to_string())
    }
}
