use crate::error::LoaderError;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue};

/// The abstract interface for retrieving the raw text behind a source identifier.
/// This trait is the contract the loader uses, allowing the underlying
/// transport (HTTP, disk, or an in-memory stub) to be swapped out.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<String, LoaderError>;
}

/// Routes `http://` and `https://` identifiers to an HTTP client and treats
/// everything else as a local file path.
#[derive(Clone)]
pub struct DefaultFetcher {
    client: reqwest::Client,
}

impl DefaultFetcher {
    pub fn new() -> Result<Self, LoaderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: &str) -> Result<String, LoaderError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!(source = %url, status = status.as_u16(), "Response received.");

        if !status.is_success() {
            return Err(LoaderError::Status {
                source_id: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SourceFetcher for DefaultFetcher {
    async fn fetch(&self, source: &str) -> Result<String, LoaderError> {
        if is_url(source) {
            self.fetch_http(source).await
        } else {
            // Lossy like `Response::text`; a stray Latin-1 byte must not sink the file.
            let bytes = tokio::fs::read(source).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

fn is_url(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
