use crate::errors::{BifPreviewError, BifPreviewResult, SourceError};
use async_trait::async_trait;
use log::info;
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Anything that can hand over the complete raw bytes of a BIF file
#[async_trait]
pub trait BifSource: Send + Sync {
    async fn fetch(&self) -> BifPreviewResult<Vec<u8>>;

    fn describe(&self) -> String;
}

pub struct HttpBifSource {
    url: String,
    client: Client,
}

impl HttpBifSource {
    pub fn new(url: impl Into<String>) -> BifPreviewResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::new(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl BifSource for HttpBifSource {
    async fn fetch(&self) -> BifPreviewResult<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::new(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BifPreviewError::Source(SourceError::new(format!(
                "Failed to download BIF ({})",
                response.status()
            ))));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::new(e.to_string()))?;
        info!("Downloaded BIF: {} bytes from {}", bytes.len(), self.url);
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

pub struct LocalBifSource {
    path: PathBuf,
}

impl LocalBifSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl BifSource for LocalBifSource {
    async fn fetch(&self) -> BifPreviewResult<Vec<u8>> {
        let data = tokio::fs::read(&self.path).await?;
        info!("Read BIF: {} bytes from {}", data.len(), self.path.display());
        Ok(data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick a source from a URL or a local path.
pub fn open_source(source: &str) -> BifPreviewResult<Box<dyn BifSource>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Box::new(HttpBifSource::new(source)?))
    } else {
        Ok(Box::new(LocalBifSource::new(source)))
    }
}

/// URL of the download endpoint serving a stored BIF file.
///
/// `bif_path` is sent as one percent-encoded path segment.
pub fn bif_download_url(base: &str, bif_path: &str) -> BifPreviewResult<String> {
    let mut url =
        Url::parse(base).map_err(|e| SourceError::new(format!("invalid base URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| SourceError::new("base URL cannot carry a path"))?
        .pop_if_empty()
        .extend(["api", "download", "bif", bif_path]);
    Ok(url.to_string())
}
