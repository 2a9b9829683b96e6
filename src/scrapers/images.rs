use async_trait::async_trait;
use futures::StreamExt;
use percent_encoding::percent_decode_str;
use reqwest::{Client, Response};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::config::RetryPolicy;
use crate::error::{Result, ScrapeError};
use crate::parsers::{ImageRef, Sanitizer};
use crate::utils::http::fetch_with_retry;

/// Thumbnails live under `<original>/revision/latest/scale-to-width-down/...`.
const REVISION_MARKER: &str = "/revision";

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download `image` into `destination` and return the stored asset name.
    async fn fetch(&self, image: &ImageRef, destination: &Path) -> Result<String>;
}

/// Strip the revision suffix of a thumbnail URL, leaving the original asset.
///
/// Only a whole `revision` path segment counts, so asset names such as
/// `revision_notes.png` are left alone.
pub fn full_size_url(src: &str) -> &str {
    let segment_end = |rest: &str| matches!(rest.chars().next(), None | Some('/' | '?' | '#'));
    match src
        .match_indices(REVISION_MARKER)
        .find(|&(i, m)| segment_end(&src[i + m.len()..]))
    {
        Some((i, _)) => &src[..i],
        None => src,
    }
}

/// Asset name from the key attribute, or the URL's last path segment without one.
pub fn asset_name(image: &ImageRef, full_url: &str, sanitizer: &Sanitizer) -> String {
    let raw = match image.key.as_deref() {
        Some(key) if !key.trim().is_empty() => key,
        _ => full_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default(),
    };
    sanitizer.sanitize(&percent_decode_str(raw).decode_utf8_lossy())
}

/// Downloads full-size images over HTTP, streaming each body to disk.
pub struct HttpImageFetcher {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
    sanitizer: Sanitizer,
}

impl HttpImageFetcher {
    pub fn new(client: Client, base_url: &str, retry: RetryPolicy, sanitizer: Sanitizer) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScrapeError::Config(format!("base_url '{}': {}", base_url, e)))?;
        Ok(Self {
            client,
            base_url,
            retry,
            sanitizer,
        })
    }

    /// Resolves relative and protocol-relative sources against the wiki base URL.
    fn resolve(&self, src: &str) -> Result<Url> {
        self.base_url
            .join(src)
            .map_err(|e| ScrapeError::Parse(format!("invalid image source '{}': {}", src, e)))
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, image: &ImageRef, destination: &Path) -> Result<String> {
        let resolved = self.resolve(&image.src)?;
        let url = full_size_url(resolved.as_str()).to_string();
        let name = asset_name(image, &url, &self.sanitizer);
        if name.is_empty() {
            return Err(ScrapeError::Parse(format!("image {} has no usable name", url)));
        }

        debug!("Fetching image {} as {}", url, name);
        let response = fetch_with_retry(&self.client, &url, self.retry).await?;

        let path = destination.join(&name);
        let partial = destination.join(format!("{}.part", name));
        if let Err(e) = write_body(response, &url, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        tokio::fs::rename(&partial, &path)
            .await
            .map_err(|e| ScrapeError::fs(&path, e))?;

        info!("Saved image {}", path.display());
        Ok(name)
    }
}

async fn write_body(response: Response, url: &str, path: &Path) -> Result<()> {
    let mut file = File::create(path).await.map_err(|e| ScrapeError::fs(path, e))?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ScrapeError::transport(url, e))?;
        file.write_all(&chunk).await.map_err(|e| ScrapeError::fs(path, e))?;
    }

    file.flush().await.map_err(|e| ScrapeError::fs(path, e))?;
    Ok(())
}
