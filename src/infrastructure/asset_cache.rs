// File-backed cache for static assets served from a CDN
use crate::application::asset_repository::{AssetCacheError, AssetRepository};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Assets are immutable once cached: a hit is never revalidated against the CDN.
#[derive(Debug, Clone)]
pub struct FileAssetCache {
    cache_dir: PathBuf,
    cdn_base: String,
    client: reqwest::Client,
}

impl FileAssetCache {
    pub fn new(cache_dir: impl Into<PathBuf>, cdn_base: String) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            cdn_base: cdn_base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn local_path(&self, name: &str) -> Result<PathBuf, AssetCacheError> {
        let is_plain_file_name = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !is_plain_file_name {
            return Err(AssetCacheError::InvalidName(name.to_string()));
        }
        Ok(self.cache_dir.join(name))
    }

    /// Cached bytes, or `None` when the entry is missing or empty
    async fn read_cached(&self, path: &Path) -> Result<Option<Bytes>, AssetCacheError> {
        match tokio::fs::read(path).await {
            Ok(data) if data.is_empty() => {
                tracing::warn!("Ignoring empty cache entry {}", path.display());
                Ok(None)
            }
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(None)
            }
            Err(source) => Err(AssetCacheError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    async fn download(&self, name: &str) -> Result<Bytes, AssetCacheError> {
        let url = format!("{}/{}", self.cdn_base, urlencoding::encode(name));
        tracing::debug!("Fetching asset from {}", url);

        let fetch_error = |reason: String| AssetCacheError::Fetch {
            url: url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("status {}", response.status())));
        }

        response.bytes().await.map_err(|e| fetch_error(e.to_string()))
    }

    /// Write through a temporary sibling so readers never observe a partial file
    async fn persist(&self, path: &Path, data: &[u8]) -> Result<(), AssetCacheError> {
        let write_error = |source| AssetCacheError::Write {
            path: path.to_path_buf(),
            source,
        };

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(write_error)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = self.cache_dir.join(format!(
            ".{}.{}-{}.tmp",
            file_name,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(source) = tokio::fs::write(&temp_path, data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(source));
        }
        if let Err(source) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(source));
        }

        Ok(())
    }
}

#[async_trait]
impl AssetRepository for FileAssetCache {
    async fn get_asset(&self, name: &str) -> Result<Bytes, AssetCacheError> {
        let path = self.local_path(name)?;

        if let Some(cached) = self.read_cached(&path).await? {
            tracing::debug!("Asset cache hit for {}", name);
            return Ok(cached);
        }

        let data = self.download(name).await?;
        self.persist(&path, &data).await?;
        tracing::info!("Cached asset {} ({} bytes)", name, data.len());

        Ok(data)
    }
}
