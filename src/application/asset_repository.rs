// Repository trait for static branding assets
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetCacheError {
    #[error("invalid asset name {0:?}")]
    InvalidName(String),
    #[error("failed to read cached asset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch asset from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to write cached asset {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Bytes for a logical asset name, served locally once fetched
    async fn get_asset(&self, name: &str) -> Result<Bytes, AssetCacheError>;
}
