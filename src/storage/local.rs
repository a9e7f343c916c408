use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::storage::PhotoStorage;

/// Local file system photo storage
pub struct LocalStorage {
    base_path: PathBuf,
    public_prefix: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            base_path: base_path.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.upload_dir, &config.public_prefix)
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    fn get_full_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

#[async_trait]
impl PhotoStorage for LocalStorage {
    async fn put(&self, name: &str, data: Bytes) -> Result<()> {
        let full_path = self.get_full_path(name);

        // The uploads directory may have been removed since boot
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create upload directory {:?}: {}", parent, e))
            })?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create {:?}: {}", full_path, e)))?;
        file.write_all(&data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {:?}: {}", full_path, e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to flush {:?}: {}", full_path, e)))?;

        tracing::debug!("Saved photo to {:?} ({} bytes)", full_path, data.len());
        Ok(())
    }

    fn public_path(&self, name: &str) -> String {
        format!("{}/{}", self.public_prefix, name)
    }

    fn storage_type(&self) -> &'static str {
        "local"
    }
}
