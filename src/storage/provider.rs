use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Durable storage for uploaded photos
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Write a new photo under `name`. Must not overwrite an existing file.
    async fn put(&self, name: &str, data: Bytes) -> Result<()>;

    /// Public path the stored photo is served from
    fn public_path(&self, name: &str) -> String;

    /// Get the storage type name
    fn storage_type(&self) -> &'static str;
}
