use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use std::path::Path;

/// A photo selected on the client
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl PhotoFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read a photo from disk, guessing its media type from the extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(file_name, mime_type, Bytes::from(data)))
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.data)
        )
    }
}
