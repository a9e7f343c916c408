use std::path::Path;
use tower_http::services::ServeDir;

/// Serve stored photos from the uploads directory
pub fn uploads_service(upload_dir: impl AsRef<Path>) -> ServeDir {
    ServeDir::new(upload_dir.as_ref())
}
