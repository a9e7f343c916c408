use anyhow::Context;
use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::error::AppError;
use crate::records::{MemoryRecordStore, RecordStore, SqliteRecordStore};

/// Open the configured database, falling back to memory only in offline mode
pub async fn open(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let opened = async {
        let db = Database::new(&config.database.url, config.database.max_connections).await?;
        db.run_migrations().await?;
        Ok::<_, AppError>(db)
    }
    .await;

    match opened {
        Ok(db) => {
            tracing::info!("Database initialized");
            Ok(Arc::new(SqliteRecordStore::new(db)))
        }
        Err(e) if config.offline => {
            tracing::warn!(
                "Database unavailable ({}); offline mode keeps registrations in memory only",
                e
            );
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to open database {}", config.database.url)),
    }
}
