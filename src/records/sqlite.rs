use async_trait::async_trait;

use crate::db::Database;
use crate::error::Result;
use crate::models::{NewRegistration, RegistrationRecord};
use crate::records::{new_record, RecordStore};

/// Registrations table in SQLite
#[derive(Clone)]
pub struct SqliteRecordStore {
    db: Database,
}

impl SqliteRecordStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: &str) -> Result<Option<RegistrationRecord>> {
        let record: Option<RegistrationRecord> =
            sqlx::query_as("SELECT * FROM registrations WHERE id = ?")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;
        Ok(record)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, registration: NewRegistration) -> Result<RegistrationRecord> {
        let record = new_record(registration);

        sqlx::query(
            r#"
            INSERT INTO registrations (id, name, college, email, mobile, photo_path, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.college)
        .bind(&record.email)
        .bind(&record.mobile)
        .bind(&record.photo_path)
        .bind(&record.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(record)
    }

    async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    fn store_type(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegistrationFields;

    async fn store() -> SqliteRecordStore {
        // A single connection keeps the in-memory database alive across queries
        let db = Database::new("sqlite::memory:", 1).await.unwrap();
        db.run_migrations().await.unwrap();
        SqliteRecordStore::new(db)
    }

    fn registration(name: &str) -> NewRegistration {
        NewRegistration {
            fields: RegistrationFields {
                name: name.to_string(),
                college: "IIT Delhi".to_string(),
                email: "asha@example.com".to_string(),
                mobile: "+911234567890".to_string(),
            },
            photo_path: "/uploads/1-1.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_persists() {
        let store = store().await;

        let record = store.create(registration("Asha Rao")).await.unwrap();
        assert!(!record.id.is_empty());
        assert!(!record.created_at.is_empty());

        let stored = store.get(&record.id).await.unwrap().unwrap();
        assert_eq!(stored, record);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_submissions_create_distinct_records() {
        let store = store().await;

        let a = store.create(registration("Asha Rao")).await.unwrap();
        let b = store.create(registration("Asha Rao")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
