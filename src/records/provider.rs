use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewRegistration, RegistrationRecord};

/// System of record for registrations.
///
/// Implementations assign the identifier and creation timestamp and are
/// expected to serialize their own writes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new registration and return the stored record
    async fn create(&self, registration: NewRegistration) -> Result<RegistrationRecord>;

    /// Number of stored registrations
    async fn count(&self) -> Result<i64>;

    /// Get the store type name
    fn store_type(&self) -> &'static str;
}

/// Build a record with a fresh identifier and timestamp
pub(crate) fn new_record(registration: NewRegistration) -> RegistrationRecord {
    let fields = registration.fields;
    RegistrationRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: fields.name,
        college: fields.college,
        email: fields.email,
        mobile: fields.mobile,
        photo_path: registration.photo_path,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}
