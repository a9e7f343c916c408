use rand::Rng;

use crate::error::{AppError, Result};
use crate::models::{
    NewRegistration, PhotoUpload, RegistrationFields, RegistrationRecord, RegistrationSubmission,
};
use crate::records::RecordStore;
use crate::storage::PhotoStorage;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing fields";

/// Raw multipart values before validation
#[derive(Debug, Default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub college: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub photo: Option<PhotoUpload>,
}

impl RegistrationForm {
    /// Require every field to be present and non-blank
    pub fn into_submission(self) -> Result<RegistrationSubmission> {
        let fields = RegistrationFields {
            name: self.name.unwrap_or_default(),
            college: self.college.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            mobile: self.mobile.unwrap_or_default(),
        };

        if let Some(field) = fields.missing_field() {
            tracing::debug!("Submission missing field: {}", field);
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }

        // Browsers send an empty, unnamed part when no file was chosen
        let photo = self
            .photo
            .filter(|p| !p.data.is_empty())
            .ok_or_else(|| {
                tracing::debug!("Submission missing field: photo");
                AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())
            })?;

        Ok(RegistrationSubmission {
            fields: fields.trimmed(),
            photo,
        })
    }
}

/// Registration service
pub struct RegistrationService;

impl RegistrationService {
    /// Store the photo, then create the record that references it.
    ///
    /// Not transactional: if the record store fails the photo stays on disk.
    pub async fn register(
        records: &dyn RecordStore,
        photos: &dyn PhotoStorage,
        submission: RegistrationSubmission,
    ) -> Result<RegistrationRecord> {
        let RegistrationSubmission { fields, photo } = submission;

        let file_name = unique_file_name(&photo.extension());
        let content_type = photo
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        photos.put(&file_name, photo.data).await?;
        tracing::debug!("Stored photo {} ({})", file_name, content_type);
        let photo_path = photos.public_path(&file_name);

        let record = records
            .create(NewRegistration { fields, photo_path })
            .await
            .map_err(|e| {
                tracing::warn!("Photo {} orphaned by failed record insert", file_name);
                e
            })?;

        tracing::info!(
            "Registration {} created ({} store, {} storage)",
            record.id,
            records.store_type(),
            photos.storage_type()
        );
        Ok(record)
    }
}

/// `<unix micros>-<random 9 digits>.<ext>`
pub fn unique_file_name(extension: &str) -> String {
    let stamp = chrono::Utc::now().timestamp_micros();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{:09}.{}", stamp, suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MemoryRecordStore;
    use crate::storage::LocalStorage;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashSet;

    struct FailingStorage;

    #[async_trait]
    impl PhotoStorage for FailingStorage {
        async fn put(&self, _name: &str, _data: Bytes) -> Result<()> {
            Err(AppError::Storage("disk full".to_string()))
        }

        fn public_path(&self, name: &str) -> String {
            format!("/uploads/{}", name)
        }

        fn storage_type(&self) -> &'static str {
            "failing"
        }
    }

    struct FailingRecords;

    #[async_trait]
    impl RecordStore for FailingRecords {
        async fn create(&self, _registration: NewRegistration) -> Result<RegistrationRecord> {
            Err(AppError::Persistence(sqlx::Error::PoolClosed))
        }

        async fn count(&self) -> Result<i64> {
            Ok(0)
        }

        fn store_type(&self) -> &'static str {
            "failing"
        }
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: Some("Asha Rao".to_string()),
            college: Some("IIT Delhi".to_string()),
            email: Some("asha@example.com".to_string()),
            mobile: Some("+911234567890".to_string()),
            photo: Some(PhotoUpload {
                file_name: "sample.jpg".to_string(),
                content_type: Some("image/jpeg".to_string()),
                data: Bytes::from_static(b"\xff\xd8\xff\xe0jpeg"),
            }),
        }
    }

    #[test]
    fn every_missing_field_is_rejected() {
        let blanks: [fn(&mut RegistrationForm); 6] = [
            |f| f.name = None,
            |f| f.college = Some(String::new()),
            |f| f.email = Some("  ".to_string()),
            |f| f.mobile = None,
            |f| f.photo = None,
            |f| {
                if let Some(p) = f.photo.as_mut() {
                    p.data = Bytes::new();
                }
            },
        ];

        for blank in blanks {
            let mut f = form();
            blank(&mut f);
            let err = f.into_submission().unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == MISSING_FIELDS_MESSAGE));
        }
    }

    #[test]
    fn submission_fields_are_trimmed() {
        let mut f = form();
        f.name = Some("  Asha Rao ".to_string());
        let submission = f.into_submission().unwrap();
        assert_eq!(submission.fields.name, "Asha Rao");
    }

    #[test]
    fn file_names_are_unique_and_keep_extension() {
        let names: HashSet<String> = (0..1000).map(|_| unique_file_name("jpg")).collect();
        assert_eq!(names.len(), 1000);
        assert!(names.iter().all(|n| n.ends_with(".jpg")));
    }

    #[tokio::test]
    async fn register_writes_one_file_and_one_record() {
        let tmp = tempfile::tempdir().unwrap();
        let photos = LocalStorage::new(tmp.path(), "/uploads");
        let records = MemoryRecordStore::new();

        let submission = form().into_submission().unwrap();
        let record = RegistrationService::register(&records, &photos, submission)
            .await
            .unwrap();

        assert_eq!(record.name, "Asha Rao");
        assert_eq!(record.college, "IIT Delhi");
        assert!(record.photo_path.starts_with("/uploads/"));
        assert!(record.photo_path.ends_with(".jpg"));

        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let stored = entries[0].as_ref().unwrap().file_name();
        assert_eq!(
            record.photo_path,
            format!("/uploads/{}", stored.to_string_lossy())
        );
        assert_eq!(records.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn identical_names_do_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let photos = LocalStorage::new(tmp.path(), "/uploads");
        let records = MemoryRecordStore::new();

        for _ in 0..3 {
            let submission = form().into_submission().unwrap();
            RegistrationService::register(&records, &photos, submission)
                .await
                .unwrap();
        }

        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 3);
        let paths: HashSet<String> = records
            .records()
            .await
            .into_iter()
            .map(|r| r.photo_path)
            .collect();
        assert_eq!(paths.len(), 3);
    }

    #[tokio::test]
    async fn storage_failure_creates_no_record() {
        let records = MemoryRecordStore::new();
        let submission = form().into_submission().unwrap();

        let err = RegistrationService::register(&records, &FailingStorage, submission)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(records.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn persistence_failure_leaves_orphaned_photo() {
        let tmp = tempfile::tempdir().unwrap();
        let photos = LocalStorage::new(tmp.path(), "/uploads");
        let submission = form().into_submission().unwrap();

        let err = RegistrationService::register(&FailingRecords, &photos, submission)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
