use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted registration
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub id: String,
    pub name: String,
    pub college: String,
    pub email: String,
    pub mobile: String,
    pub photo_path: String,
    pub created_at: String,
}

/// The four text fields of a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFields {
    pub name: String,
    pub college: String,
    pub email: String,
    pub mobile: String,
}

impl RegistrationFields {
    pub const NAMES: [&'static str; 4] = ["name", "college", "email", "mobile"];

    /// First field that is empty after trimming
    pub fn missing_field(&self) -> Option<&'static str> {
        Self::NAMES
            .into_iter()
            .zip([&self.name, &self.college, &self.email, &self.mobile])
            .find(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
    }

    /// Set a field by its form name. Returns false for unknown names.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "college" => &mut self.college,
            "email" => &mut self.email,
            "mobile" => &mut self.mobile,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            college: self.college.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
        }
    }
}

/// Photo bytes as received from the client
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl PhotoUpload {
    /// Original extension, lowercased; `bin` when the name has none
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// A validated submission ready to be stored
#[derive(Debug, Clone)]
pub struct RegistrationSubmission {
    pub fields: RegistrationFields,
    pub photo: PhotoUpload,
}

/// Insert payload handed to a record store
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub fields: RegistrationFields,
    pub photo_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> RegistrationFields {
        RegistrationFields {
            name: "Asha Rao".to_string(),
            college: "IIT Delhi".to_string(),
            email: "asha@example.com".to_string(),
            mobile: "+911234567890".to_string(),
        }
    }

    #[test]
    fn missing_field_reports_first_blank() {
        assert_eq!(fields().missing_field(), None);

        let mut f = fields();
        f.college = "   ".to_string();
        assert_eq!(f.missing_field(), Some("college"));

        f.name.clear();
        assert_eq!(f.missing_field(), Some("name"));
    }

    #[test]
    fn set_by_form_name() {
        let mut f = RegistrationFields::default();
        assert!(f.set("mobile", "123"));
        assert!(!f.set("photo", "x"));
        assert_eq!(f.mobile, "123");
    }

    #[test]
    fn extension_falls_back_to_bin() {
        let photo = |name: &str| PhotoUpload {
            file_name: name.to_string(),
            content_type: None,
            data: Bytes::from_static(b"x"),
        };
        assert_eq!(photo("sample.JPG").extension(), "jpg");
        assert_eq!(photo("archive.tar.png").extension(), "png");
        assert_eq!(photo("noext").extension(), "bin");
        assert_eq!(photo("").extension(), "bin");
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = RegistrationRecord {
            id: "id".to_string(),
            name: "n".to_string(),
            college: "c".to_string(),
            email: "e".to_string(),
            mobile: "m".to_string(),
            photo_path: "/uploads/a.jpg".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["photoPath"], "/uploads/a.jpg");
        assert_eq!(json["createdAt"], "2026-01-01T00:00:00Z");
    }
}
