use crate::client::{PhotoFile, SubmitFailure};
use crate::models::{PhotoType, RegistrationFields};

/// Submit lifecycle a UI renders from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Succeeded,
}

/// Client-held form values
#[derive(Debug, Clone)]
pub struct FormState {
    fields: RegistrationFields,
    photo: Option<PhotoFile>,
    status: SubmitStatus,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            fields: RegistrationFields::default(),
            photo: None,
            status: SubmitStatus::Idle,
        }
    }

    pub fn fields(&self) -> &RegistrationFields {
        &self.fields
    }

    pub fn photo(&self) -> Option<&PhotoFile> {
        self.photo.as_ref()
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// Update a text field by form name. Unknown names are ignored.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) {
        if !self.fields.set(field, value) {
            tracing::debug!("Ignoring unknown form field {}", field);
        }
    }

    pub fn set_fields(&mut self, fields: RegistrationFields) {
        self.fields = fields;
    }

    pub fn select_photo(&mut self, photo: PhotoFile) {
        self.photo = Some(photo);
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
    }

    /// Preconditions for dispatching a submission
    pub fn check(&self) -> Result<(), SubmitFailure> {
        if let Some(field) = self.fields.missing_field() {
            return Err(SubmitFailure::MissingField(field));
        }
        let photo = self
            .photo
            .as_ref()
            .ok_or(SubmitFailure::MissingField("photo"))?;
        if PhotoType::from_mime(&photo.mime_type).is_none() {
            return Err(SubmitFailure::UnsupportedPhoto(photo.mime_type.clone()));
        }
        Ok(())
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        self.status == SubmitStatus::Idle && self.check().is_ok()
    }

    pub(crate) fn begin_submit(&mut self) {
        self.status = SubmitStatus::Submitting;
    }

    pub(crate) fn finish(&mut self, succeeded: bool) {
        self.status = if succeeded {
            SubmitStatus::Succeeded
        } else {
            SubmitStatus::Idle
        };
    }
}
