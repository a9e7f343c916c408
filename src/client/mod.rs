//! Submission client for the registration endpoint.
//!
//! [`RegistrationClient`] owns the form state a UI renders from and sends at
//! most one request per accepted submit through a [`SubmitTransport`].

pub mod form;
pub mod photo;
pub mod transport;

pub use form::*;
pub use photo::*;
pub use transport::*;

use crate::models::RegistrationFields;

/// Why a submit did not succeed
#[derive(Debug, thiserror::Error)]
pub enum SubmitFailure {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unsupported photo type: {0}")]
    UnsupportedPhoto(String),

    #[error("A submission is already in progress or complete")]
    Busy,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Registration rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Outcome of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSuccess {
    /// Record id, when the transport can observe the response
    pub record_id: Option<String>,
}

pub struct RegistrationClient {
    transport: Box<dyn SubmitTransport>,
    form: FormState,
}

impl RegistrationClient {
    pub fn new(transport: Box<dyn SubmitTransport>) -> Self {
        Self {
            transport,
            form: FormState::new(),
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Load `fields` and `photo` into the form and submit it
    pub async fn submit(
        &mut self,
        fields: RegistrationFields,
        photo: Option<PhotoFile>,
    ) -> Result<SubmitSuccess, SubmitFailure> {
        if self.form.status() != SubmitStatus::Idle {
            return Err(SubmitFailure::Busy);
        }
        self.form.set_fields(fields);
        match photo {
            Some(photo) => self.form.select_photo(photo),
            None => self.form.clear_photo(),
        }
        self.submit_form().await
    }

    /// Submit the current form. No retry: a failure returns the form to idle.
    pub async fn submit_form(&mut self) -> Result<SubmitSuccess, SubmitFailure> {
        if self.form.status() != SubmitStatus::Idle {
            return Err(SubmitFailure::Busy);
        }
        self.form.check()?;

        let (fields, photo) = match (self.form.fields(), self.form.photo()) {
            (fields, Some(photo)) => (fields.trimmed(), photo.clone()),
            (_, None) => return Err(SubmitFailure::MissingField("photo")),
        };

        self.form.begin_submit();
        tracing::debug!(
            "Submitting registration via {} ({} byte photo)",
            self.transport.name(),
            photo.data.len()
        );

        match self.transport.send(&fields, &photo).await {
            Ok(record_id) => {
                self.form.finish(true);
                Ok(SubmitSuccess { record_id })
            }
            Err(e) => {
                tracing::warn!("Registration submit failed: {}", e);
                self.form.finish(false);
                Err(e)
            }
        }
    }

    /// Clear the form for another registration
    pub fn reset(&mut self) {
        self.form = FormState::new();
    }
}
