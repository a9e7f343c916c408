use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::client::{PhotoFile, SubmitFailure};
use crate::models::{PhotoType, RegistrationFields, RegistrationRecord};

/// How a submission leaves the client
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    /// Send one submission. Returns the record id when it can be observed.
    async fn send(
        &self,
        fields: &RegistrationFields,
        photo: &PhotoFile,
    ) -> Result<Option<String>, SubmitFailure>;

    fn name(&self) -> &'static str;
}

/// Multipart POST to the registration endpoint
pub struct MultipartTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl MultipartTransport {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Target `<base>/api/register`
    pub fn for_server(http: reqwest::Client, base_url: &str) -> Self {
        Self::new(
            http,
            format!("{}/api/register", base_url.trim_end_matches('/')),
        )
    }

    fn build_form(fields: &RegistrationFields, photo: &PhotoFile) -> Result<Form, SubmitFailure> {
        let mime = PhotoType::from_mime(&photo.mime_type)
            .map(|t| t.mime())
            .unwrap_or(photo.mime_type.as_str());
        let part = Part::bytes(photo.data.to_vec())
            .file_name(photo.file_name.clone())
            .mime_str(mime)
            .map_err(|_| SubmitFailure::UnsupportedPhoto(photo.mime_type.clone()))?;

        Ok(Form::new()
            .text("name", fields.name.clone())
            .text("college", fields.college.clone())
            .text("email", fields.email.clone())
            .text("mobile", fields.mobile.clone())
            .part("photo", part))
    }
}

/// Body returned by the registration endpoint
#[derive(Debug, Deserialize)]
struct EndpointResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user: Option<RegistrationRecord>,
}

#[async_trait]
impl SubmitTransport for MultipartTransport {
    async fn send(
        &self,
        fields: &RegistrationFields,
        photo: &PhotoFile,
    ) -> Result<Option<String>, SubmitFailure> {
        let form = Self::build_form(fields, photo)?;
        let response = self.http.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<EndpointResponse>(&body) {
            Ok(parsed) if parsed.success && status.is_success() => {
                Ok(parsed.user.map(|user| user.id))
            }
            Ok(parsed) => Err(SubmitFailure::Rejected {
                status: status.as_u16(),
                message: parsed
                    .message
                    .unwrap_or_else(|| "Registration failed".to_string()),
            }),
            Err(_) if status.is_success() => Ok(None),
            Err(_) => Err(SubmitFailure::Rejected {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "multipart"
    }
}

/// JSON body understood by the external form processor
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    pub token: String,
    pub name: String,
    pub college: String,
    pub email: String,
    pub mobile: String,
    /// Photo as a base64 data URL
    pub file: String,
    pub file_name: String,
    pub mime_type: String,
}

impl RelayPayload {
    pub fn new(token: &str, fields: &RegistrationFields, photo: &PhotoFile) -> Self {
        Self {
            token: token.to_string(),
            name: fields.name.clone(),
            college: fields.college.clone(),
            email: fields.email.clone(),
            mobile: fields.mobile.clone(),
            file: photo.data_url(),
            file_name: photo.file_name.clone(),
            mime_type: photo.mime_type.clone(),
        }
    }
}

/// Fire-and-forget POST to an external form processor.
///
/// The body is JSON but declared `text/plain` so browsers treat it as a simple
/// request. The response is not inspected.
pub struct RelayTransport {
    http: reqwest::Client,
    url: String,
    token: String,
}

impl RelayTransport {
    pub fn new(http: reqwest::Client, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl SubmitTransport for RelayTransport {
    async fn send(
        &self,
        fields: &RegistrationFields,
        photo: &PhotoFile,
    ) -> Result<Option<String>, SubmitFailure> {
        let payload = RelayPayload::new(&self.token, fields, photo);
        tracing::debug!(
            "Relaying registration to {} ({} char data URL)",
            self.url,
            payload.file.len()
        );

        self.http
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .json(&payload)
            .send()
            .await?;

        Ok(None)
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn relay_payload_shape() {
        let fields = RegistrationFields {
            name: "Asha Rao".to_string(),
            college: "IIT Delhi".to_string(),
            email: "asha@example.com".to_string(),
            mobile: "+911234567890".to_string(),
        };
        let photo = PhotoFile::new("sample.jpg", "image/jpeg", Bytes::from_static(b"abc"));

        let json = serde_json::to_value(RelayPayload::new("configured", &fields, &photo)).unwrap();

        assert_eq!(json["token"], "configured");
        assert_eq!(json["college"], "IIT Delhi");
        assert_eq!(json["file"], "data:image/jpeg;base64,YWJj");
        assert_eq!(json["fileName"], "sample.jpg");
        assert_eq!(json["mimeType"], "image/jpeg");
    }

    #[test]
    fn endpoint_url_from_base() {
        let t = MultipartTransport::for_server(reqwest::Client::new(), "http://127.0.0.1:3000/");
        assert_eq!(t.endpoint, "http://127.0.0.1:3000/api/register");
    }
}
