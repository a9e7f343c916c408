use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{PhotoUpload, RegistrationRecord};
use crate::services::{RegistrationForm, RegistrationService};
use crate::AppState;

pub const INVALID_BODY_MESSAGE: &str = "Invalid multipart body";

fn invalid_body() -> AppError {
    AppError::Validation(INVALID_BODY_MESSAGE.to_string())
}

/// Accept a registration
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationRecord>>)> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Multipart rejected: {}", e.body_text());
        invalid_body()
    })?;
    let mut form = RegistrationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to process multipart: {}", e);
        invalid_body()
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "photo" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    tracing::debug!("Failed to read photo: {}", e);
                    invalid_body()
                })?;

                form.photo = Some(PhotoUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "name" | "college" | "email" | "mobile" => {
                let text = field.text().await.map_err(|e| {
                    tracing::debug!("Failed to read field {}: {}", name, e);
                    invalid_body()
                })?;
                let slot = match name.as_str() {
                    "name" => &mut form.name,
                    "college" => &mut form.college,
                    "email" => &mut form.email,
                    _ => &mut form.mobile,
                };
                *slot = Some(text);
            }
            _ => {}
        }
    }

    let submission = form.into_submission()?;
    let record = RegistrationService::register(
        state.records.as_ref(),
        state.photos.as_ref(),
        submission,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}
