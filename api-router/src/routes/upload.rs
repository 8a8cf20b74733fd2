use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_typed_multipart::{BaseMultipart, FieldData, TryFromMultipart};
use bytes::Bytes;
use common::{gallery::UploadRequest, utils::upload_validation::UploadedFile};
use serde::Serialize;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, TryFromMultipart)]
pub struct UploadParams {
    // Size is enforced by the upload validator and the route body limit.
    #[form_data(limit = "unlimited")]
    pub image: Option<FieldData<Bytes>>,
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub id: String,
    pub file_name: String,
    pub message: String,
}

/// A browser submits an empty, unnamed part when no file was chosen.
fn into_uploaded_file(field: FieldData<Bytes>) -> Option<UploadedFile> {
    let unnamed = field
        .metadata
        .file_name
        .as_deref()
        .map_or(true, str::is_empty);
    if unnamed && field.contents.is_empty() {
        return None;
    }

    Some(UploadedFile::new(
        field.contents,
        field.metadata.content_type,
        field.metadata.file_name,
    ))
}

pub async fn upload_image(
    State(state): State<ApiState>,
    form: BaseMultipart<UploadParams, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let input = form.data;
    let file = input.image.and_then(into_uploaded_file);

    info!(
        has_file = file.is_some(),
        file_bytes = file.as_ref().map_or(0, |f| f.size),
        mime_type = file.as_ref().map_or("", |f| f.mime_type.as_str()),
        "Received upload request"
    );

    let receipt = state
        .gallery
        .upload(UploadRequest {
            file,
            name: input.name,
            description: input.description,
            author: input.author,
        })
        .await
        .map_err(|e| ApiError::from_app_error(e, state.config.expose_error_details()))?;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            success: true,
            id: receipt.id,
            file_name: receipt.file_name,
            message: "Image uploaded successfully".to_string(),
        }),
    ))
}
