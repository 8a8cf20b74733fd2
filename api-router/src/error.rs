use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_typed_multipart::TypedMultipartError;
use common::{error::AppError, utils::upload_validation::ValidationError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Internal server error")]
    InternalError { detail: Option<String> },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Request body exceeds the upload size limit")]
    BodyTooLarge,
}

impl ApiError {
    /// Converts a core error. Internal failures are logged; their message is
    /// only kept for the client when `expose_details` is set.
    pub fn from_app_error(err: AppError, expose_details: bool) -> Self {
        match err {
            AppError::Validation(e) => Self::Validation(e),
            other => {
                tracing::error!("Internal error: {:?}", other);
                Self::InternalError {
                    detail: expose_details.then(|| other.to_string()),
                }
            }
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InternalError { .. } => "internal-error",
            Self::Validation(e) => e.code(),
            Self::BodyTooLarge => "file-too-large",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(ValidationError::FileTooLarge { .. }) | Self::BodyTooLarge => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::from_app_error(err, false)
    }
}

/// Multipart extraction failures. An oversized body is reported like an
/// oversized file; any other unreadable form carries no usable image part.
impl From<TypedMultipartError> for ApiError {
    fn from(err: TypedMultipartError) -> Self {
        let status = err.get_status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::debug!("Rejected multipart body: {}", err);
            Self::BodyTooLarge
        } else if status.is_client_error() {
            tracing::debug!("Rejected multipart body: {}", err);
            Self::Validation(ValidationError::MissingFile)
        } else {
            tracing::error!("Multipart extraction failed: {:?}", err);
            Self::InternalError { detail: None }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_response = ErrorResponse {
            status: "error",
            error: self.code(),
            message: self.to_string(),
            detail: match self {
                Self::InternalError { detail } => detail,
                Self::Validation(_) | Self::BodyTooLarge => None,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    status: &'static str,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}
