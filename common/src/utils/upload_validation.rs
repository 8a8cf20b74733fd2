use bytes::Bytes;
use thiserror::Error;

use super::config::{default_allowed_mime_types, DEFAULT_MAX_FILE_SIZE};

/// An uploaded file buffered in memory. Missing multipart metadata is stored as empty strings.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub mime_type: String,
    pub file_name: String,
    pub size: usize,
}

impl UploadedFile {
    pub fn new(bytes: Bytes, mime_type: Option<String>, file_name: Option<String>) -> Self {
        Self {
            size: bytes.len(),
            bytes,
            mime_type: mime_type.unwrap_or_default(),
            file_name: file_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size: usize,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("image required")]
    MissingFile,
    #[error("File size exceeds maximum allowed size of {max} bytes")]
    FileTooLarge { size: usize, max: usize },
    #[error("Invalid file type {0:?}. Allowed types: JPEG, PNG, GIF, WebP")]
    UnsupportedType(String),
}

impl ValidationError {
    /// Machine-readable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing-file",
            Self::FileTooLarge { .. } => "file-too-large",
            Self::UnsupportedType(_) => "unsupported-type",
        }
    }
}

/// Checks presence, then size, then MIME type, and reports the first failure.
pub fn validate_upload<'a>(
    file: Option<&'a UploadedFile>,
    limits: &UploadLimits,
) -> Result<&'a UploadedFile, ValidationError> {
    let file = file.ok_or(ValidationError::MissingFile)?;

    if file.size > limits.max_file_size {
        return Err(ValidationError::FileTooLarge {
            size: file.size,
            max: limits.max_file_size,
        });
    }

    if !limits
        .allowed_mime_types
        .iter()
        .any(|allowed| allowed == &file.mime_type)
    {
        return Err(ValidationError::UnsupportedType(file.mime_type.clone()));
    }

    Ok(file)
}
