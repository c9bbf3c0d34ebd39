use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Maximum file size: 5 MiB
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum number of files accepted by a multi-file upload
pub const MAX_FILES_PER_REQUEST: usize = 5;

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
];

pub const MIME_REJECTED_MESSAGE: &str =
    "Only images (JPEG, PNG, GIF, WebP) and PDF files are allowed!";

/// Rules every incoming file must satisfy before it is forwarded to the media store
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AcceptancePolicy {
    pub allowed_mimes: Vec<String>,
    pub max_file_size: usize,
    pub max_files: usize,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self::new(MAX_FILE_SIZE, MAX_FILES_PER_REQUEST)
    }
}

impl AcceptancePolicy {
    pub fn new(max_file_size: usize, max_files: usize) -> Self {
        Self {
            allowed_mimes: ALLOWED_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
            max_file_size,
            max_files,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn no_file(message: &str) -> Self {
        Self {
            code: "NO_FILE",
            message: message.to_string(),
        }
    }

    pub fn too_many_files() -> Self {
        Self {
            code: "TOO_MANY_FILES",
            message: "Too many files".to_string(),
        }
    }

    pub fn unexpected_field(field: &str) -> Self {
        Self {
            code: "UNEXPECTED_FIELD",
            message: format!("Unexpected field: {}", field),
        }
    }
}

/// Validates file size against maximum limit
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), ValidationError> {
    if size > max_size {
        tracing::debug!(size, max_size, "Rejecting oversized file");
        return Err(ValidationError {
            code: "FILE_TOO_LARGE",
            message: "File too large".to_string(),
        });
    }
    Ok(())
}

/// Validates a declared MIME type against the policy allow-list.
/// Parameters such as `; charset=...` are ignored and matching is case-insensitive.
pub fn validate_mime_type(
    content_type: &str,
    policy: &AcceptancePolicy,
) -> Result<(), ValidationError> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    if policy
        .allowed_mimes
        .iter()
        .any(|allowed| allowed == &normalized)
    {
        return Ok(());
    }

    tracing::debug!(content_type, "Rejecting file with disallowed MIME type");
    Err(ValidationError {
        code: "INVALID_MIME_TYPE",
        message: MIME_REJECTED_MESSAGE.to_string(),
    })
}
