use crate::AppState;
use crate::api::error::AppError;
use crate::services::media_store::{Folder, IncomingFile};
use crate::utils::public_id::{decode_public_id, delete_path};
use crate::utils::validation::{
    AcceptancePolicy, ValidationError, validate_file_size, validate_mime_type,
};
use axum::{
    Json,
    extract::{
        Multipart, Path, State, multipart::{MultipartError, MultipartRejection},
    },
    http::{StatusCode, Uri},
};
use bytes::BytesMut;
use tracing::{error, warn};

use super::types::*;

const SINGLE_FIELD: &str = "document";
const MULTIPLE_FIELD: &str = "documents";
const MENU_IMAGE_FIELD: &str = "image";

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

/// Reads file parts named `field_name`, applying the policy to each one as it
/// arrives. Parts without a filename are plain form fields and are skipped, as
/// are file inputs left empty (browsers send those with `filename=""`).
async fn collect_files(
    multipart: &mut Multipart,
    field_name: &str,
    max_files: usize,
    policy: &AcceptancePolicy,
) -> Result<Vec<IncomingFile>, AppError> {
    let mut files = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(original_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        let name = field.name().unwrap_or_default().to_string();
        if name != field_name {
            return Err(ValidationError::unexpected_field(&name).into());
        }
        if files.len() >= max_files {
            return Err(ValidationError::too_many_files().into());
        }

        let content_type = field
            .content_type()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM.essence_str())
            .to_string();
        validate_mime_type(&content_type, policy)?;

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            validate_file_size(buffer.len() + chunk.len(), policy.max_file_size)?;
            buffer.extend_from_slice(&chunk);
        }

        files.push(IncomingFile {
            bytes: buffer.freeze(),
            content_type,
            original_name,
        });
    }

    Ok(files)
}

/// Collects accepted files; on rejection the rest of the body is drained so the
/// client sees the error response instead of a connection reset.
async fn accept_files(
    multipart: Result<Multipart, MultipartRejection>,
    field_name: &str,
    max_files: usize,
    policy: &AcceptancePolicy,
) -> Result<Vec<IncomingFile>, AppError> {
    let mut multipart = multipart.map_err(multipart_rejection)?;
    let result = collect_files(&mut multipart, field_name, max_files, policy).await;

    if let Err(e) = &result {
        warn!("Upload rejected: {}. Consuming remaining stream...", e);
        while let Ok(Some(mut field)) = multipart.next_field().await {
            while let Ok(Some(_)) = field.chunk().await {}
        }
    }

    result
}

#[utoipa::path(
    post,
    path = "/upload/single",
    request_body(content = SingleUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = SingleUploadResponse),
        (status = 400, description = "No file or file rejected", body = MessageResponse),
        (status = 500, description = "Media store error", body = MessageResponse)
    ),
    tag = "upload"
)]
pub async fn upload_single(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SingleUploadResponse>, AppError> {
    let file = accept_files(multipart, SINGLE_FIELD, 1, &state.policy)
        .await?
        .pop()
        .ok_or_else(|| ValidationError::no_file("No file uploaded"))?;

    let asset = state
        .upload_service
        .upload_one(&file, Folder::Documents)
        .await
        .inspect_err(|e| error!("Upload error: {}", e))?;

    Ok(Json(SingleUploadResponse {
        message: "File uploaded successfully".to_string(),
        file_url: asset.secure_url,
        delete_path: delete_path(&asset.public_id),
        public_id: asset.public_id,
        size: file.size(),
        original_name: file.original_name,
    }))
}

#[utoipa::path(
    post,
    path = "/upload/multiple",
    request_body(content = MultipleUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files uploaded successfully", body = MultipleUploadResponse),
        (status = 400, description = "No files, too many files, or a file rejected", body = MessageResponse),
        (status = 500, description = "Media store error", body = MessageResponse)
    ),
    tag = "upload"
)]
pub async fn upload_multiple(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MultipleUploadResponse>, AppError> {
    let files = accept_files(
        multipart,
        MULTIPLE_FIELD,
        state.policy.max_files,
        &state.policy,
    )
    .await?;

    if files.is_empty() {
        return Err(ValidationError::no_file("No files uploaded").into());
    }

    let assets = state
        .upload_service
        .upload_batch(&files, Folder::Documents)
        .await
        .inspect_err(|e| error!("Upload error: {}", e))?;

    let files = assets
        .into_iter()
        .zip(files)
        .map(|(asset, file)| UploadedFile {
            file_url: asset.secure_url,
            delete_path: delete_path(&asset.public_id),
            public_id: asset.public_id,
            size: file.size(),
            original_name: file.original_name,
        })
        .collect();

    Ok(Json(MultipleUploadResponse {
        message: "Files uploaded successfully".to_string(),
        files,
    }))
}

#[utoipa::path(
    post,
    path = "/upload/menu-image",
    request_body(content = MenuImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image uploaded successfully", body = MenuImageResponse),
        (status = 400, description = "No image or image rejected", body = MessageResponse),
        (status = 500, description = "Media store error", body = MessageResponse)
    ),
    tag = "upload"
)]
pub async fn upload_menu_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MenuImageResponse>, AppError> {
    let file = accept_files(multipart, MENU_IMAGE_FIELD, 1, &state.policy)
        .await?
        .pop()
        .ok_or_else(|| ValidationError::no_file("No image uploaded"))?;

    let asset = state
        .upload_service
        .upload_one(&file, Folder::MenuImages)
        .await
        .inspect_err(|e| error!("Upload error: {}", e))?;

    Ok(Json(MenuImageResponse {
        message: "Image uploaded successfully".to_string(),
        image_url: asset.secure_url,
        delete_path: delete_path(&asset.public_id),
        public_id: asset.public_id,
    }))
}

#[utoipa::path(
    delete,
    path = "/upload/{public_id}",
    params(
        ("public_id" = String, Path, description = "Store identifier, either percent-encoded or with '-' standing in for '/'")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = MessageResponse),
        (status = 500, description = "Media store error", body = MessageResponse)
    ),
    tag = "upload"
)]
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    remove_asset(&state, &segment).await
}

/// DELETE on a segment that is also an upload route (`single`, `multiple`,
/// `menu-image`, `policy`). Those paths are registered statically, so the
/// segment is read back from the request path.
pub async fn delete_reserved_segment(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<MessageResponse>, AppError> {
    let segment = uri.path().rsplit('/').next().unwrap_or_default();
    remove_asset(&state, segment).await
}

async fn remove_asset(state: &AppState, segment: &str) -> Result<Json<MessageResponse>, AppError> {
    let public_id = decode_public_id(segment);

    state
        .upload_service
        .delete(&public_id)
        .await
        .inspect_err(|e| error!("Delete error: {}", e))?;

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/upload/policy",
    responses(
        (status = 200, description = "Active acceptance policy", body = AcceptancePolicy)
    ),
    tag = "upload"
)]
pub async fn get_policy(State(state): State<AppState>) -> Json<AcceptancePolicy> {
    Json(state.policy.clone())
}
