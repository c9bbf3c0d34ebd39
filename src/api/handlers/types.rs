use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SingleUploadResponse {
    pub message: String,
    pub file_url: String,
    pub public_id: String,
    /// Path that deletes this asset, with the public id percent-encoded
    pub delete_path: String,
    pub original_name: String,
    pub size: usize,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_url: String,
    pub public_id: String,
    /// Path that deletes this asset, with the public id percent-encoded
    pub delete_path: String,
    pub original_name: String,
    pub size: usize,
}

#[derive(Serialize, ToSchema)]
pub struct MultipleUploadResponse {
    pub message: String,
    pub files: Vec<UploadedFile>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuImageResponse {
    pub message: String,
    pub image_url: String,
    pub public_id: String,
    pub delete_path: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// Request body shapes, only used to describe the multipart forms in the OpenAPI document.

#[allow(dead_code)]
#[derive(ToSchema)]
pub struct SingleUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub document: Vec<u8>,
}

#[allow(dead_code)]
#[derive(ToSchema)]
pub struct MultipleUploadForm {
    #[schema(value_type = Vec<String>)]
    pub documents: Vec<Vec<u8>>,
}

#[allow(dead_code)]
#[derive(ToSchema)]
pub struct MenuImageForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}
