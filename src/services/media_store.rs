use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

/// Storage namespace an asset is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Folder {
    Documents,
    #[default]
    General,
    MenuImages,
}

impl Folder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Documents => "restaurant-documents",
            Folder::General => "restaurant-uploads",
            Folder::MenuImages => "restaurant-menu-images",
        }
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file received in a multipart request, fully buffered and already accepted
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub bytes: Bytes,
    pub content_type: String,
    pub original_name: String,
}

impl IncomingFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// What the media store hands back after a successful upload
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StoredAsset {
    pub secure_url: String,
    pub public_id: String,
    #[serde(default)]
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The store had nothing under that id; not an error
    NotFound,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with an error; the message is its own
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from media store: {0}")]
    InvalidResponse(String),
}

/// External media hosting service
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Short identifier used in logs and health output
    fn provider_id(&self) -> &'static str;

    async fn upload(&self, file: &IncomingFile, folder: Folder) -> Result<StoredAsset, StoreError>;

    async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, StoreError>;

    /// Check if the store is reachable with the configured credentials
    async fn health_check(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_names() {
        assert_eq!(Folder::Documents.as_str(), "restaurant-documents");
        assert_eq!(Folder::default().as_str(), "restaurant-uploads");
        assert_eq!(Folder::MenuImages.to_string(), "restaurant-menu-images");
    }

    #[test]
    fn test_stored_asset_ignores_extra_fields() {
        let asset: StoredAsset = serde_json::from_str(
            r#"{"secure_url":"https://res.cloudinary.com/demo/a.png","public_id":"restaurant-documents/a","bytes":42,"format":"png"}"#,
        )
        .unwrap();
        assert_eq!(asset.public_id, "restaurant-documents/a");
        assert_eq!(asset.bytes, 42);
    }
}
