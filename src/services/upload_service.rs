use super::media_store::{DeleteOutcome, Folder, IncomingFile, MediaStore, StoreError, StoredAsset};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Forwards accepted files to the media store.
///
/// Callers are expected to have applied the acceptance policy already; nothing
/// here looks at MIME types or sizes.
pub struct UploadService {
    store: Arc<dyn MediaStore>,
}

impl UploadService {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self { store }
    }

    pub async fn upload_one(
        &self,
        file: &IncomingFile,
        folder: Folder,
    ) -> Result<StoredAsset, StoreError> {
        let asset = self.store.upload(file, folder).await?;
        info!(
            "📦 Stored '{}' ({} bytes) as {}",
            file.original_name, asset.bytes, asset.public_id
        );
        Ok(asset)
    }

    /// Uploads every file concurrently. Succeeds only if all uploads succeed;
    /// results are in input order. When any upload fails, assets stored by the
    /// other uploads are deleted before the first error is returned.
    pub async fn upload_batch(
        &self,
        files: &[IncomingFile],
        folder: Folder,
    ) -> Result<Vec<StoredAsset>, StoreError> {
        let outcomes = join_all(files.iter().map(|file| self.upload_one(file, folder))).await;

        if outcomes.iter().all(Result::is_ok) {
            return Ok(outcomes.into_iter().filter_map(Result::ok).collect());
        }

        let mut stored = Vec::new();
        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                Ok(asset) => stored.push(asset),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => warn!("Additional upload failure in batch: {}", e),
            }
        }

        self.discard(&stored).await;

        Err(first_error.unwrap_or_else(|| {
            StoreError::InvalidResponse("batch failed without an error".to_string())
        }))
    }

    pub async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, StoreError> {
        let outcome = self.store.delete(public_id).await?;
        match outcome {
            DeleteOutcome::Deleted => info!("🗑️  Deleted {}", public_id),
            DeleteOutcome::NotFound => info!("Delete of {} was a no-op (not found)", public_id),
        }
        Ok(outcome)
    }

    /// Best-effort removal of assets left behind by a failed batch
    async fn discard(&self, assets: &[StoredAsset]) {
        if assets.is_empty() {
            return;
        }

        warn!(
            "Batch upload failed, removing {} already stored asset(s)",
            assets.len()
        );
        let results = join_all(assets.iter().map(|a| self.store.delete(&a.public_id))).await;
        for (asset, result) in assets.iter().zip(results) {
            if let Err(e) = result {
                warn!("Failed to remove orphaned asset {}: {}", asset.public_id, e);
            }
        }
    }

    pub async fn store_healthy(&self) -> bool {
        self.store.health_check().await
    }

    pub fn provider_id(&self) -> &'static str {
        self.store.provider_id()
    }
}
