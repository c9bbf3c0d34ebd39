use crate::config::GatewayConfig;
use crate::services::cloudinary::CloudinaryStore;
use crate::services::media_store::MediaStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub async fn setup_media_store(config: &GatewayConfig) -> Result<Arc<CloudinaryStore>> {
    let cloudinary = config.cloudinary.clone().context(
        "Media store credentials missing: set CLOUDINARY_URL or CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET",
    )?;

    info!(
        "☁️  Media Store: {} (Cloud: {})",
        cloudinary.api_base, cloudinary.cloud_name
    );

    let store = CloudinaryStore::new(cloudinary, Duration::from_secs(config.store_timeout_secs))
        .context("Failed to build media store client")?;

    // A failed ping is logged, not fatal
    if store.health_check().await {
        info!("✅ Media store credentials accepted");
    } else {
        warn!("⚠️  Media store ping failed, continuing anyway");
    }

    Ok(Arc::new(store))
}
