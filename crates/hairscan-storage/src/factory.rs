use crate::{S3Storage, Storage, StorageError, StorageResult};
use hairscan_core::Config;
use std::sync::Arc;

/// Create the object-store backend from configuration.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let bucket = config
        .s3_bucket
        .clone()
        .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
    let region = config.s3_region.clone().ok_or_else(|| {
        StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
    })?;
    let endpoint = config.s3_endpoint.clone();

    let storage = S3Storage::new(bucket, region, endpoint).await?;
    Ok(Arc::new(storage))
}
