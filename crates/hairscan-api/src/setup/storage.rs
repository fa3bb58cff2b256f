//! Object storage setup

use anyhow::{Context, Result};
use hairscan_core::Config;
use hairscan_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize object storage")?;

    tracing::info!(
        bucket = config.s3_bucket.as_deref().unwrap_or("<unset>"),
        "Object storage initialized"
    );

    Ok(storage)
}
