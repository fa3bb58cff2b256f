//! Service and repository initialization

use crate::services::ingestion::IngestionService;
use crate::state::AppState;
use anyhow::Result;
use hairscan_core::Config;
use hairscan_db::UploadRepository;
use hairscan_services::{
    FallbackDetectionClient, HttpSubjectDirectory, InferenceGateway, SubjectDirectory,
    VertexDetectionClient,
};
use hairscan_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Wire repositories and external clients into the shared application state.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let uploads = UploadRepository::new(pool.clone());

    let inference: Arc<dyn InferenceGateway> = match &config.inference_endpoint {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "Inference gateway configured");
            Arc::new(VertexDetectionClient::new(
                endpoint.clone(),
                config.inference_api_token.clone(),
                Duration::from_secs(config.inference_timeout_seconds),
            )?)
        }
        None => {
            tracing::warn!("INFERENCE_ENDPOINT_URL not set; using canned detection fallback");
            Arc::new(FallbackDetectionClient)
        }
    };

    let directory: Option<Arc<dyn SubjectDirectory>> = match &config.directory_base_url {
        Some(base_url) => {
            tracing::info!(base_url = %base_url, "Subject directory configured");
            Some(Arc::new(HttpSubjectDirectory::new(
                base_url.clone(),
                config.directory_api_token.clone(),
            )?))
        }
        None => {
            tracing::info!("DIRECTORY_BASE_URL not set; subject lookup disabled");
            None
        }
    };

    let ingestion = IngestionService::new(
        uploads.clone(),
        storage.clone(),
        inference.clone(),
        directory.clone(),
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        pool,
        uploads,
        storage,
        inference,
        directory,
        ingestion,
    }))
}
