//! Application state
//!
//! One state struct injected into every handler. All members are cheap
//! clones over process-scoped resources: the connection pool is created once
//! at startup and shared for the process lifetime, never per request.

use crate::services::ingestion::IngestionService;
use hairscan_core::Config;
use hairscan_db::UploadRepository;
use hairscan_services::{InferenceGateway, SubjectDirectory};
use hairscan_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub uploads: UploadRepository,
    pub storage: Arc<dyn Storage>,
    pub inference: Arc<dyn InferenceGateway>,
    pub directory: Option<Arc<dyn SubjectDirectory>>,
    pub ingestion: IngestionService,
}
