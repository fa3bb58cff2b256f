//! OpenAPI documentation

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hairscan API",
        description = "Scan-ingestion pipeline: upload credentials, analysis persistence, and per-subject history"
    ),
    paths(
        crate::handlers::upload_credential::issue_upload_credential,
        crate::handlers::store_analysis::store_analysis,
        crate::handlers::analyze::analyze_scan,
        crate::handlers::list_uploads::list_uploads,
        crate::handlers::contact_lookup::contact_lookup,
        crate::handlers::health::health,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::handlers::store_analysis::StoreAnalysisRequest,
        crate::handlers::store_analysis::StoreAnalysisResponse,
        crate::handlers::analyze::AnalyzeScanRequest,
        crate::handlers::analyze::AnalyzeScanResponse,
        crate::handlers::list_uploads::ListUploadsResponse,
        crate::handlers::contact_lookup::ContactView,
        crate::handlers::contact_lookup::ContactLookupResponse,
        crate::handlers::health::HealthResponse,
        hairscan_core::models::UploadCredentialRequest,
        hairscan_core::models::UploadCredentialResponse,
        hairscan_core::models::UploadRecord,
        hairscan_core::models::ProcessingStatus,
        hairscan_core::models::AnalysisDocument,
        hairscan_core::models::DetectionParams,
        hairscan_core::models::Prediction,
        hairscan_core::models::ContactProfile,
    )),
    tags(
        (name = "uploads", description = "Upload credential issuance"),
        (name = "scans", description = "Analysis ingestion and history"),
        (name = "contacts", description = "Subject directory lookup"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
