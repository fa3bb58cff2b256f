//! Domain models for the scan-ingestion pipeline

pub mod contact;
pub mod credential;
pub mod detection;
pub mod upload;

pub use contact::ContactProfile;
pub use credential::{UploadCredentialRequest, UploadCredentialResponse};
pub use detection::{DetectionParams, Prediction};
pub use upload::{
    new_subject_id, new_upload_id, AnalysisDocument, NewUpload, ProcessingStatus, UploadRecord,
};
