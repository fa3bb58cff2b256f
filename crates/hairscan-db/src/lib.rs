//! Database repositories for the scan-ingestion pipeline
//!
//! The single repository here, [`UploadRepository`], owns the upload-record
//! lifecycle: unique identifier allocation, forward-only status transitions,
//! and paginated retrieval per subject. Each mutating operation is one SQL
//! statement, so a partially-failed ingestion always leaves the record in its
//! true, observable status.

pub mod db;

pub use db::uploads::{UploadPage, UploadRepository};
