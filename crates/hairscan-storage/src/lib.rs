//! Hairscan Storage Library
//!
//! Object-store abstraction for the scan-ingestion pipeline. The central
//! operation is issuing a presigned PUT URL so clients upload scan images
//! directly to the object store; the pipeline itself only ever moves
//! metadata-sized payloads.
//!
//! # Object key format
//!
//! Scan objects live under the `scans/` prefix: `scans/{filename}`. Keys must
//! not contain `..` or a leading `/`; generation and validation are
//! centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod s3;
pub mod traits;

pub use factory::create_storage;
pub use keys::scan_object_key;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
