//! Shared key generation for scan objects.
//!
//! Key format: `scans/{filename}`. The filename is caller-supplied (it names
//! the blob the credential will authorize), so it is validated here before it
//! ever reaches a signer.

use crate::traits::StorageError;

/// Build the storage key for a scan object from its filename.
///
/// Rejects empty names, path traversal (`..`), absolute paths, and
/// backslashes. Nested names (`subject-1/scan.jpg`) are allowed.
pub fn scan_object_key(file_name: &str) -> Result<String, StorageError> {
    if file_name.trim().is_empty() {
        return Err(StorageError::InvalidKey(
            "fileName must not be empty".to_string(),
        ));
    }
    if file_name.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "fileName must be relative".to_string(),
        ));
    }
    if file_name.contains('\\') {
        return Err(StorageError::InvalidKey(
            "fileName must not contain backslashes".to_string(),
        ));
    }
    if file_name.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "fileName must not contain path traversal".to_string(),
        ));
    }

    Ok(format!("scans/{}", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_filename_is_prefixed() {
        assert_eq!(scan_object_key("scan1.jpg").unwrap(), "scans/scan1.jpg");
    }

    #[test]
    fn nested_filename_is_allowed() {
        assert_eq!(
            scan_object_key("subject-1/scan1.jpg").unwrap(),
            "scans/subject-1/scan1.jpg"
        );
    }

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        assert!(scan_object_key("../secrets.txt").is_err());
        assert!(scan_object_key("a/../../b.jpg").is_err());
        assert!(scan_object_key("/etc/passwd").is_err());
        assert!(scan_object_key("a\\b.jpg").is_err());
        assert!(scan_object_key("   ").is_err());
    }
}
