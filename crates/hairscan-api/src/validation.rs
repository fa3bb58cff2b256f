//! Validation utilities for API handlers

use std::path::Path;

/// Validate that Content-Type matches the file extension.
/// This prevents Content-Type spoofing where an upload credential is issued
/// for one kind of object and used for another.
pub fn validate_extension_content_type_match(
    filename: &str,
    content_type: &str,
) -> Result<(), String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if extension.is_empty() {
        return Err("File must have an extension".to_string());
    }

    let normalized_content_type = content_type.to_lowercase();

    // Scan uploads are images only.
    let expected_content_types: Vec<&str> = match extension.as_str() {
        "jpg" | "jpeg" => vec!["image/jpeg"],
        "png" => vec!["image/png"],
        "webp" => vec!["image/webp"],
        "heic" => vec!["image/heic", "image/heif"],
        "bmp" => vec!["image/bmp"],
        other => {
            return Err(format!(
                "Unsupported scan file extension: .{} (expected an image)",
                other
            ))
        }
    };

    if expected_content_types.contains(&normalized_content_type.as_str()) {
        Ok(())
    } else {
        Err(format!(
            "Content-Type '{}' does not match file extension '.{}'",
            content_type, extension
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_matches() {
        assert!(validate_extension_content_type_match("scan1.jpg", "image/jpeg").is_ok());
        assert!(validate_extension_content_type_match("scan1.JPEG", "IMAGE/JPEG").is_ok());
    }

    #[test]
    fn mismatch_is_rejected() {
        assert!(validate_extension_content_type_match("scan1.png", "image/jpeg").is_err());
    }

    #[test]
    fn non_image_is_rejected() {
        assert!(validate_extension_content_type_match("scan1.pdf", "application/pdf").is_err());
        assert!(validate_extension_content_type_match("noextension", "image/jpeg").is_err());
    }
}
