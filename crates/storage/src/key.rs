//! Storage key construction and validation.

use crate::error::StorageError;

/// Reduce an uploaded filename to a safe key segment.
///
/// Keeps ASCII alphanumerics, dots, dashes and underscores; every other run
/// of characters collapses to a single dash. An empty result becomes `file`.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
            out.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the storage key for a document upload:
/// `documents/{loan_id}/{document_type}-{timestamp}-{filename}`.
///
/// The timestamp component makes the key for a re-upload distinct from the
/// key of the file it replaces.
pub fn document_key(
    loan_id: &str,
    document_type: &str,
    filename: &str,
    timestamp_millis: i64,
) -> String {
    format!(
        "documents/{}/{}-{}-{}",
        loan_id,
        document_type,
        timestamp_millis,
        sanitize_filename(filename)
    )
}

/// Reject keys that could escape a backend's namespace.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("empty key".to_string()));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!("absolute key: {key}")));
    }
    if key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        return Err(StorageError::InvalidKey(format!(
            "key contains traversal or empty segment: {key}"
        )));
    }
    Ok(())
}
