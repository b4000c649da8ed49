//! Input validation for kloak operations.
//!
//! Secret handles must be checked here before any remote path is derived.

use crate::error::ValidationError;

/// Check whether `name` is a DNS-subdomain-style label usable as a
/// Kubernetes resource name.
///
/// - First character must be an ASCII letter
/// - Only letters, digits and hyphens
/// - Last character must be a letter or digit
///
/// cf. RFC 1035
pub fn is_valid_metadata_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let (first, last) = match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return false,
    };

    first.is_ascii_alphabetic()
        && last.is_ascii_alphanumeric()
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// Validate the parts of a secret handle.
///
/// # Errors
///
/// Returns `ValidationError::InvalidName` if `metadata_name` is not a valid
/// subdomain name, or `ValidationError::EmptyKey` if `key` is empty.
pub fn validate_handle(metadata_name: &str, key: &str) -> Result<(), ValidationError> {
    if !is_valid_metadata_name(metadata_name) {
        return Err(ValidationError::InvalidName(metadata_name.to_string()));
    }
    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    Ok(())
}
