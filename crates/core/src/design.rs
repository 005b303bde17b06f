//! Design record rules: business-key validation, attachment slots, and the
//! merge-by-key semantics used for metal and gem entries.

use std::collections::HashMap;
use std::hash::Hash;

use crate::media::{detect_image_mime, is_known_image_mime, FALLBACK_MIME};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a design number.
pub const MAX_DESIGN_NUMBER_LENGTH: usize = 50;

/// Default cap on `other_files` parts per request.
pub const DEFAULT_MAX_OTHER_FILES: usize = 5;

/// Multipart part names carrying files.
pub const PART_DESIGN_IMAGE: &str = "design_image";
pub const PART_CAD_FILE: &str = "cad_file";
pub const PART_MODEL_SHEET: &str = "model_sheet";
pub const PART_OTHER_FILES: &str = "other_files";

/// Single-file attachment slots that can be downloaded individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    CadFile,
    ModelSheet,
}

impl FileSlot {
    pub fn from_path_segment(segment: &str) -> Option<FileSlot> {
        match segment {
            PART_CAD_FILE => Some(FileSlot::CadFile),
            PART_MODEL_SHEET => Some(FileSlot::ModelSheet),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileSlot::CadFile => PART_CAD_FILE,
            FileSlot::ModelSheet => PART_MODEL_SHEET,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a design number: non-blank, bounded, URL-safe enough to be used
/// as a path segment.
pub fn validate_design_number(design_number: &str) -> Result<(), String> {
    if design_number.trim().is_empty() {
        return Err("design_number cannot be empty".to_string());
    }
    if design_number.trim() != design_number {
        return Err("design_number cannot start or end with whitespace".to_string());
    }
    if design_number.chars().count() > MAX_DESIGN_NUMBER_LENGTH {
        return Err(format!(
            "design_number exceeds maximum length of {MAX_DESIGN_NUMBER_LENGTH} characters"
        ));
    }
    if design_number.contains(['/', '?', '#']) {
        return Err("design_number cannot contain '/', '?' or '#'".to_string());
    }
    Ok(())
}

/// Validate the natural key of a metal or gem entry.
pub fn validate_entry_key(kind: &str, key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err(format!("{kind} name cannot be empty"));
    }
    Ok(())
}

/// Validate that an uploaded image declares a supported image content type.
pub fn validate_image_content_type(part: &str, content_type: Option<&str>) -> Result<(), String> {
    match content_type {
        None => Ok(()),
        Some(ct) if ct == FALLBACK_MIME || is_known_image_mime(ct) => Ok(()),
        Some(ct) => Err(format!("{part} must be a supported image, got '{ct}'")),
    }
}

/// Validate that uploaded image bytes start with a recognised image signature.
pub fn validate_image_bytes(part: &str, bytes: &[u8]) -> Result<(), String> {
    match detect_image_mime(bytes) {
        Some(_) => Ok(()),
        None => Err(format!("{part} is not a recognised image format")),
    }
}

// ---------------------------------------------------------------------------
// Merge by key
// ---------------------------------------------------------------------------

/// Collapse entries sharing a natural key, keeping the last occurrence at the
/// position of the first.
///
/// Child rows are upserted by key, so a payload naming the same metal twice
/// ends with the later value stored. Collapsing up front keeps the write
/// sequence (and the returned rows) deterministic.
pub fn merge_by_key<T, K, F>(entries: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::with_capacity(entries.len());
    let mut merged: Vec<T> = Vec::with_capacity(entries.len());
    for entry in entries {
        let k = key(&entry);
        match index.get(&k) {
            Some(&pos) => merged[pos] = entry,
            None => {
                index.insert(k, merged.len());
                merged.push(entry);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_number_rules() {
        assert!(validate_design_number("D-100").is_ok());
        assert!(validate_design_number("").is_err());
        assert!(validate_design_number(" D-100").is_err());
        assert!(validate_design_number("D/100").is_err());
        assert!(validate_design_number(&"9".repeat(MAX_DESIGN_NUMBER_LENGTH + 1)).is_err());
    }

    #[test]
    fn entry_key_must_be_present() {
        assert!(validate_entry_key("Metal", "Gold").is_ok());
        let err = validate_entry_key("Gem", " ").unwrap_err();
        assert_eq!(err, "Gem name cannot be empty");
    }

    #[test]
    fn image_content_type() {
        assert!(validate_image_content_type("design_image", None).is_ok());
        assert!(validate_image_content_type("design_image", Some("image/png")).is_ok());
        assert!(validate_image_content_type("design_image", Some("image/bmp")).is_ok());
        assert!(validate_image_content_type("design_image", Some("application/pdf")).is_err());
        let err = validate_image_content_type("design_image", Some("image/svg+xml")).unwrap_err();
        assert!(err.contains("image/svg+xml"));
    }

    #[test]
    fn image_bytes_need_a_signature() {
        assert!(validate_image_bytes("design_image", b"BM\0\0\0\0\0\0\0\0").is_ok());
        let err = validate_image_bytes("profile_pic", b"plain text").unwrap_err();
        assert_eq!(err, "profile_pic is not a recognised image format");
    }

    #[test]
    fn file_slot_segments() {
        assert_eq!(FileSlot::from_path_segment("cad_file"), Some(FileSlot::CadFile));
        assert_eq!(FileSlot::from_path_segment("model_sheet"), Some(FileSlot::ModelSheet));
        assert_eq!(FileSlot::from_path_segment("design_image"), None);
    }

    #[test]
    fn merge_keeps_last_value_at_first_position() {
        let merged = merge_by_key(
            vec![("Gold", 10), ("Silver", 5), ("Gold", 12)],
            |(name, _)| *name,
        );
        assert_eq!(merged, vec![("Gold", 12), ("Silver", 5)]);
    }

    #[test]
    fn merge_without_duplicates_is_identity() {
        let merged = merge_by_key(vec![1, 2, 3], |n| *n);
        assert_eq!(merged, vec![1, 2, 3]);
    }
}
