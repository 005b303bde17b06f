//! Category taxonomy rules.
//!
//! Categories form one forest per `type`. Each forest is exactly two levels
//! deep: root categories and their direct subcategories.

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Maximum length of a category type name.
pub const MAX_TYPE_NAME_LENGTH: usize = 50;

/// Maximum number of entries accepted by a single reorder request.
pub const MAX_REORDER_BATCH: usize = 500;

pub const TYPE_PRODUCT_TYPE: &str = "product_type";
pub const TYPE_COLLECTIONS: &str = "collections";
pub const TYPE_DESIGN_TYPE: &str = "design_type";
pub const TYPE_CUSTOMERS: &str = "customers";

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// The four built-in taxonomy axes, each with its own endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    ProductType,
    Collections,
    DesignType,
    Customers,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::ProductType,
        Axis::Collections,
        Axis::DesignType,
        Axis::Customers,
    ];

    /// The `type` column value stored for this axis.
    pub fn category_type(self) -> &'static str {
        match self {
            Axis::ProductType => TYPE_PRODUCT_TYPE,
            Axis::Collections => TYPE_COLLECTIONS,
            Axis::DesignType => TYPE_DESIGN_TYPE,
            Axis::Customers => TYPE_CUSTOMERS,
        }
    }

    /// The URL segment the axis is mounted under.
    pub fn path_segment(self) -> &'static str {
        match self {
            Axis::ProductType => "product_types",
            Axis::Collections => "collections",
            Axis::DesignType => "designtypes",
            Axis::Customers => "customers",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a category name: non-blank and within the length limit.
pub fn validate_category_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Category name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(format!(
            "Category name exceeds maximum length of {MAX_CATEGORY_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate a category type name: non-blank, bounded, and without path
/// separators (types appear in URLs).
pub fn validate_type_name(category_type: &str) -> Result<(), String> {
    if category_type.trim().is_empty() {
        return Err("Category type cannot be empty".to_string());
    }
    if category_type.chars().count() > MAX_TYPE_NAME_LENGTH {
        return Err(format!(
            "Category type exceeds maximum length of {MAX_TYPE_NAME_LENGTH} characters"
        ));
    }
    if category_type.contains('/') {
        return Err("Category type cannot contain '/'".to_string());
    }
    Ok(())
}

/// The parent fields needed to check a new subcategory against the tree rules.
#[derive(Debug, Clone, Copy)]
pub struct ParentRef<'a> {
    pub id: DbId,
    pub category_type: &'a str,
    pub parent_id: Option<DbId>,
}

/// Check that `parent` may receive a child of type `child_type`.
///
/// The parent must share the child's type and must itself be a root, which
/// keeps every forest at exactly two levels.
pub fn validate_parent(parent: &ParentRef<'_>, child_type: &str) -> Result<(), String> {
    if parent.category_type != child_type {
        return Err(format!(
            "Parent category {} has type '{}', expected '{child_type}'",
            parent.id, parent.category_type
        ));
    }
    if parent.parent_id.is_some() {
        return Err(format!(
            "Category {} is already a subcategory; nesting is limited to two levels",
            parent.id
        ));
    }
    Ok(())
}

/// Validate a reorder batch: non-empty, bounded, positive positions, no
/// duplicate ids.
pub fn validate_reorder(entries: &[(DbId, i32)]) -> Result<(), String> {
    if entries.is_empty() {
        return Err("Reorder list must not be empty".to_string());
    }
    if entries.len() > MAX_REORDER_BATCH {
        return Err(format!(
            "Reorder list exceeds maximum of {MAX_REORDER_BATCH} entries"
        ));
    }
    let mut seen = std::collections::HashSet::with_capacity(entries.len());
    for (id, position) in entries {
        if *position < 1 {
            return Err(format!("Position for category {id} must be at least 1"));
        }
        if !seen.insert(*id) {
            return Err(format!("Category {id} appears more than once"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_segments_are_distinct() {
        let segments: std::collections::HashSet<_> =
            Axis::ALL.iter().map(|a| a.path_segment()).collect();
        assert_eq!(segments.len(), Axis::ALL.len());
        assert!(!segments.contains("designs"));
    }

    #[test]
    fn design_type_axis_uses_legacy_segment() {
        assert_eq!(Axis::DesignType.path_segment(), "designtypes");
        assert_eq!(Axis::DesignType.category_type(), "design_type");
    }

    #[test]
    fn blank_category_name_rejected() {
        assert!(validate_category_name("   ").is_err());
        assert!(validate_category_name("Rings").is_ok());
    }

    #[test]
    fn long_category_name_rejected() {
        let name = "x".repeat(MAX_CATEGORY_NAME_LENGTH + 1);
        let err = validate_category_name(&name).unwrap_err();
        assert!(err.contains("maximum length"));
    }

    #[test]
    fn type_name_with_slash_rejected() {
        assert!(validate_type_name("a/b").is_err());
        assert!(validate_type_name("").is_err());
        assert!(validate_type_name("materials").is_ok());
    }

    #[test]
    fn parent_of_other_type_rejected() {
        let parent = ParentRef {
            id: 7,
            category_type: "collections",
            parent_id: None,
        };
        let err = validate_parent(&parent, "product_type").unwrap_err();
        assert!(err.contains("expected 'product_type'"));
    }

    #[test]
    fn third_level_rejected() {
        let parent = ParentRef {
            id: 9,
            category_type: "product_type",
            parent_id: Some(3),
        };
        assert!(validate_parent(&parent, "product_type").is_err());
    }

    #[test]
    fn root_parent_of_same_type_accepted() {
        let parent = ParentRef {
            id: 3,
            category_type: "product_type",
            parent_id: None,
        };
        assert!(validate_parent(&parent, "product_type").is_ok());
    }

    #[test]
    fn reorder_rejects_duplicates_and_bad_positions() {
        assert!(validate_reorder(&[]).is_err());
        assert!(validate_reorder(&[(1, 1), (1, 2)]).is_err());
        assert!(validate_reorder(&[(1, 0)]).is_err());
        assert!(validate_reorder(&[(1, 2), (2, 1)]).is_ok());
    }
}
