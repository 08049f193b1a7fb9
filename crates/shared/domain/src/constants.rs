//! Domain-level constants.
//!
//! These constants define business rules and naming shared by both stores.

// =============================================================================
// Validation
// =============================================================================

/// Minimum instanceInfoName length requirement
pub const MIN_INSTANCE_INFO_NAME_LENGTH: usize = 1;

// =============================================================================
// Search Index
// =============================================================================

/// Default search index holding InstanceInfo documents
pub const INSTANCE_INFO_INDEX: &str = "instanceinfo";

/// Indexed fields accepted in `field:value` search terms
pub const SEARCHABLE_FIELDS: &[&str] = &["id", "instanceInfoName", "description"];

/// Check if a field name can be used in a search term
pub fn is_searchable_field(field: &str) -> bool {
    SEARCHABLE_FIELDS.contains(&field)
}
