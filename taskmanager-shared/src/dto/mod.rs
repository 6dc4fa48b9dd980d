/// Request and response bodies exchanged with API clients
///
/// Field names are camelCase on the wire. Request fields default when absent
/// so that a missing field surfaces as a validation failure instead of a
/// deserialization error.

pub mod auth;
pub mod task;

use validator::ValidationError;

/// Rejects empty and whitespace-only strings
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Whether an optional string is absent or whitespace-only
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
