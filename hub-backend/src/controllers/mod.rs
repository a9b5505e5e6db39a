pub mod health;
pub mod hub;
pub mod profiles;

use crate::error::HubError;

/// Shared required-field check for controller handlers. An empty string
/// counts as missing; values are taken as-is, no trimming.
pub fn require_field<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, HubError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(HubError::missing_field(name)),
    }
}
