//! Validation helpers shared by the Shopify and Dropi tools.

use crate::core::Secret;
use crate::domains::tools::ToolError;

/// Loose structural email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Reject an argument that is empty or only whitespace.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid_arguments(format!(
            "'{field}' must not be empty"
        )));
    }
    Ok(())
}

/// Reject a missing credential.
pub fn require_secret(field: &str, value: &Secret) -> Result<(), ToolError> {
    if value.is_empty() {
        return Err(ToolError::invalid_arguments(format!(
            "'{field}' must not be empty"
        )));
    }
    Ok(())
}

/// Reject a malformed email address.
pub fn require_email(field: &str, value: &str) -> Result<(), ToolError> {
    if !is_valid_email(value) {
        return Err(ToolError::invalid_arguments(format!(
            "'{field}' is not a valid email address: {value}"
        )));
    }
    Ok(())
}

/// Reject an identifier that could not be used as a single path segment.
pub fn require_path_id(field: &str, value: &str, digits_only: bool) -> Result<(), ToolError> {
    let valid = !value.is_empty()
        && value.chars().all(|c| {
            if digits_only {
                c.is_ascii_digit()
            } else {
                c.is_ascii_alphanumeric() || c == '-' || c == '_'
            }
        });

    if !valid {
        let expected = if digits_only {
            "a numeric id"
        } else {
            "an alphanumeric id"
        };
        return Err(ToolError::invalid_arguments(format!(
            "'{field}' must be {expected}, got '{value}'"
        )));
    }
    Ok(())
}
