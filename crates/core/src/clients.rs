//! Client constants and validation.

use crate::error::CoreError;

/// Client receives automated templated sends.
pub const CLIENT_TYPE_TEMPLATE: &str = "template";

/// Client receives one-off AI-generated manuscripts.
pub const CLIENT_TYPE_CUSTOM: &str = "custom";

pub const VALID_CLIENT_TYPES: &[&str] = &[CLIENT_TYPE_TEMPLATE, CLIENT_TYPE_CUSTOM];

/// Validate a client type string.
pub fn validate_client_type(client_type: &str) -> Result<(), CoreError> {
    if VALID_CLIENT_TYPES.contains(&client_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid client type '{client_type}'. Must be one of: {}",
            VALID_CLIENT_TYPES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_client_types_accepted() {
        assert!(validate_client_type(CLIENT_TYPE_TEMPLATE).is_ok());
        assert!(validate_client_type(CLIENT_TYPE_CUSTOM).is_ok());
    }

    #[test]
    fn test_invalid_client_type_rejected() {
        let result = validate_client_type("premium");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid client type"));
    }
}
