//! Identifier validation for synthesized SQL.
//!
//! Table and field names flow from record metadata declarations into SQL
//! text as identifiers; only data values are carried by placeholders. The
//! registry validates every declared identifier once, at metadata-derivation
//! time, so a hostile or malformed declaration fails fast as a configuration
//! error instead of reaching statement text.

use crate::error::{MapperError, Result};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL: 63 bytes
/// - SQL Server: 128 characters
/// - MySQL: 64 characters
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate a declared identifier.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers containing whitespace or statement punctuation
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `MapperError::Configuration` with a descriptive message, since an
/// invalid identifier is a static declaration defect.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MapperError::configuration(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(MapperError::configuration(format!(
            "identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, ';' | '\'' | '"' | '`' | '(' | ')' | ','))
    {
        return Err(MapperError::configuration(format!(
            "identifier contains whitespace or punctuation: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MapperError::configuration(format!(
            "identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("orders").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("Column123").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("table\0name");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_rejects_punctuation() {
        assert!(validate_identifier("orders; DROP TABLE users").is_err());
        assert!(validate_identifier("a b").is_err());
        assert!(validate_identifier("name'").is_err());
    }

    #[test]
    fn test_validate_identifier_rejects_too_long() {
        let long_name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let result = validate_identifier(&long_name);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_validate_identifier_accepts_max_length() {
        let max_name = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier(&max_name).is_ok());
    }
}
