//! Error types for the CSV fixer.
//!
//! - [`MappingError`] - a field mapping that does not fit its schema
//! - [`FixError`] - everything a transformation run can fail with
//!
//! A missing input file is not an error: the orchestrator reports it as a
//! skipped job and moves on.

use thiserror::Error;

// =============================================================================
// Mapping Errors
// =============================================================================

/// A record mapping that cannot be applied to its schema.
///
/// These are configuration defects, detected before any row is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A schema field has no rule.
    #[error("Schema '{schema}': no rule for output field '{field}'")]
    MissingRule { schema: String, field: String },

    /// A rule targets a field the schema does not declare.
    #[error("Schema '{schema}': rule targets undeclared field '{field}'")]
    UnknownTarget { schema: String, field: String },

    /// The schema lists the same output field twice.
    #[error("Schema '{schema}': field '{field}' declared more than once")]
    DuplicateField { schema: String, field: String },

    /// An alias points at a field that is not computed before it.
    #[error("Schema '{schema}': field '{field}' aliases '{target}', which is not declared before it")]
    AliasNotComputed {
        schema: String,
        field: String,
        target: String,
    },
}

// =============================================================================
// Fix Errors (top-level)
// =============================================================================

/// Errors returned by the transformer and the orchestrator.
#[derive(Debug, Error)]
pub enum FixError {
    /// Input is not consistent CSV (ragged row, invalid UTF-8, ...).
    #[error("Malformed input{}: {message}", at_line(.line))]
    MalformedInput { line: Option<u64>, message: String },

    /// Mapping does not cover its schema.
    #[error("Schema mapping error: {0}")]
    SchemaMapping(#[from] MappingError),

    /// Failed to read or write a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

impl FixError {
    pub fn malformed(line: Option<u64>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }
}

impl From<csv::Error> for FixError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        let message = match err.kind() {
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => format!("expected {} fields, found {}", expected_len, len),
            _ => err.to_string(),
        };

        match err.into_kind() {
            csv::ErrorKind::Io(e) => FixError::Io(e),
            _ => FixError::malformed(line, message),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for mapping validation.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for transformation runs.
pub type FixResult<T> = Result<T, FixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_error_converts() {
        let err = MappingError::MissingRule {
            schema: "channel".into(),
            field: "channel_code".into(),
        };
        let fix_err: FixError = err.into();
        let msg = fix_err.to_string();
        assert!(msg.contains("channel"));
        assert!(msg.contains("channel_code"));
    }

    #[test]
    fn test_malformed_message_with_line() {
        let err = FixError::malformed(Some(3), "expected 2 fields, found 3");
        assert_eq!(
            err.to_string(),
            "Malformed input at line 3: expected 2 fields, found 3"
        );
    }

    #[test]
    fn test_malformed_message_without_line() {
        let err = FixError::malformed(None, "bad bytes");
        assert_eq!(err.to_string(), "Malformed input: bad bytes");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FixError = io.into();
        assert!(matches!(err, FixError::Io(_)));
    }
}
