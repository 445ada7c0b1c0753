//! Error handling module for the migration descriptor parser
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Parsing is all-or-nothing: every variant here is terminal for the parse call.

use thiserror::Error;

use crate::schema::YAML_EXAMPLE;

/// Structural violation found while walking a descriptor.
///
/// Every variant carries the context label of the node that failed so the
/// caller can point at it; [`SchemaError::example`] gives the reference
/// document to compare against.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A required key is absent (or `null`)
    #[error("'{context}' key is missing")]
    MissingKey { context: String },

    /// A block that must be a mapping is something else
    #[error("'{context}' key must be a dict")]
    NotAMapping { context: String },

    /// A value has the wrong shape (e.g. a scalar where a list is expected)
    #[error("'{context}' key must be a {expected}")]
    WrongType {
        context: String,
        expected: &'static str,
    },

    /// A mapping holds keys outside its allowed set
    #[error("{context}: the keys {extra:?} are unexpected. (allowed keys: {allowed:?})")]
    UnexpectedKeys {
        context: String,
        extra: Vec<String>,
        allowed: Vec<String>,
    },
}

impl SchemaError {
    pub fn missing_key(context: impl Into<String>) -> Self {
        Self::MissingKey {
            context: context.into(),
        }
    }

    pub fn not_a_mapping(context: impl Into<String>) -> Self {
        Self::NotAMapping {
            context: context.into(),
        }
    }

    pub fn wrong_type(context: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            context: context.into(),
            expected,
        }
    }

    /// Label of the node that violated the schema
    pub fn context(&self) -> &str {
        match self {
            Self::MissingKey { context }
            | Self::NotAMapping { context }
            | Self::WrongType { context, .. }
            | Self::UnexpectedKeys { context, .. } => context,
        }
    }

    /// Keys that were found but are not allowed (empty for other variants)
    pub fn extra_keys(&self) -> &[String] {
        match self {
            Self::UnexpectedKeys { extra, .. } => extra,
            _ => &[],
        }
    }

    /// Canonical valid descriptor, shown to the user alongside the error
    pub fn example(&self) -> &'static str {
        YAML_EXAMPLE
    }
}

/// Main error type for descriptor parsing
#[derive(Error, Debug)]
pub enum MigrationError {
    /// Environmental/precondition failure (no document, unresolvable DSN)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The document does not follow the descriptor schema
    #[error("Schema error: {0}\n\nExample of a valid descriptor:\n{}", YAML_EXAMPLE)]
    Schema(#[from] SchemaError),

    /// The input stream is not well-formed YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Reading the input stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for descriptor operations
pub type Result<T> = std::result::Result<T, MigrationError>;

impl MigrationError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// The schema violation behind this error, if that is what it is
    pub fn schema(&self) -> Option<&SchemaError> {
        match self {
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MigrationError::configuration("no migration descriptor supplied");
        assert_eq!(
            err.to_string(),
            "Configuration error: no migration descriptor supplied"
        );

        let err = SchemaError::wrong_type("versions", "list");
        assert_eq!(err.to_string(), "'versions' key must be a list");
    }

    #[test]
    fn test_unexpected_keys_display() {
        let err = SchemaError::UnexpectedKeys {
            context: "addons".to_string(),
            extra: vec!["delete".to_string()],
            allowed: vec![
                "install".to_string(),
                "remove".to_string(),
                "upgrade".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "addons: the keys [\"delete\"] are unexpected. \
             (allowed keys: [\"install\", \"remove\", \"upgrade\"])"
        );
        assert_eq!(err.context(), "addons");
        assert_eq!(err.extra_keys(), ["delete".to_string()]);
    }

    #[test]
    fn test_schema_error_carries_example() {
        let err: MigrationError = SchemaError::missing_key("migration").into();
        let message = err.to_string();
        assert!(message.starts_with("Schema error: 'migration' key is missing"));
        assert!(message.contains(YAML_EXAMPLE));
        assert_eq!(err.schema().map(SchemaError::context), Some("migration"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MigrationError = io_err.into();
        assert!(matches!(err, MigrationError::Io(_)));
        assert!(err.schema().is_none());
        assert!(!err.is_configuration());
    }
}
