//! Error types for decorator generation.
//!
//! The engine is infallible for well-formed structured input. The only
//! failures are malformed payloads the caller must fix in the schema:
//! an `@oneOf` value that is not a JSON array of class names, a DMMF
//! document that does not deserialize, or an unusable config value.

use thiserror::Error;

/// Result type alias for generation operations.
pub type DtoResult<T> = Result<T, GenerateError>;

/// Main error type for the generation engine.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// `@oneOf` directive whose value is not a JSON array of strings.
    #[error("Invalid @oneOf payload on field '{field}': {source}")]
    OneOf {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// DMMF document could not be decoded.
    #[error("Invalid DMMF document: {0}")]
    Dmmf(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    Config { key: String, message: String },

    /// Failed to serialize the decorator manifest.
    #[error("Failed to serialize manifest: {0}")]
    Manifest(String),
}

impl GenerateError {
    /// Create a `oneOf` payload error for a field.
    pub fn one_of(field: impl Into<String>, source: serde_json::Error) -> Self {
        Self::OneOf {
            field: field.into(),
            source,
        }
    }

    /// Create an invalid config value error.
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            message: message.into(),
        }
    }
}
