//! Fatal engine outcomes.
//!
//! These describe a malformed or unsupported contract claim. They are never
//! used to signal that a payload is merely non-conformant; that is reported
//! through `ValidationResult`.

use thiserror::Error;

use crate::schema::SchemaLoadError;

/// Engine result type alias
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    SchemaLoad(#[from] SchemaLoadError),

    #[error("HSI major version {major} is not supported by this consumer (supported: {supported:?})")]
    UnsupportedMajorVersion { major: u64, supported: Vec<u64> },

    #[error("payload does not carry a usable hsi_version: {reason}")]
    MalformedVersion { reason: String },

    #[error("payload is not a JSON document: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl EngineError {
    /// Machine-readable code for logs and wrapping services.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaLoad(_) => "SCHEMA_LOAD_ERROR",
            Self::UnsupportedMajorVersion { .. } => "UNSUPPORTED_MAJOR_VERSION",
            Self::MalformedVersion { .. } => "MALFORMED_VERSION",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_major_lists_supported_set() {
        let err = EngineError::UnsupportedMajorVersion {
            major: 3,
            supported: vec![1, 2],
        };
        assert_eq!(err.code(), "UNSUPPORTED_MAJOR_VERSION");
        assert!(err.to_string().contains("[1, 2]"));
    }

    #[test]
    fn schema_load_error_is_transparent() {
        let err: EngineError = SchemaLoadError::NotRegistered { major: 4 }.into();
        assert_eq!(err.code(), "SCHEMA_LOAD_ERROR");
        assert_eq!(
            err.to_string(),
            SchemaLoadError::NotRegistered { major: 4 }.to_string()
        );
    }
}
