use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaLoadError;

/// Errors raised while assembling an [`EngineConfig`](super::EngineConfig)
/// or the schema registry it describes.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot merge HSI engine settings: {0}")]
    Layering(String),

    #[error("HSI config file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("cannot encode HSI engine defaults: {0}")]
    EncodeDefaults(String),

    #[error("invalid HSI engine setting: {0}")]
    Invalid(String),

    #[error("cannot read schema document {}: {source}", path.display())]
    UnreadableSchema {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema document listed under [schemas] was rejected: {0}")]
    Schema(#[from] SchemaLoadError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Layering(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::EncodeDefaults(err.to_string())
    }
}
