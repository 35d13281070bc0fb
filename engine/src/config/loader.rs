use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use hsi_contract::CURRENT_VERSION;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::config::error::{ConfigError, Result};
use crate::options::{ComplianceLevel, ExecutionMode, ValidationOptions};
use crate::schema::{HSI_1_0_SCHEMA, SchemaRegistry};

/// Root engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default options for validation calls
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Extra schema documents registered next to the builtin ones
    #[serde(default)]
    pub schemas: SchemaConfig,
}

/// Validation defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Compliance level (`basic` or `strict`)
    #[serde(default)]
    pub level: ComplianceLevel,

    /// Majors this consumer accepts. Accepts a list, a single integer or a
    /// comma-separated string (`HSI_VALIDATION__SUPPORTED_MAJORS=1,2`).
    #[serde(
        default = "default_supported_majors",
        deserialize_with = "deserialize_majors"
    )]
    pub supported_majors: Vec<u64>,

    /// `collect_all` or `fail_fast`
    #[serde(default)]
    pub mode: ExecutionMode,
}

/// Schema documents loaded from disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Paths to JSON schema documents, each carrying an `x-hsi-version`
    /// annotation for a major not already registered.
    #[serde(default)]
    pub documents: Vec<PathBuf>,
}

fn default_supported_majors() -> Vec<u64> {
    vec![CURRENT_VERSION.major]
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            level: ComplianceLevel::default(),
            supported_majors: default_supported_majors(),
            mode: ExecutionMode::default(),
        }
    }
}

fn deserialize_majors<'de, D>(deserializer: D) -> std::result::Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Majors {
        List(Vec<u64>),
        One(u64),
        Text(String),
    }

    match Majors::deserialize(deserializer)? {
        Majors::List(majors) => Ok(majors),
        Majors::One(major) => Ok(vec![major]),
        Majors::Text(text) => text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    serde::de::Error::custom(format!("'{part}' is not a major version number"))
                })
            })
            .collect(),
    }
}

impl EngineConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<()> {
        if self.validation.supported_majors.is_empty() {
            return Err(ConfigError::Invalid(
                "validation.supported_majors must name at least one major".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-call options derived from this configuration.
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            level: self.validation.level,
            supported_majors: self
                .validation
                .supported_majors
                .iter()
                .copied()
                .collect::<BTreeSet<_>>(),
            mode: self.validation.mode,
        }
    }

    /// Builtin schemas plus every configured document.
    pub fn schema_registry(&self) -> Result<SchemaRegistry> {
        let mut builder = SchemaRegistry::builder().with_document(HSI_1_0_SCHEMA)?;
        for path in &self.schemas.documents {
            let text =
                std::fs::read_to_string(path).map_err(|source| ConfigError::UnreadableSchema {
                    path: path.clone(),
                    source,
                })?;
            debug!("Registering schema document {}", path.display());
            builder = builder.with_document(&text)?;
        }
        Ok(builder.build())
    }
}

/// Configuration loader with layered merging support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration with layered merging:
    /// 1. Defaults
    /// 2. Config file, if one was given
    /// 3. `HSI_` environment variables
    pub fn load(&self) -> Result<EngineConfig> {
        let mut builder = Config::builder();

        let defaults_json = serde_json::to_string(&EngineConfig::default())?;
        builder = builder.add_source(File::from_str(&defaults_json, config::FileFormat::Json));

        if let Some(ref path) = self.config_path {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.clone()));
            }
            info!("Loading HSI engine configuration from {}", path.display());
            builder = builder.add_source(File::from(path.as_path()));
        }

        // HSI_VALIDATION__LEVEL=basic -> validation.level
        builder = builder.add_source(
            Environment::with_prefix("HSI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Locate the default config file in standard locations:
    /// 1. Current directory: ./hsi.toml
    /// 2. XDG config: ~/.config/hsi/config.toml
    /// 3. Home directory: ~/.hsi.toml
    pub fn find_config_file() -> Option<PathBuf> {
        let cwd_config = PathBuf::from("./hsi.toml");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("hsi").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".hsi.toml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<EngineConfig> {
        match Self::find_config_file() {
            Some(path) => Self::new().with_file(path).load(),
            None => Self::new().load(),
        }
    }
}
