/// Engine configuration
///
/// Layered the same way for every consumer:
/// 1. Defaults (from code)
/// 2. Config file (`hsi.toml`)
/// 3. Environment variables (`HSI_*` prefix, `__` for nesting)
///
/// # Example
///
/// ```no_run
/// use hsi_engine::config::ConfigLoader;
///
/// let config = ConfigLoader::load_default()?;
/// let options = config.validation_options();
/// let registry = config.schema_registry()?;
/// # Ok::<(), hsi_engine::config::ConfigError>(())
/// ```
pub mod error;
pub mod loader;

pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, EngineConfig, SchemaConfig, ValidationConfig};
