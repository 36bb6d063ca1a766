//! Configuration file loading for redline
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./redline.toml` or `./.redline.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/redline/config.toml`
//! 4. Fallback: `~/.config/redline/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileClassifierConfig, FileConfig, FileEnsembleConfig,
    FileExecutorConfig, FileExtractorConfig, FileLoggingConfig, FileServiceConfig,
};
pub use loader::ConfigLoader;
