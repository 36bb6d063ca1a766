//! Infrastructure layer for redline
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openrouter;
pub mod plugins;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileClassifierConfig, FileConfig, FileEnsembleConfig,
    FileExecutorConfig, FileExtractorConfig, FileLoggingConfig, FileServiceConfig,
};
pub use logging::JsonlRunLogger;
pub use openrouter::{
    OpenRouterClient, OpenRouterIssueExtractor, OpenRouterReasoningGateway, ServiceConfig,
};
pub use plugins::PromptPlugin;
