//! Logging infrastructure — structured run logging.
//!
//! Provides [`JsonlRunLogger`], a JSONL file writer that records pipeline
//! progress events through the
//! [`PipelineProgress`](redline_application::PipelineProgress) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlRunLogger;
