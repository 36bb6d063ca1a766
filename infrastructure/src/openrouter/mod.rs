//! OpenRouter-style reasoning service adapters.
//!
//! One shared HTTP client, two port implementations on top of it: the
//! structured-output reasoning gateway (classifier, arbitrator) and the
//! issue extractor (ensemble members).

pub mod client;
pub mod extractor;
pub mod gateway;
pub mod protocol;

pub use client::{OpenRouterClient, ServiceConfig};
pub use extractor::OpenRouterIssueExtractor;
pub use gateway::OpenRouterReasoningGateway;
