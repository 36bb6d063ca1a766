//! Execution subdomain - plugin analysis outputs and terminal run results.

pub mod params;
pub mod result;

pub use params::ExecutorParams;
pub use result::{AnalysisOutput, ExecutionOutcome, ExecutionResult, Finding};
