//! Core domain concepts shared across all subdomains.
//!
//! - [`chunk::Chunk`] — a document slice, the unit of plugin routing
//! - [`error::DomainError`] — domain-level errors

pub mod chunk;
pub mod error;
