// Port Layer - Interfaces for external dependencies

pub mod data_source;
pub mod id_provider; // For deterministic testing
pub mod time_provider;

// Re-exports
pub use data_source::{DataSource, SourceError};
pub use id_provider::IdProvider;
pub use time_provider::TimeProvider;
