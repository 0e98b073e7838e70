//! ScholarNexus Common Library
//!
//! Shared code for the ScholarNexus services including:
//! - Paper and knowledge graph models
//! - Paper source abstraction (mock catalogue, Semantic Scholar)
//! - Key-value cache abstraction (Redis, in-memory)
//! - Chat-completion client and prompts
//! - Offline research analytics
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod cache;
pub mod config;
pub mod errors;
pub mod insight;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod sources;

// Re-export commonly used types
pub use cache::KvStore;
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use sources::PaperSource;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
