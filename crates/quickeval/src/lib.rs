//! Multi-domain query evaluation for Rust
//!
//! quickeval answers short free-form queries:
//! - Arithmetic with functions and constants (`sqrt(16) + 2pi`)
//! - Boolean, bitwise and comparison logic (`0xFF & 0x0F`, `5 > 3`)
//! - Unit conversion (`10 km to miles`, `100 celsius to fahrenheit`)
//! - Date arithmetic (`today + 7 days`, `days between 2024-01-01 and 2024-01-31`)
//!
//! A pattern-weighted [`QueryClassifier`] decides which evaluators to try,
//! and a [`ResultCache`] remembers answers to repeated queries.
//!
//! # Example
//!
//! ```
//! use quickeval::{QueryEngine, QueryEngineConfig};
//! use quickeval::types::EngineConfig;
//!
//! let engine = QueryEngine::new(QueryEngineConfig::new(EngineConfig::default().with_precision(4)))?;
//! let results = engine.query("10 km to miles");
//! assert_eq!(results[0].result, "6.2137");
//! assert_eq!(results[0].unit.as_deref(), Some("mi"));
//! # Ok::<(), quickeval::QueryError>(())
//! ```

// Re-export the member crates
pub use quickeval_diagnostics as diagnostics;
pub use quickeval_eval as eval;
pub use quickeval_parser as parser;
pub use quickeval_types as types;

pub mod cache;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;

pub use cache::{CacheStats, ResultCache};
pub use classifier::{Classification, QueryClassifier, QueryPattern};
pub use config::QueryEngineConfig;
pub use engine::{QueryEngine, is_dynamic_query};
pub use error::{CacheError, QueryError, Result};
pub use quickeval_types::{CalculationResult, CalculationType};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
