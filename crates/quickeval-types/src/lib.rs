//! quickeval shared types
//!
//! This crate defines the data shared by every quickeval crate:
//! - `CalculationResult` and its `CalculationType` tag
//! - `Token` produced by the per-domain tokenizers
//! - `EngineConfig` (precision, angle unit)
//! - Deterministic number formatting

pub mod config;
pub mod format;
pub mod result;
pub mod token;

pub use config::*;
pub use format::*;
pub use result::*;
pub use token::*;
