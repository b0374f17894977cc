//! quickeval diagnostics
//!
//! Error codes, byte spans and diagnostic reporting shared by every
//! quickeval crate.

mod diagnostic;
mod error_code;
mod span;

pub use diagnostic::*;
pub use error_code::*;
pub use span::*;
