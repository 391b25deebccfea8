//! Domain layer for identifier-lint
//!
//! CDD Principle: Domain Model - Pure vocabulary of naming analysis
//! - Rule names, violation reports and identifier occurrences
//! - Independent of parsers, file systems and output formats

pub mod identifiers;
pub mod violations;

pub use identifiers::*;
pub use violations::*;
