//! Identifier naming rules
//!
//! Architecture: Pure Domain Services - no I/O, no shared mutable state
//! - `segment` decomposes an identifier into words
//! - `convention` labels each word by casing
//! - `evaluator` applies the ten rules in a fixed order

pub mod convention;
pub mod evaluator;
pub mod segment;

pub use convention::{classify, ConventionLabel};
pub use evaluator::{
    is_exempt, IdentifierAnalysis, RuleEvaluator, EXEMPT_IDENTIFIERS, MAX_IDENTIFIER_LENGTH,
    MAX_WORDS, MIN_IDENTIFIER_LENGTH, MIN_WORDS, NUMBER_WORDS,
};
pub use segment::segment;
