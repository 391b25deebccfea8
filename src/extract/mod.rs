//! Identifier extraction from source files
//!
//! Architecture: Strategy Pattern - one extractor per parsing technology
//! - `RustExtractor` walks a `syn` syntax tree
//! - `TreeSitterExtractor` collects `identifier` nodes for the other languages
//! - Extractors never evaluate names; they only report where identifiers occur

pub mod rust;
pub mod tree_sitter;

use crate::domain::identifiers::Occurrence;
use crate::domain::violations::{NamingError, NamingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use self::rust::RustExtractor;
pub use self::tree_sitter::TreeSitterExtractor;

/// Languages the linter can pull identifiers out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    Rust,
    Python,
    JavaScript,
    Go,
    Ruby,
}

impl SourceLanguage {
    pub const ALL: [SourceLanguage; 5] =
        [Self::Rust, Self::Python, Self::JavaScript, Self::Go, Self::Ruby];

    /// Detect language from a file extension string
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|language| language.extensions().contains(&ext))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Rust => &["rs"],
            Self::Python => &["py"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Self::Go => &["go"],
            Self::Ruby => &["rb"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Go => "go",
            Self::Ruby => "ruby",
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceLanguage {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.as_str() == wanted)
            .ok_or_else(|| NamingError::config(format!("Unknown language '{s}'")))
    }
}

/// Trait for pulling identifier occurrences out of one kind of source file
pub trait IdentifierExtractor: Send + Sync {
    /// Every identifier token in `content`, in source order
    fn extract(&self, file_path: &Path, content: &str) -> NamingResult<Vec<Occurrence>>;

    fn language(&self) -> SourceLanguage;

    /// Check if this extractor can handle the given file type
    fn handles_file(&self, file_path: &Path) -> bool {
        SourceLanguage::from_path(file_path) == Some(self.language())
    }
}

/// Extractor for a language
pub fn extractor_for(language: SourceLanguage) -> Box<dyn IdentifierExtractor> {
    match language {
        SourceLanguage::Rust => Box::new(RustExtractor::new()),
        other => Box::new(TreeSitterExtractor::new(other)),
    }
}
