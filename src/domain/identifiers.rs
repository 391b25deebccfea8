//! Identifier occurrences as emitted by the extraction layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 1-based source position of an identifier token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Build from a 0-based row/column pair, as tree-sitter reports them
    pub fn from_zero_based(row: usize, column: usize) -> Self {
        Self::from_line_and_offset(saturating_u32(row).saturating_add(1) as usize, column)
    }

    /// Build from a 1-based line and a 0-based column, as proc-macro2 spans report them
    pub fn from_line_and_offset(line: usize, column: usize) -> Self {
        Self {
            line: saturating_u32(line),
            column: saturating_u32(column).saturating_add(1),
        }
    }
}

/// Positions beyond `u32::MAX` clamp instead of wrapping
fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One sighting of an identifier in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub identifier: String,
    pub file_path: PathBuf,
    pub location: Location,
}

impl Occurrence {
    pub fn new(identifier: impl Into<String>, file_path: PathBuf, location: Location) -> Self {
        Self { identifier: identifier.into(), file_path, location }
    }
}

/// Source text that did not come from the local filesystem
///
/// `path` is relative to the root it was fetched from and is what reports show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub path: PathBuf,
    pub content: String,
}

impl SourceText {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self { path: path.into(), content: content.into() }
    }
}
