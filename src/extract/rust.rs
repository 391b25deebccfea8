//! Rust identifier extraction using syn for AST parsing
//!
//! Code Quality Principle: Specialized Extraction Services - syn supplies the token spans
//! - Implements IdentifierExtractor for clean polymorphism
//! - Raw identifiers are reported without their `r#` prefix
//! - Path keywords and attribute contents are not user-chosen names and are skipped

use super::{IdentifierExtractor, SourceLanguage};
use crate::domain::identifiers::{Location, Occurrence};
use crate::domain::violations::NamingResult;
use proc_macro2::Ident;
use std::path::{Path, PathBuf};
use syn::ext::IdentExt;
use syn::visit::Visit;

/// Path segments that are keywords rather than names
const PATH_KEYWORDS: [&str; 4] = ["self", "Self", "crate", "super"];

/// Extractor for Rust source files
#[derive(Debug, Default)]
pub struct RustExtractor;

impl RustExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl IdentifierExtractor for RustExtractor {
    fn extract(&self, file_path: &Path, content: &str) -> NamingResult<Vec<Occurrence>> {
        let syntax_tree = match syn::parse_file(content) {
            Ok(tree) => tree,
            Err(e) => {
                // Unparsable files contribute no identifiers
                tracing::debug!("Failed to parse Rust file {}: {}", file_path.display(), e);
                return Ok(Vec::new());
            }
        };

        let mut visitor = IdentVisitor {
            file_path: file_path.to_path_buf(),
            occurrences: Vec::new(),
        };
        visitor.visit_file(&syntax_tree);

        Ok(visitor.occurrences)
    }

    fn language(&self) -> SourceLanguage {
        SourceLanguage::Rust
    }
}

/// Collects every identifier token syn exposes, in traversal order
struct IdentVisitor {
    file_path: PathBuf,
    occurrences: Vec<Occurrence>,
}

impl Visit<'_> for IdentVisitor {
    fn visit_ident(&mut self, ident: &Ident) {
        let name = ident.unraw().to_string();
        if PATH_KEYWORDS.contains(&name.as_str()) {
            return;
        }

        let start = ident.span().start();
        self.occurrences.push(Occurrence::new(
            name,
            self.file_path.clone(),
            Location::from_line_and_offset(start.line, start.column),
        ));
    }

    fn visit_attribute(&mut self, _attr: &syn::Attribute) {}

    fn visit_lifetime(&mut self, _lifetime: &syn::Lifetime) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<Occurrence> {
        RustExtractor::new().extract(Path::new("src/sample.rs"), source).unwrap()
    }

    fn names(source: &str) -> Vec<String> {
        extract(source).into_iter().map(|o| o.identifier).collect()
    }

    #[test]
    fn test_extracts_declarations_and_uses() {
        let source = "fn total_count(items: Vec<u32>) -> usize {\n    let itemCount = items.len();\n    itemCount\n}\n";
        let names = names(source);

        assert_eq!(
            names,
            vec!["total_count", "items", "Vec", "u32", "usize", "itemCount", "items", "len", "itemCount"]
        );
    }

    #[test]
    fn test_locations_are_one_based() {
        let occurrences = extract("struct Point {\n    x: i32,\n}\n");

        assert_eq!(occurrences[0].identifier, "Point");
        assert_eq!(occurrences[0].location, Location::new(1, 8));
        assert_eq!(occurrences[1].identifier, "x");
        assert_eq!(occurrences[1].location, Location::new(2, 5));
        assert!(occurrences.iter().all(|o| o.file_path == Path::new("src/sample.rs")));
    }

    #[test]
    fn test_skips_keywords_attributes_and_lifetimes() {
        let source = "#[derive(Debug)]\nstruct Holder<'a> { inner: &'a str }\nimpl<'a> Holder<'a> { fn get(&self) -> &'a str { self.inner } }\n";
        let names = names(source);

        assert!(!names.iter().any(|n| n == "self" || n == "derive" || n == "Debug" || n == "a"));
        assert!(names.contains(&"Holder".to_string()));
        assert!(names.contains(&"inner".to_string()));
    }

    #[test]
    fn test_raw_identifiers_lose_prefix() {
        assert_eq!(names("fn r#match() {}"), vec!["match"]);
    }

    #[test]
    fn test_unparsable_source_yields_nothing() {
        assert!(extract("fn broken( {").is_empty());
    }
}
