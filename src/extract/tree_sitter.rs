//! Tree-sitter backed extraction for Python, JavaScript, Go and Ruby
//!
//! Every node whose grammar kind is exactly `identifier` is reported. Grammar-specific
//! kinds such as `property_identifier` or `type_identifier` are not.

use super::{IdentifierExtractor, SourceLanguage};
use crate::domain::identifiers::{Location, Occurrence};
use crate::domain::violations::{NamingError, NamingResult};
use ::tree_sitter::{Language, Node, Parser};
use std::path::Path;

const IDENTIFIER_KIND: &str = "identifier";

/// Extractor for one tree-sitter grammar
#[derive(Debug, Clone, Copy)]
pub struct TreeSitterExtractor {
    language: SourceLanguage,
}

impl TreeSitterExtractor {
    /// Rust sources are handled by `RustExtractor`; asking for them here yields an
    /// extractor whose `extract` fails
    pub fn new(language: SourceLanguage) -> Self {
        Self { language }
    }

    fn grammar(&self) -> Option<Language> {
        match self.language {
            SourceLanguage::Python => Some(tree_sitter_python::LANGUAGE.into()),
            SourceLanguage::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            SourceLanguage::Go => Some(tree_sitter_go::LANGUAGE.into()),
            SourceLanguage::Ruby => Some(tree_sitter_ruby::LANGUAGE.into()),
            SourceLanguage::Rust => None,
        }
    }

    fn parser(&self, file_path: &Path) -> NamingResult<Parser> {
        let grammar = self.grammar().ok_or_else(|| {
            NamingError::extraction(
                file_path.display().to_string(),
                format!("no tree-sitter grammar registered for {}", self.language),
            )
        })?;

        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| NamingError::extraction(file_path.display().to_string(), e.to_string()))?;
        Ok(parser)
    }
}

impl IdentifierExtractor for TreeSitterExtractor {
    fn extract(&self, file_path: &Path, content: &str) -> NamingResult<Vec<Occurrence>> {
        let mut parser = self.parser(file_path)?;
        let tree = parser.parse(content, None).ok_or_else(|| {
            NamingError::extraction(file_path.display().to_string(), "parser returned no tree")
        })?;

        let mut occurrences = Vec::new();
        collect_identifiers(tree.root_node(), content.as_bytes(), file_path, &mut occurrences);

        tracing::trace!(
            "{} identifiers in {} ({})",
            occurrences.len(),
            file_path.display(),
            self.language
        );
        Ok(occurrences)
    }

    fn language(&self) -> SourceLanguage {
        self.language
    }
}

/// Pre-order walk so occurrences come out in source order
fn collect_identifiers(root: Node, source: &[u8], file_path: &Path, out: &mut Vec<Occurrence>) {
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        if node.kind() == IDENTIFIER_KIND {
            if let Ok(text) = node.utf8_text(source) {
                if !text.is_empty() {
                    let start = node.start_position();
                    out.push(Occurrence::new(
                        text,
                        file_path.to_path_buf(),
                        Location::from_zero_based(start.row, start.column),
                    ));
                }
            }
        }

        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }

        loop {
            if !cursor.goto_parent() {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(language: SourceLanguage, file: &str, source: &str) -> Vec<String> {
        TreeSitterExtractor::new(language)
            .extract(Path::new(file), source)
            .unwrap()
            .into_iter()
            .map(|o| o.identifier)
            .collect()
    }

    #[test]
    fn test_python_identifiers() {
        let source = "def total_count(items):\n    itemCount = len(items)\n    return itemCount\n";
        assert_eq!(
            names(SourceLanguage::Python, "a.py", source),
            vec!["total_count", "items", "itemCount", "len", "items", "itemCount"]
        );
    }

    #[test]
    fn test_python_locations() {
        let occurrences = TreeSitterExtractor::new(SourceLanguage::Python)
            .extract(Path::new("a.py"), "x = 1\nuser_name = x\n")
            .unwrap();

        let locations: Vec<String> =
            occurrences.iter().map(|o| format!("{}@{}", o.identifier, o.location)).collect();
        assert_eq!(locations, vec!["x@1:1", "user_name@2:1", "x@2:13"]);
    }

    #[test]
    fn test_javascript_skips_property_names() {
        let source = "const userName = account.name;\nfunction greet(person) { return person; }\n";
        let names = names(SourceLanguage::JavaScript, "a.js", source);

        assert_eq!(names, vec!["userName", "account", "greet", "person", "person"]);
    }

    #[test]
    fn test_go_identifiers() {
        let source = "package main\n\nfunc main() {\n\tretryCount := 3\n\t_ = retryCount\n}\n";
        let names = names(SourceLanguage::Go, "main.go", source);

        assert!(names.contains(&"main".to_string()));
        assert_eq!(names.iter().filter(|n| *n == "retryCount").count(), 2);
    }

    #[test]
    fn test_ruby_identifiers() {
        let source = "def greet(user_name)\n  puts user_name\nend\n";
        let names = names(SourceLanguage::Ruby, "a.rb", source);

        assert!(names.contains(&"greet".to_string()));
        assert_eq!(names.iter().filter(|n| *n == "user_name").count(), 2);
    }

    #[test]
    fn test_rust_is_not_a_tree_sitter_language() {
        let err = TreeSitterExtractor::new(SourceLanguage::Rust)
            .extract(Path::new("a.rs"), "fn main() {}")
            .unwrap_err();
        assert!(matches!(err, NamingError::Extraction { .. }));
    }
}
