//! Path filtering using .gitignore-style patterns
//!
//! Architectural Principle: Service Layer - PathFilter owns every decision about which files are linted
//! - Patterns apply in order, the last match wins, and "!" re-includes
//! - A pattern without "/" matches any path component by name; one with "/" matches the path
//! - A trailing "/" restricts a pattern to directories and everything below them
//! - Ignore files are discovered up the directory tree; nearer files override outer ones

use crate::domain::violations::{NamingError, NamingResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages path filtering using .gitignore-style patterns
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Include/exclude patterns
    patterns: Vec<FilterPattern>,
    /// Name of ignore files to process, if enabled
    ignore_filename: Option<String>,
}

/// A single path filter pattern
#[derive(Debug, Clone)]
struct FilterPattern {
    pattern: glob::Pattern,
    /// Starts with "!"
    is_include: bool,
    /// Ends with "/"
    directory_only: bool,
    /// Contains "/" other than a trailing one
    anchored: bool,
}

impl FilterPattern {
    fn parse(raw: &str) -> Result<Self, glob::PatternError> {
        let (is_include, body) = match raw.strip_prefix('!') {
            Some(stripped) => (true, stripped),
            None => (false, raw),
        };

        let directory_only = body.ends_with('/');
        let body = body.trim_end_matches('/');
        let anchored = body.contains('/');
        let body = body.strip_prefix('/').unwrap_or(body);

        Ok(Self {
            pattern: glob::Pattern::new(body)?,
            is_include,
            directory_only,
            anchored,
        })
    }

    /// Whether this pattern covers `path` or one of its parent directories
    fn matches(&self, path: &Path, is_dir: bool) -> bool {
        path.ancestors()
            .filter(|candidate| !candidate.as_os_str().is_empty())
            .enumerate()
            .filter(|(depth, _)| !self.directory_only || is_dir || *depth > 0)
            .any(|(_, candidate)| self.matches_exactly(candidate))
    }

    fn matches_exactly(&self, path: &Path) -> bool {
        if self.anchored {
            return self.pattern.matches_path(path);
        }

        path.file_name()
            .map(|name| self.pattern.matches(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

impl PathFilter {
    /// Create a new path filter with the given patterns
    pub fn new(patterns: Vec<String>, ignore_filename: Option<String>) -> NamingResult<Self> {
        let mut filter = Self { patterns: Vec::new(), ignore_filename };
        for pattern in patterns {
            filter.add_pattern(pattern)?;
        }
        Ok(filter)
    }

    /// Add a pattern to the filter
    pub fn add_pattern(&mut self, pattern: String) -> NamingResult<()> {
        let parsed = FilterPattern::parse(&pattern)
            .map_err(|e| NamingError::pattern(format!("Invalid pattern '{pattern}': {e}")))?;
        self.patterns.push(parsed);
        Ok(())
    }

    /// Stop reading ignore files
    pub fn disable_ignore_files(&mut self) {
        self.ignore_filename = None;
    }

    /// Check if a path should be linted; patterns see the path as given
    pub fn should_analyze<P: AsRef<Path>>(&self, path: P) -> NamingResult<bool> {
        let path = path.as_ref();
        self.is_selected(path, path, path.is_dir())
    }

    /// Pattern verdict for a path that only exists remotely; ignore files play no part
    pub fn allows(&self, relative: &Path, is_dir: bool) -> bool {
        Self::apply_patterns(&self.patterns, relative, is_dir)
    }

    fn is_selected(&self, relative: &Path, actual: &Path, is_dir: bool) -> NamingResult<bool> {
        if !Self::apply_patterns(&self.patterns, relative, is_dir) {
            return Ok(false);
        }

        if self.ignore_filename.is_some() && self.is_ignored_by_files(actual, is_dir)? {
            return Ok(false);
        }

        Ok(true)
    }

    /// Last matching pattern decides; unmatched paths are included
    fn apply_patterns(patterns: &[FilterPattern], path: &Path, is_dir: bool) -> bool {
        patterns
            .iter()
            .rev()
            .find(|pattern| pattern.matches(path, is_dir))
            .map(|pattern| pattern.is_include)
            .unwrap_or(true)
    }

    /// Check if path is ignored by ignore files in any ancestor directory
    fn is_ignored_by_files(&self, path: &Path, is_dir: bool) -> NamingResult<bool> {
        let Some(ignore_filename) = &self.ignore_filename else {
            return Ok(false);
        };

        let ancestors: Vec<&Path> = path.ancestors().skip(1).collect();
        let mut is_ignored = false;

        // Outermost first, so closer ignore files get the final say
        for dir in ancestors.into_iter().rev() {
            let ignore_file = dir.join(ignore_filename);
            if !ignore_file.is_file() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };

            let patterns = self.load_ignore_file(&ignore_file)?;
            if let Some(pattern) = patterns.iter().rev().find(|p| p.matches(relative, is_dir)) {
                is_ignored = !pattern.is_include;
            }
        }

        Ok(is_ignored)
    }

    /// Load patterns from an ignore file
    fn load_ignore_file(&self, path: &Path) -> NamingResult<Vec<FilterPattern>> {
        let content = fs::read_to_string(path).map_err(|e| {
            NamingError::config(format!("Failed to read ignore file '{}': {}", path.display(), e))
        })?;

        let mut patterns = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match FilterPattern::parse(line) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => {
                    tracing::warn!("Invalid pattern '{}' in {}: {}", line, path.display(), e);
                }
            }
        }

        Ok(patterns)
    }

    /// Every file under `root` that should be linted, in a stable order
    ///
    /// Patterns match paths relative to `root`. Excluded directories are not descended
    /// into. A `root` that is itself a file is returned when it passes the filter.
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> NamingResult<Vec<PathBuf>> {
        let root = root.as_ref();

        if root.is_file() {
            let relative = root.file_name().map(Path::new).unwrap_or(root);
            return Ok(if self.is_selected(relative, root, false)? {
                vec![root.to_path_buf()]
            } else {
                Vec::new()
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                Self::apply_patterns(&self.patterns, relative, true)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable path: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.is_selected(relative, path, false)? {
                files.push(path.to_path_buf());
            }
        }

        tracing::debug!("Discovered {} candidate files under {}", files.len(), root.display());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filter(patterns: &[&str]) -> PathFilter {
        PathFilter::new(patterns.iter().map(|p| p.to_string()).collect(), None).unwrap()
    }

    #[test]
    fn test_basic_pattern_matching() {
        let filter = filter(&["target/**", "*.md"]);

        assert!(filter.should_analyze("src/lib.rs").unwrap());
        assert!(!filter.should_analyze("target/debug/lib.rs").unwrap());
        assert!(!filter.should_analyze("README.md").unwrap());
        assert!(!filter.should_analyze("docs/guide.md").unwrap());
    }

    #[test]
    fn test_include_override() {
        let filter = filter(&["target/**", "!target/special/**"]);

        assert!(!filter.should_analyze("target/debug/lib.rs").unwrap());
        assert!(filter.should_analyze("target/special/lib.rs").unwrap());
    }

    #[test]
    fn test_last_matching_pattern_wins() {
        let filter = filter(&["tests/**", "!tests/important.rs", "!*.rs"]);

        assert!(filter.should_analyze("src/lib.rs").unwrap());
        assert!(filter.should_analyze("tests/unit.rs").unwrap());
        assert!(filter.should_analyze("tests/important.rs").unwrap());
        assert!(!filter.should_analyze("tests/data.json").unwrap());
    }

    #[test]
    fn test_allows_checks_patterns_only() {
        let filter = filter(&["node_modules/", "docs/**", "!docs/conf.py"]);

        assert!(!filter.allows(Path::new("web/node_modules"), true));
        assert!(filter.allows(Path::new("web/node_modules.js"), false));
        assert!(!filter.allows(Path::new("docs/build.py"), false));
        assert!(filter.allows(Path::new("docs/conf.py"), false));
    }

    #[test]
    fn test_directory_patterns_cover_contents() {
        let filter = filter(&["node_modules/"]);

        assert!(!filter.should_analyze("web/node_modules/react/index.js").unwrap());
        assert!(filter.should_analyze("web/src/node_modules.js").unwrap());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = PathFilter::new(vec!["[invalid".to_string()], None).unwrap_err();
        assert!(matches!(err, NamingError::Pattern { .. }));
    }

    #[test]
    fn test_default_config_patterns() {
        let paths = crate::config::PathConfig::default();
        let filter = PathFilter::new(paths.patterns, None).unwrap();

        assert!(!filter.should_analyze("target/debug/build.rs").unwrap());
        assert!(!filter.should_analyze("web/node_modules/react/index.js").unwrap());
        assert!(!filter.should_analyze("third_party/vendor/lib.go").unwrap());
        assert!(filter.should_analyze("src/lib.rs").unwrap());
    }

    #[test]
    fn test_ignore_file_discovery() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("tests")).unwrap();
        fs::write(root.join(".namingignore"), "*.tmp\ntests/**\n!tests/important.rs\n").unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();
        fs::write(root.join("temp.tmp"), "").unwrap();
        fs::write(root.join("tests/unit.rs"), "").unwrap();
        fs::write(root.join("tests/important.rs"), "").unwrap();

        let filter = PathFilter::new(vec![], Some(".namingignore".to_string())).unwrap();

        assert!(filter.should_analyze(root.join("src/lib.rs")).unwrap());
        assert!(!filter.should_analyze(root.join("temp.tmp")).unwrap());
        assert!(!filter.should_analyze(root.join("tests/unit.rs")).unwrap());
        assert!(filter.should_analyze(root.join("tests/important.rs")).unwrap());

        let mut no_ignore = filter.clone();
        no_ignore.disable_ignore_files();
        assert!(no_ignore.should_analyze(root.join("temp.tmp")).unwrap());
    }

    #[test]
    fn test_nested_ignore_file_overrides_outer() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("pkg")).unwrap();
        fs::write(root.join(".namingignore"), "*.py\n").unwrap();
        fs::write(root.join("pkg/.namingignore"), "!keep.py\n").unwrap();
        fs::write(root.join("pkg/keep.py"), "").unwrap();
        fs::write(root.join("pkg/drop.py"), "").unwrap();

        let filter = PathFilter::new(vec![], Some(".namingignore".to_string())).unwrap();

        assert!(filter.should_analyze(root.join("pkg/keep.py")).unwrap());
        assert!(!filter.should_analyze(root.join("pkg/drop.py")).unwrap());
    }

    #[test]
    fn test_find_files_is_sorted_and_prunes_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::write(root.join("src/b.rs"), "").unwrap();
        fs::write(root.join("src/a.rs"), "").unwrap();
        fs::write(root.join("src/nested/c.py"), "").unwrap();
        fs::write(root.join("target/debug/out.rs"), "").unwrap();

        let filter = filter(&["target/"]);
        let files: Vec<PathBuf> = filter
            .find_files(root)
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            files,
            vec![PathBuf::from("src/a.rs"), PathBuf::from("src/b.rs"), PathBuf::from("src/nested/c.py")]
        );
    }

    #[test]
    fn test_find_files_accepts_single_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("main.go");
        fs::write(&file, "package main").unwrap();

        assert_eq!(filter(&[]).find_files(&file).unwrap(), vec![file.clone()]);
        assert!(filter(&["*.go"]).find_files(&file).unwrap().is_empty());
    }
}
