//! Configuration loading and management for the identifier linter
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain objects
//! - Defaults live here, not in the CLI
//! - Naming thresholds are fixed and deliberately absent from configuration

use crate::domain::violations::{NamingError, NamingResult};
use crate::extract::SourceLanguage;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file names looked up in the working directory, in order
pub const DEFAULT_CONFIG_FILES: [&str; 3] =
    ["identifier_lint.yaml", "identifier_lint.yml", ".identifier_lint.yaml"];

/// Supported configuration format versions
const SUPPORTED_VERSIONS: [&str; 1] = ["1.0"];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Configuration format version
    pub version: String,
    /// Path filtering configuration
    #[serde(default)]
    pub paths: PathConfig,
    /// Languages whose files are scanned
    #[serde(default = "default_languages")]
    pub languages: Vec<SourceLanguage>,
    /// Dictionary extensions
    #[serde(default)]
    pub lexicon: LexiconConfig,
    /// Report shaping
    #[serde(default)]
    pub report: ReportConfig,
}

/// Path filtering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Include/exclude patterns (gitignore-style)
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Optional ignore file name, discovered up the directory tree
    pub ignore_file: Option<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                "target/".to_string(),
                "**/node_modules/".to_string(),
                "**/.git/".to_string(),
                "**/vendor/".to_string(),
            ],
            ignore_file: Some(".namingignore".to_string()),
        }
    }
}

/// Extra vocabulary accepted by the dictionary rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Word-list files, whitespace separated, `#` comment lines
    #[serde(default)]
    pub word_lists: Vec<PathBuf>,
    /// Inline project vocabulary
    #[serde(default)]
    pub extra_words: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Regexes; identifiers matching any of them are dropped from both views
    #[serde(default)]
    pub ignore_identifiers: Vec<String>,
}

impl ReportConfig {
    /// Compile the ignore patterns
    pub fn compiled_ignores(&self) -> NamingResult<Vec<Regex>> {
        self.ignore_identifiers
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    NamingError::config(format!("Invalid ignore_identifiers pattern '{pattern}': {e}"))
                })
            })
            .collect()
    }
}

fn default_languages() -> Vec<SourceLanguage> {
    SourceLanguage::ALL.to_vec()
}

impl LintConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NamingResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            NamingError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            NamingError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> NamingResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| NamingError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// First default configuration file present in `dir`, if any
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            paths: PathConfig::default(),
            languages: default_languages(),
            lexicon: LexiconConfig::default(),
            report: ReportConfig::default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> NamingResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(NamingError::config(format!(
                "Unsupported configuration version: {}. Supported versions: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        }

        if self.languages.is_empty() {
            return Err(NamingError::config("At least one language must be enabled"));
        }

        self.report.compiled_ignores()?;
        Ok(())
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> NamingResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NamingError::config(format!("Failed to serialize config: {e}")))
    }

    /// Convert to YAML, the on-disk format
    pub fn to_yaml(&self) -> NamingResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| NamingError::config(format!("Failed to serialize config: {e}")))
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: LintConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: LintConfig::default() }
    }

    /// Add a path pattern
    pub fn add_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.paths.patterns.push(pattern.into());
        self
    }

    /// Set the ignore file name
    pub fn ignore_file(mut self, filename: impl Into<String>) -> Self {
        self.config.paths.ignore_file = Some(filename.into());
        self
    }

    /// Restrict scanning to the given languages
    pub fn languages(mut self, languages: impl IntoIterator<Item = SourceLanguage>) -> Self {
        self.config.languages = languages.into_iter().collect();
        self
    }

    pub fn add_word_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.lexicon.word_lists.push(path.into());
        self
    }

    pub fn add_extra_word(mut self, word: impl Into<String>) -> Self {
        self.config.lexicon.extra_words.push(word.into());
        self
    }

    /// Leave identifiers matching `pattern` out of reports
    pub fn ignore_identifier(mut self, pattern: impl Into<String>) -> Self {
        self.config.report.ignore_identifiers.push(pattern.into());
        self
    }

    /// Build the final configuration
    pub fn build(self) -> NamingResult<LintConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
