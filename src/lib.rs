//! Identifier Lint - naming-style analysis for source code identifiers
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure naming rules (`naming`) know nothing about files, parsers or output
//! - Extraction, discovery and reporting sit at the edges behind narrow types
//! - `NamingValidator` wires configuration to analysis and report writing

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod extract;
pub mod lexicon;
pub mod naming;
pub mod remote;
pub mod report;

// Re-export main types for convenient access
pub use domain::identifiers::{Location, Occurrence, SourceText};
pub use domain::violations::{NamingError, NamingResult, RuleName, ViolationReport};

pub use config::{ConfigBuilder, LintConfig};

pub use analyzer::{AnalysisOptions, Analyzer, PathFilter};

pub use extract::{IdentifierExtractor, SourceLanguage};

pub use lexicon::{EnglishSegmenter, FrequencySegmenter, Lexicon, WordListLexicon};

pub use naming::{ConventionLabel, IdentifierAnalysis, RuleEvaluator};

pub use remote::{GithubConfig, GithubSource, RepoRef};

pub use report::aggregate::{IdentifierReport, LintReport, LintSummary};
pub use report::{OutputFormat, ReportFormatter, ReportOptions, ReportView};

use std::path::Path;

/// Main validator providing high-level lint operations
pub struct NamingValidator {
    analyzer: Analyzer,
    report_formatter: ReportFormatter,
}

impl NamingValidator {
    /// Create a new validator with the given configuration
    pub fn new_with_config(config: LintConfig) -> NamingResult<Self> {
        let analyzer = Analyzer::new(config)?;
        Ok(Self { analyzer, report_formatter: ReportFormatter::default() })
    }

    /// Create a validator with default configuration
    pub fn new() -> NamingResult<Self> {
        Self::new_with_config(LintConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> NamingResult<Self> {
        let config = LintConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Ordered rule violations of a single identifier
    pub fn evaluate_identifier(&self, identifier: &str) -> NamingResult<ViolationReport> {
        self.analyzer.evaluate_identifier(identifier)
    }

    /// Words, labels and violations of a single identifier
    pub fn analyze_identifier(&self, identifier: &str) -> NamingResult<IdentifierAnalysis> {
        self.analyzer.evaluator().analyze(identifier)
    }

    /// Lint files and directory trees
    pub fn lint_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> NamingResult<LintReport> {
        self.analyzer.analyze_paths(paths, options)
    }

    /// Lint a single file
    pub fn lint_file<P: AsRef<Path>>(&self, file_path: P) -> NamingResult<LintReport> {
        self.analyzer.analyze_file(file_path)
    }

    /// Lint an entire directory tree
    pub fn lint_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> NamingResult<LintReport> {
        self.analyzer.analyze_directory(root, options)
    }

    /// Lint source texts obtained outside the filesystem
    pub fn lint_sources(
        &self,
        sources: &[SourceText],
        options: &AnalysisOptions,
    ) -> NamingResult<LintReport> {
        self.analyzer.analyze_sources(sources, options)
    }

    /// Download a hosted repository's selected files and lint them
    ///
    /// Path patterns, language restrictions and `max_files` apply as for a local
    /// tree; ignore files do not.
    pub async fn lint_repository(
        &self,
        source: &GithubSource,
        repo: &RepoRef,
        options: &AnalysisOptions,
    ) -> NamingResult<LintReport> {
        let select = self.analyzer.remote_path_selector(options)?;
        let sources = source.fetch_sources(repo, select, options.max_files).await?;
        self.lint_sources(&sources, options)
    }

    /// Format a lint report for output
    pub fn format_report(
        &self,
        report: &LintReport,
        format: OutputFormat,
        view: ReportView,
    ) -> NamingResult<String> {
        self.report_formatter.format_report(report, format, view)
    }

    /// Write the full listing and the violations listing as text files
    pub fn write_reports<A: AsRef<Path>, V: AsRef<Path>>(
        &self,
        report: &LintReport,
        all_path: A,
        violations_path: V,
    ) -> NamingResult<()> {
        self.report_formatter
            .write_to_file(report, OutputFormat::Text, ReportView::All, all_path)?;
        self.report_formatter
            .write_to_file(report, OutputFormat::Text, ReportView::Violations, violations_path)
    }
}

/// Convenience function to create a validator with default settings
pub fn create_validator() -> NamingResult<NamingValidator> {
    NamingValidator::new()
}

/// Convenience function to evaluate one identifier with the default lexicon
pub fn evaluate(identifier: &str) -> NamingResult<ViolationReport> {
    RuleEvaluator::with_defaults().evaluate(identifier)
}

/// Convenience function to lint a directory with default settings
pub fn lint_directory<P: AsRef<Path>>(directory: P) -> NamingResult<LintReport> {
    let validator = NamingValidator::new()?;
    validator.lint_directory(directory, &AnalysisOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_evaluate_identifier() {
        let validator = NamingValidator::new().unwrap();

        assert!(validator.evaluate_identifier("userName").unwrap().is_empty());
        assert_eq!(
            validator.evaluate_identifier("x1").unwrap().rules(),
            &[RuleName::DictionaryWords, RuleName::NumberOfWords, RuleName::ShortIdentifierName]
        );
        assert!(validator.evaluate_identifier("").is_err());
    }

    #[test]
    fn test_analyze_identifier() {
        let analysis = create_validator().unwrap().analyze_identifier("MAX_value").unwrap();

        assert_eq!(analysis.words, vec!["MAX", "value"]);
        assert_eq!(analysis.labels, vec![ConventionLabel::Upper, ConventionLabel::Lower]);
        assert!(analysis.violations.contains(RuleName::NamingConventionAnomaly));
    }

    #[test]
    fn test_single_file_lint() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("app.js");
        fs::write(&test_file, "let retryCount = 0;\nretryCount = retryCount + 1;\n").unwrap();

        let validator = NamingValidator::new().unwrap();
        let report = validator.lint_file(&test_file).unwrap();

        assert_eq!(report.summary.files_analyzed, 1);
        assert_eq!(report.identifiers.len(), 1);
        assert_eq!(report.identifiers[0].occurrence_count(), 3);
    }

    #[test]
    fn test_write_reports() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("tool.py");
        fs::write(&source, "userName = 1\nx1 = userName\n").unwrap();

        let validator = NamingValidator::new().unwrap();
        let report = validator.lint_file(&source).unwrap();

        let all_path = temp_dir.path().join("identifiers.txt");
        let violations_path = temp_dir.path().join("violations.txt");
        validator.write_reports(&report, &all_path, &violations_path).unwrap();

        let all = fs::read_to_string(&all_path).unwrap();
        let violations = fs::read_to_string(&violations_path).unwrap();

        assert!(all.starts_with("userName: found in file(s)\n"));
        assert!(all.contains("x1: found in file(s)\n"));
        assert!(!all.contains("Violates:"));

        assert!(!violations.contains("userName"));
        assert!(violations.contains(
            "at lines: 2:1\n\tViolates: Dictionary Words, Number of Words, Short Identifier Name\n\n\n"
        ));
    }

    #[test]
    fn test_convenience_functions() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("main.go"), "package main\n\nfunc main() {}\n").unwrap();

        assert!(evaluate("total_count").unwrap().is_empty());

        let report = lint_directory(temp_dir.path()).unwrap();
        assert_eq!(report.summary.files_analyzed, 1);
    }

    #[test]
    fn test_config_file_validator() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("identifier_lint.yaml");
        fs::write(&config_path, "version: \"1.0\"\nlexicon:\n  extra_words: [\"kube\"]\n").unwrap();

        let validator = NamingValidator::from_config_file(&config_path).unwrap();
        assert!(!validator
            .evaluate_identifier("kube_cluster")
            .unwrap()
            .contains(RuleName::DictionaryWords));
    }

    #[tokio::test]
    async fn test_lint_repository() {
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let raw_url = format!("{}/raw/tool.py", server.uri());
        let listing = json!([
            {"path": "tool.py", "type": "file", "download_url": raw_url},
            {"path": "target", "type": "dir", "download_url": null},
        ]);
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/raw/tool.py"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("userName = 1\nx1 = userName\n"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents/target"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let source = GithubSource::new(GithubConfig { api_url: server.uri(), ..Default::default() })
            .unwrap();
        let validator = NamingValidator::new().unwrap();
        let report = validator
            .lint_repository(&source, &RepoRef::new("octo", "demo"), &AnalysisOptions::default())
            .await
            .unwrap();

        assert_eq!(report.summary.files_analyzed, 1);
        assert!(report.get("userName").unwrap().violations.is_empty());
        assert!(report.get("x1").unwrap().is_violating());
        assert_eq!(
            report.get("x1").unwrap().occurrences[0].file_path,
            std::path::PathBuf::from("tool.py")
        );
    }
}
