//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - LintReport (domain) is converted to various external representations
//! - Each format encapsulates the rules for its own layout
//! - The text format is the classic two-view listing: every identifier, or violators only

pub mod aggregate;

use crate::domain::violations::{NamingError, NamingResult};
use aggregate::{IdentifierReport, LintReport};
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use aggregate::{FileOccurrences, IdentifierIndex, LintSummary};

/// Supported output formats for lint reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain listing, one block per identifier
    Text,
    /// JSON format for programmatic consumption
    Json,
    /// GitHub Actions workflow annotations
    GitHub,
}

impl OutputFormat {
    /// Parse format from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "github" => Some(Self::GitHub),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["text", "json", "github"]
    }
}

/// Which identifiers a report lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportView {
    /// Every distinct identifier, without verdicts
    All,
    /// Only identifiers that violate a rule, with their rule names
    Violations,
}

impl ReportView {
    fn includes(self, report: &IdentifierReport) -> bool {
        match self {
            Self::All => true,
            Self::Violations => report.is_violating(),
        }
    }
}

/// Options for customizing report output
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Whether to use colored output (text format only)
    pub use_colors: bool,
    /// Append a summary line to text output
    pub show_summary: bool,
    /// Maximum number of identifiers to include
    pub max_identifiers: Option<usize>,
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format one view of a lint report
    pub fn format_report(
        &self,
        report: &LintReport,
        format: OutputFormat,
        view: ReportView,
    ) -> NamingResult<String> {
        let entries = self.select(report, view);

        match format {
            OutputFormat::Text => Ok(self.format_text(report, &entries, view)),
            OutputFormat::Json => self.format_json(report, &entries, view),
            OutputFormat::GitHub => Ok(self.format_github(&entries)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &LintReport,
        format: OutputFormat,
        view: ReportView,
        mut writer: W,
    ) -> NamingResult<()> {
        let formatted = self.format_report(report, format, view)?;
        writer.write_all(formatted.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Create (or truncate) `path` and write the report into it
    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        report: &LintReport,
        format: OutputFormat,
        view: ReportView,
        path: P,
    ) -> NamingResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            NamingError::validation(format!("Failed to create report '{}': {}", path.display(), e))
        })?;

        self.write_report(report, format, view, BufWriter::new(file))?;
        tracing::debug!("Wrote {:?} report to {}", view, path.display());
        Ok(())
    }

    fn select<'a>(&self, report: &'a LintReport, view: ReportView) -> Vec<&'a IdentifierReport> {
        let selected = report.identifiers.iter().filter(|entry| view.includes(entry));

        match self.options.max_identifiers {
            Some(max) => selected.take(max).collect(),
            None => selected.collect(),
        }
    }

    /// Text listing
    ///
    /// ```text
    /// userName: found in file(s)
    ///     src/app.py at lines: 3:1, 9:4
    ///     Violates: Dictionary Words        <- violations view only
    /// ```
    /// followed by two blank lines per entry.
    fn format_text(&self, report: &LintReport, entries: &[&IdentifierReport], view: ReportView) -> String {
        let mut output = String::new();

        for entry in entries {
            output.push_str(&self.paint_identifier(&entry.identifier));
            output.push_str(": found in file(s)\n");

            for file in &entry.occurrences {
                let locations: Vec<String> = file.locations.iter().map(ToString::to_string).collect();
                output.push_str(&format!(
                    "\t{} at lines: {}\n",
                    file.file_path.display(),
                    locations.join(", ")
                ));
            }

            if view == ReportView::Violations {
                if let Some(violates) = entry.violations.format_violates() {
                    output.push('\t');
                    output.push_str(&self.paint_violation(&violates));
                    output.push('\n');
                }
            }

            output.push_str("\n\n");
        }

        if self.options.show_summary {
            output.push_str(&self.format_summary(report));
        }

        output
    }

    /// Format the summary section
    fn format_summary(&self, report: &LintReport) -> String {
        let summary = &report.summary;
        let execution_time = (summary.execution_time_ms as f64) / 1000.0;

        format!(
            "Summary: {} of {} identifiers violate naming rules ({} occurrences in {} files, {:.1}s)\n",
            summary.violating_identifiers,
            summary.distinct_identifiers,
            summary.total_occurrences,
            summary.files_analyzed,
            execution_time
        )
    }

    #[cfg(feature = "colors")]
    fn paint_identifier(&self, identifier: &str) -> String {
        use colored::Colorize;
        if self.options.use_colors {
            identifier.bold().to_string()
        } else {
            identifier.to_string()
        }
    }

    #[cfg(not(feature = "colors"))]
    fn paint_identifier(&self, identifier: &str) -> String {
        identifier.to_string()
    }

    #[cfg(feature = "colors")]
    fn paint_violation(&self, text: &str) -> String {
        use colored::Colorize;
        if self.options.use_colors {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    #[cfg(not(feature = "colors"))]
    fn paint_violation(&self, text: &str) -> String {
        text.to_string()
    }

    /// Format report in JSON format
    fn format_json(
        &self,
        report: &LintReport,
        entries: &[&IdentifierReport],
        view: ReportView,
    ) -> NamingResult<String> {
        let identifiers: Vec<JsonValue> = entries
            .iter()
            .map(|entry| {
                let occurrences: Vec<JsonValue> = entry
                    .occurrences
                    .iter()
                    .map(|file| {
                        serde_json::json!({
                            "file_path": file.file_path.display().to_string(),
                            "locations": file.locations.iter().map(|l| serde_json::json!({
                                "line": l.line,
                                "column": l.column,
                            })).collect::<Vec<_>>(),
                        })
                    })
                    .collect();

                serde_json::json!({
                    "identifier": entry.identifier,
                    "occurrences": occurrences,
                    "violations": entry.violations,
                })
            })
            .collect();

        let summary = &report.summary;
        let json_report = serde_json::json!({
            "view": match view {
                ReportView::All => "all",
                ReportView::Violations => "violations",
            },
            "identifiers": identifiers,
            "summary": {
                "files_analyzed": summary.files_analyzed,
                "distinct_identifiers": summary.distinct_identifiers,
                "total_occurrences": summary.total_occurrences,
                "violating_identifiers": summary.violating_identifiers,
                "violations_by_rule": summary.violations_by_rule,
                "execution_time_ms": summary.execution_time_ms,
                "validated_at": summary.validated_at.to_rfc3339(),
            },
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| NamingError::validation(format!("JSON serialization failed: {e}")))
    }

    /// One `::warning` annotation per occurrence of a violating identifier
    fn format_github(&self, entries: &[&IdentifierReport]) -> String {
        let mut output = String::new();

        for entry in entries.iter().filter(|entry| entry.is_violating()) {
            let rules: Vec<&str> = entry.violations.iter().map(|rule| rule.as_str()).collect();
            let message = format!("'{}' violates: {}", entry.identifier, rules.join(", "));

            for file in &entry.occurrences {
                for location in &file.locations {
                    output.push_str(&format!(
                        "::warning file={},line={},col={},title=Identifier naming::{}\n",
                        file.file_path.display(),
                        location.line,
                        location.column,
                        message
                    ));
                }
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identifiers::{Location, Occurrence};
    use crate::domain::violations::{RuleName, ViolationReport};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_report() -> LintReport {
        let index: IdentifierIndex = [
            ("userName", "src/app.py", 3, 1),
            ("x1", "src/app.py", 4, 5),
            ("userName", "src/app.py", 9, 4),
            ("userName", "src/util.py", 1, 1),
        ]
        .into_iter()
        .map(|(id, file, line, col)| Occurrence::new(id, PathBuf::from(file), Location::new(line, col)))
        .collect();

        let reports = index.into_reports(|identifier| {
            Some(match identifier {
                "x1" => [
                    RuleName::DictionaryWords,
                    RuleName::NumberOfWords,
                    RuleName::ShortIdentifierName,
                ]
                .into_iter()
                .collect(),
                _ => ViolationReport::new(),
            })
        });

        let mut report = LintReport::new(reports, 2);
        report.set_execution_time(1200);
        report
    }

    fn formatter() -> ReportFormatter {
        ReportFormatter::default()
    }

    #[test]
    fn test_text_all_view() {
        let output = formatter()
            .format_report(&create_test_report(), OutputFormat::Text, ReportView::All)
            .unwrap();

        let expected = "userName: found in file(s)\n\
                        \tsrc/app.py at lines: 3:1, 9:4\n\
                        \tsrc/util.py at lines: 1:1\n\
                        \n\n\
                        x1: found in file(s)\n\
                        \tsrc/app.py at lines: 4:5\n\
                        \n\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_text_violations_view() {
        let output = formatter()
            .format_report(&create_test_report(), OutputFormat::Text, ReportView::Violations)
            .unwrap();

        let expected = "x1: found in file(s)\n\
                        \tsrc/app.py at lines: 4:5\n\
                        \tViolates: Dictionary Words, Number of Words, Short Identifier Name\n\
                        \n\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_text_summary() {
        let formatter = ReportFormatter::new(ReportOptions { show_summary: true, ..Default::default() });
        let output = formatter
            .format_report(&create_test_report(), OutputFormat::Text, ReportView::Violations)
            .unwrap();

        assert!(output.ends_with(
            "Summary: 1 of 2 identifiers violate naming rules (4 occurrences in 2 files, 1.2s)\n"
        ));
    }

    #[test]
    fn test_json_format() {
        let output = formatter()
            .format_report(&create_test_report(), OutputFormat::Json, ReportView::All)
            .unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["view"], "all");
        assert_eq!(json["identifiers"].as_array().unwrap().len(), 2);
        assert_eq!(json["identifiers"][0]["identifier"], "userName");
        assert_eq!(json["identifiers"][0]["occurrences"][0]["locations"][1]["line"], 9);
        assert_eq!(json["identifiers"][1]["violations"][0], "Dictionary Words");
        assert_eq!(json["summary"]["files_analyzed"], 2);
        assert_eq!(json["summary"]["violations_by_rule"]["Number of Words"], 1);
    }

    #[test]
    fn test_github_format() {
        let output = formatter()
            .format_report(&create_test_report(), OutputFormat::GitHub, ReportView::All)
            .unwrap();

        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("::warning file=src/app.py,line=4,col=5"));
        assert!(output.contains("'x1' violates: Dictionary Words"));
    }

    #[test]
    fn test_empty_report() {
        let output = formatter()
            .format_report(&LintReport::default(), OutputFormat::Text, ReportView::Violations)
            .unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_max_identifiers() {
        let formatter = ReportFormatter::new(ReportOptions { max_identifiers: Some(1), ..Default::default() });
        let output = formatter
            .format_report(&create_test_report(), OutputFormat::Json, ReportView::All)
            .unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["identifiers"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("violations.txt");

        formatter()
            .write_to_file(&create_test_report(), OutputFormat::Text, ReportView::Violations, &path)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("x1: found in file(s)\n"));
    }

    #[test]
    fn test_format_names() {
        for name in OutputFormat::all_formats() {
            assert!(OutputFormat::parse(name).is_some());
        }
        assert_eq!(OutputFormat::parse("GitHub"), Some(OutputFormat::GitHub));
        assert_eq!(OutputFormat::parse("sarif"), None);
    }
}
