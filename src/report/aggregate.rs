//! Grouping of identifier occurrences and the lint report aggregate
//!
//! Architecture: Aggregate Root - LintReport owns every per-identifier result of a run
//! - IdentifierIndex groups occurrences by exact identifier, then by file, in first-seen order
//! - Each distinct identifier carries exactly one ViolationReport
//! - The filtered view is derived from the full view, never stored separately

use crate::domain::identifiers::{Location, Occurrence};
use crate::domain::violations::{RuleName, ViolationReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Locations of one identifier within one file, in scan order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOccurrences {
    pub file_path: PathBuf,
    pub locations: Vec<Location>,
}

/// Every sighting of one identifier, grouped by file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierEntry {
    identifier: String,
    files: Vec<FileOccurrences>,
    file_positions: HashMap<PathBuf, usize>,
}

impl IdentifierEntry {
    fn new(identifier: String) -> Self {
        Self { identifier, files: Vec::new(), file_positions: HashMap::new() }
    }

    fn record(&mut self, file_path: PathBuf, location: Location) {
        if let Some(&position) = self.file_positions.get(&file_path) {
            self.files[position].locations.push(location);
            return;
        }

        self.file_positions.insert(file_path.clone(), self.files.len());
        self.files.push(FileOccurrences { file_path, locations: vec![location] });
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Files in first-seen order
    pub fn files(&self) -> &[FileOccurrences] {
        &self.files
    }

    pub fn locations_in(&self, file_path: &Path) -> Option<&[Location]> {
        self.file_positions
            .get(file_path)
            .map(|&position| self.files[position].locations.as_slice())
    }

    pub fn occurrence_count(&self) -> usize {
        self.files.iter().map(|f| f.locations.len()).sum()
    }
}

/// Ordered identifier → file → locations map with sole ownership of its data
#[derive(Debug, Clone, Default)]
pub struct IdentifierIndex {
    entries: Vec<IdentifierEntry>,
    positions: HashMap<String, usize>,
}

impl IdentifierIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence; grouping is by exact, case-sensitive identifier
    pub fn record(&mut self, occurrence: Occurrence) {
        let Occurrence { identifier, file_path, location } = occurrence;

        let position = match self.positions.get(&identifier) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.positions.insert(identifier.clone(), position);
                self.entries.push(IdentifierEntry::new(identifier));
                position
            }
        };

        self.entries[position].record(file_path, location);
    }

    pub fn get(&self, identifier: &str) -> Option<&IdentifierEntry> {
        self.positions.get(identifier).map(|&position| &self.entries[position])
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &IdentifierEntry> {
        self.entries.iter()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn occurrence_count(&self) -> usize {
        self.entries.iter().map(IdentifierEntry::occurrence_count).sum()
    }

    /// Attach one report per identifier, keeping index order
    ///
    /// Identifiers `evaluate` declines (returns `None` for) are dropped.
    pub fn into_reports<F>(self, mut evaluate: F) -> Vec<IdentifierReport>
    where
        F: FnMut(&str) -> Option<ViolationReport>,
    {
        self.entries
            .into_iter()
            .filter_map(|entry| {
                let violations = evaluate(&entry.identifier)?;
                Some(IdentifierReport {
                    identifier: entry.identifier,
                    occurrences: entry.files,
                    violations,
                })
            })
            .collect()
    }
}

impl Extend<Occurrence> for IdentifierIndex {
    fn extend<I: IntoIterator<Item = Occurrence>>(&mut self, iter: I) {
        for occurrence in iter {
            self.record(occurrence);
        }
    }
}

impl FromIterator<Occurrence> for IdentifierIndex {
    fn from_iter<I: IntoIterator<Item = Occurrence>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

/// One distinct identifier with its occurrences and verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierReport {
    pub identifier: String,
    pub occurrences: Vec<FileOccurrences>,
    pub violations: ViolationReport,
}

impl IdentifierReport {
    pub fn is_violating(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn occurrence_count(&self) -> usize {
        self.occurrences.iter().map(|f| f.locations.len()).sum()
    }
}

/// Summary statistics for a lint run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintSummary {
    /// Files identifiers were extracted from
    pub files_analyzed: usize,
    pub distinct_identifiers: usize,
    pub total_occurrences: usize,
    pub violating_identifiers: usize,
    /// Violating identifiers per rule, in rule order
    pub violations_by_rule: BTreeMap<RuleName, usize>,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when the run finished
    pub validated_at: DateTime<Utc>,
}

impl Default for LintSummary {
    fn default() -> Self {
        Self {
            files_analyzed: 0,
            distinct_identifiers: 0,
            total_occurrences: 0,
            violating_identifiers: 0,
            violations_by_rule: BTreeMap::new(),
            execution_time_ms: 0,
            validated_at: Utc::now(),
        }
    }
}

/// Result of linting a set of files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintReport {
    /// Every distinct identifier, in first-seen order
    pub identifiers: Vec<IdentifierReport>,
    pub summary: LintSummary,
}

impl LintReport {
    /// Build a report and its summary from evaluated identifiers
    pub fn new(identifiers: Vec<IdentifierReport>, files_analyzed: usize) -> Self {
        let mut summary = LintSummary {
            files_analyzed,
            distinct_identifiers: identifiers.len(),
            ..Default::default()
        };

        for report in &identifiers {
            summary.total_occurrences += report.occurrence_count();
            if report.is_violating() {
                summary.violating_identifiers += 1;
            }
            for rule in report.violations.iter() {
                *summary.violations_by_rule.entry(rule).or_default() += 1;
            }
        }

        Self { identifiers, summary }
    }

    /// Identifiers with at least one violation, in report order
    pub fn violating(&self) -> impl Iterator<Item = &IdentifierReport> {
        self.identifiers.iter().filter(|report| report.is_violating())
    }

    pub fn has_violations(&self) -> bool {
        self.summary.violating_identifiers > 0
    }

    pub fn get(&self, identifier: &str) -> Option<&IdentifierReport> {
        self.identifiers.iter().find(|report| report.identifier == identifier)
    }

    pub fn set_execution_time(&mut self, time_ms: u64) {
        self.summary.execution_time_ms = time_ms;
    }
}
