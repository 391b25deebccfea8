//! Main analysis orchestrator for the identifier linter
//!
//! CDD Principle: Domain Services - Analyzer orchestrates the whole lint workflow
//! - Coordinates file discovery, identifier extraction and rule evaluation
//! - Evaluates each distinct identifier exactly once, however often it occurs
//! - Handles parallel processing and per-file error recovery gracefully

pub mod path_filter;

use crate::config::LintConfig;
use crate::domain::identifiers::{Occurrence, SourceText};
use crate::domain::violations::{NamingError, NamingResult, ViolationReport};
use crate::extract::{extractor_for, IdentifierExtractor, SourceLanguage};
use crate::lexicon::{FrequencySegmenter, WordListLexicon};
use crate::naming::RuleEvaluator;
use crate::report::aggregate::{IdentifierIndex, LintReport};
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub use path_filter::PathFilter;

/// Main analyzer that orchestrates the entire lint process
pub struct Analyzer {
    /// Configuration for this analysis
    config: LintConfig,
    /// Path filter for determining which files to analyze
    path_filter: PathFilter,
    /// One extractor per enabled language
    extractors: Vec<Box<dyn IdentifierExtractor>>,
    evaluator: RuleEvaluator,
    /// Identifiers matching these are left out of reports
    ignored_identifiers: Vec<Regex>,
}

/// Options for customizing analysis behavior
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Maximum number of files to analyze
    pub max_files: Option<usize>,
    /// Whether to continue on errors or fail fast
    pub fail_fast: bool,
    /// Additional paths to exclude (temporary)
    pub exclude_patterns: Vec<String>,
    /// Whether to ignore .namingignore files
    pub ignore_ignore_files: bool,
    /// Restrict this run to these languages; empty means every configured language
    pub languages: Vec<SourceLanguage>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_files: None,
            fail_fast: false,
            exclude_patterns: Vec::new(),
            ignore_ignore_files: false,
            languages: Vec::new(),
        }
    }
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: LintConfig) -> NamingResult<Self> {
        let lexicon = WordListLexicon::from_config(&config.lexicon)?;
        let segmenter = FrequencySegmenter::from_config(&config.lexicon)?;
        let evaluator = RuleEvaluator::new(Arc::new(lexicon), Arc::new(segmenter));
        Self::with_evaluator(config, evaluator)
    }

    /// Create an analyzer around an existing evaluator
    pub fn with_evaluator(config: LintConfig, evaluator: RuleEvaluator) -> NamingResult<Self> {
        config.validate()?;

        let ignore_file = config.paths.ignore_file.clone().filter(|name| !name.is_empty());
        let path_filter = PathFilter::new(config.paths.patterns.clone(), ignore_file)
            .map_err(|e| NamingError::config(format!("Failed to create path filter: {e}")))?;

        let extractors = config.languages.iter().map(|&language| extractor_for(language)).collect();
        let ignored_identifiers = config.report.compiled_ignores()?;

        Ok(Self { config, path_filter, extractors, evaluator, ignored_identifiers })
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> NamingResult<Self> {
        Self::new(LintConfig::default())
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &RuleEvaluator {
        &self.evaluator
    }

    /// Evaluate one identifier string against the naming rules
    pub fn evaluate_identifier(&self, identifier: &str) -> NamingResult<ViolationReport> {
        self.evaluator.evaluate(identifier)
    }

    fn extractor_for_file(
        &self,
        file_path: &Path,
        languages: &[SourceLanguage],
    ) -> Option<&dyn IdentifierExtractor> {
        self.extractors
            .iter()
            .filter(|extractor| languages.is_empty() || languages.contains(&extractor.language()))
            .find(|extractor| extractor.handles_file(file_path))
            .map(|extractor| &**extractor)
    }

    /// Identifier occurrences in one file, in source order
    ///
    /// Files no enabled extractor handles yield nothing.
    pub fn extract_file<P: AsRef<Path>>(&self, file_path: P) -> NamingResult<Vec<Occurrence>> {
        let file_path = file_path.as_ref();

        if self.extractor_for_file(file_path, &[]).is_none() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(file_path).map_err(|e| {
            NamingError::extraction(
                file_path.display().to_string(),
                format!("Failed to read file: {e}"),
            )
        })?;

        self.extract_text(file_path, &content)
    }

    /// Identifier occurrences in source text attributed to `file_path`
    pub fn extract_text(&self, file_path: &Path, content: &str) -> NamingResult<Vec<Occurrence>> {
        match self.extractor_for_file(file_path, &[]) {
            Some(extractor) => extractor.extract(file_path, content),
            None => Ok(Vec::new()),
        }
    }

    fn extract_source<'s>(
        &self,
        source: &'s SourceText,
    ) -> (&'s Path, NamingResult<Vec<Occurrence>>) {
        (source.path.as_path(), self.extract_text(&source.path, &source.content))
    }

    /// Lint a single file
    pub fn analyze_file<P: AsRef<Path>>(&self, file_path: P) -> NamingResult<LintReport> {
        let options = AnalysisOptions { parallel: false, fail_fast: true, ..Default::default() };
        self.analyze_paths(&[file_path.as_ref()], &options)
    }

    /// Analyze a directory tree and return a lint report
    pub fn analyze_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> NamingResult<LintReport> {
        self.analyze_paths(&[root.as_ref()], options)
    }

    /// Lint files and directory trees and return a complete report
    pub fn analyze_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> NamingResult<LintReport> {
        let start_time = Instant::now();

        let files = self.collect_files(paths, options)?;
        tracing::debug!("Linting {} files", files.len());

        let extracted: Vec<(&Path, NamingResult<Vec<Occurrence>>)> =
            if options.parallel && files.len() > 1 {
                files.par_iter().map(|file| (file.as_path(), self.extract_file(file))).collect()
            } else {
                files.iter().map(|file| (file.as_path(), self.extract_file(file))).collect()
            };

        let (index, files_analyzed) = Self::index_extracted(extracted, options.fail_fast)?;
        Ok(self.finish_report(index, files_analyzed, options, start_time))
    }

    /// Lint source texts fetched from elsewhere, keeping their order
    ///
    /// Texts no enabled extractor handles are skipped, as are texts outside
    /// `options.languages`.
    pub fn analyze_sources(
        &self,
        sources: &[SourceText],
        options: &AnalysisOptions,
    ) -> NamingResult<LintReport> {
        let start_time = Instant::now();

        let wanted: Vec<&SourceText> = sources
            .iter()
            .filter(|source| self.extractor_for_file(&source.path, &options.languages).is_some())
            .take(options.max_files.unwrap_or(usize::MAX))
            .collect();
        tracing::debug!("Linting {} of {} fetched sources", wanted.len(), sources.len());

        let extracted: Vec<(&Path, NamingResult<Vec<Occurrence>>)> =
            if options.parallel && wanted.len() > 1 {
                wanted.par_iter().map(|&source| self.extract_source(source)).collect()
            } else {
                wanted.iter().map(|&source| self.extract_source(source)).collect()
            };

        let (index, files_analyzed) = Self::index_extracted(extracted, options.fail_fast)?;
        Ok(self.finish_report(index, files_analyzed, options, start_time))
    }

    /// Selector for paths that exist only remotely, relative to the repository root
    ///
    /// Directories pass when no pattern excludes them; files must also have an
    /// enabled extractor. Ignore files are not consulted.
    pub fn remote_path_selector<'a>(
        &'a self,
        options: &'a AnalysisOptions,
    ) -> NamingResult<impl Fn(&Path, bool) -> bool + 'a> {
        let filter = self.effective_filter(options)?;

        Ok(move |path: &Path, is_dir: bool| {
            filter.allows(path, is_dir)
                && (is_dir || self.extractor_for_file(path, &options.languages).is_some())
        })
    }

    fn finish_report(
        &self,
        index: IdentifierIndex,
        files_analyzed: usize,
        options: &AnalysisOptions,
        start_time: Instant,
    ) -> LintReport {
        let verdicts = self.evaluate_index(&index, options.parallel);

        let reports = index.into_reports(|identifier| verdicts.get(identifier).cloned());
        let mut report = LintReport::new(reports, files_analyzed);
        report.set_execution_time(start_time.elapsed().as_millis() as u64);

        tracing::info!(
            "Linted {} identifiers in {} files: {} violating",
            report.summary.distinct_identifiers,
            report.summary.files_analyzed,
            report.summary.violating_identifiers
        );

        report
    }

    /// Configured filter plus the per-run excludes and ignore-file switch
    fn effective_filter(&self, options: &AnalysisOptions) -> NamingResult<PathFilter> {
        let mut filter = self.path_filter.clone();
        for pattern in &options.exclude_patterns {
            filter.add_pattern(pattern.clone())?;
        }
        if options.ignore_ignore_files {
            filter.disable_ignore_files();
        }
        Ok(filter)
    }

    /// Files to lint, in discovery order
    fn collect_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> NamingResult<Vec<PathBuf>> {
        let filter = self.effective_filter(options)?;

        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();

            if path.is_file() {
                // Explicitly named files bypass the pattern filter
                files.push(path.to_path_buf());
            } else if path.is_dir() {
                files.extend(filter.find_files(path)?);
            } else {
                tracing::warn!("Path does not exist: {}", path.display());
            }
        }

        files.retain(|file| self.extractor_for_file(file, &options.languages).is_some());

        if let Some(max_files) = options.max_files {
            files.truncate(max_files);
        }

        Ok(files)
    }

    /// Group extraction results, preserving file order
    fn index_extracted(
        extracted: Vec<(&Path, NamingResult<Vec<Occurrence>>)>,
        fail_fast: bool,
    ) -> NamingResult<(IdentifierIndex, usize)> {
        let mut index = IdentifierIndex::new();
        let mut files_analyzed = 0;

        for (file_path, result) in extracted {
            match result {
                Ok(occurrences) => {
                    tracing::debug!(
                        "{} identifier occurrences in {}",
                        occurrences.len(),
                        file_path.display()
                    );
                    index.extend(occurrences);
                    files_analyzed += 1;
                }
                Err(e) => {
                    if fail_fast {
                        return Err(e);
                    }
                    tracing::warn!("Failed to analyze {}: {}", file_path.display(), e);
                }
            }
        }

        Ok((index, files_analyzed))
    }

    /// One verdict per distinct, non-ignored identifier
    fn evaluate_index(
        &self,
        index: &IdentifierIndex,
        parallel: bool,
    ) -> HashMap<String, ViolationReport> {
        let identifiers: Vec<&str> =
            index.identifiers().filter(|identifier| !self.is_ignored(identifier)).collect();

        let evaluate = |identifier: &&str| {
            let verdict = self.evaluator.evaluate(identifier);
            (identifier.to_string(), verdict)
        };

        let verdicts: Vec<(String, NamingResult<ViolationReport>)> = if parallel {
            identifiers.par_iter().map(evaluate).collect()
        } else {
            identifiers.iter().map(evaluate).collect()
        };

        verdicts
            .into_iter()
            .filter_map(|(identifier, verdict)| match verdict {
                Ok(report) => Some((identifier, report)),
                Err(e) => {
                    tracing::warn!("Skipping identifier '{}': {}", identifier, e);
                    None
                }
            })
            .collect()
    }

    fn is_ignored(&self, identifier: &str) -> bool {
        self.ignored_identifiers.iter().any(|pattern| pattern.is_match(identifier))
    }
}
