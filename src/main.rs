//! Identifier Lint CLI - Command-line interface for identifier naming analysis
//!
//! Architecture: Application Layer - CLI coordinates user interactions with the library
//! - Translates subcommands into `NamingValidator` operations
//! - Owns process concerns: exit codes, terminal output, report files, file watching
//! - Configuration is taken from `--config` or discovered in the working directory

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use identifier_lint::config::DEFAULT_CONFIG_FILES;
use identifier_lint::{
    AnalysisOptions, GithubConfig, GithubSource, IdentifierAnalysis, LintConfig, LintReport,
    NamingValidator, OutputFormat, RepoRef, ReportFormatter, ReportOptions, ReportView, RuleName,
    SourceLanguage,
};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

/// Identifier Lint - naming-style analysis for source code identifiers
#[derive(Parser)]
#[command(name = "identifier-lint")]
#[command(version)]
#[command(about = "Checks source code identifiers against naming-style rules")]
#[command(
    long_about = "Identifier Lint extracts every identifier from Rust, Python, JavaScript, Go and Ruby sources, \
splits it into English words and reports the naming rules it violates."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint identifiers in files and directories
    Check(CheckArgs),

    /// Evaluate identifiers given on the command line
    Evaluate {
        /// Identifiers to evaluate
        #[arg(required = true)]
        identifiers: Vec<String>,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch for file changes and re-run the lint
    Watch {
        /// Path to watch (defaults to current directory)
        path: Option<PathBuf>,

        /// Debounce delay in milliseconds
        #[arg(long, default_value = "500")]
        delay: u64,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// Explain what a specific rule checks
    Explain {
        /// Rule id or display name, e.g. `short_identifier_name`
        rule: String,
    },

    /// List the naming rules in evaluation order
    Rules,
}

#[derive(Args, Clone, Default)]
struct CheckArgs {
    /// Paths to analyze (files or directories)
    #[arg(conflicts_with = "repo")]
    paths: Vec<PathBuf>,

    /// Lint a public GitHub repository instead of local paths, e.g. https://github.com/owner/repo
    #[arg(long)]
    repo: Option<String>,

    /// Branch, tag or commit of `--repo` (default branch when omitted)
    #[arg(long = "ref", requires = "repo")]
    git_ref: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormatArg,

    /// Write the listing of every identifier to this file
    #[arg(long)]
    all_output: Option<PathBuf>,

    /// Write the listing of violating identifiers to this file
    #[arg(long)]
    violations_output: Option<PathBuf>,

    /// Restrict the run to these languages
    #[arg(short, long = "language", action = clap::ArgAction::Append)]
    languages: Vec<SourceLanguage>,

    /// Additional exclude patterns
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Ignore .namingignore files
    #[arg(long)]
    no_ignore: bool,

    /// Maximum number of files to analyze
    #[arg(long)]
    max_files: Option<usize>,

    /// Disable parallel processing
    #[arg(long)]
    no_parallel: bool,

    /// Fail on first unreadable file
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Copy, Clone, Default, ValueEnum, PartialEq, Eq, Debug)]
enum OutputFormatArg {
    #[default]
    Text,
    Json,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    match run_command(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    }
}

async fn run_command(cli: Cli) -> Result<i32> {
    let use_colors = !cli.no_color;

    match cli.command {
        Commands::Check(args) => run_check(cli.config.as_deref(), args, use_colors).await,
        Commands::Evaluate { identifiers, json } => {
            run_evaluate(cli.config.as_deref(), &identifiers, json)
        }
        Commands::Watch { path, delay } => run_watch(cli.config, path, delay).await,
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))
        }
        Commands::Explain { rule } => Ok(run_explain(&rule)),
        Commands::Rules => Ok(run_list_rules()),
    }
}

/// Explicit config file, else the first default file in `search_dir`, else built-in defaults
fn load_config(explicit: Option<&Path>, search_dir: &Path) -> Result<LintConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => LintConfig::discover(search_dir),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            LintConfig::load_from_file(&path)
                .with_context(|| format!("invalid configuration in {}", path.display()))
        }
        None => Ok(LintConfig::default()),
    }
}

fn analysis_options(args: &CheckArgs) -> AnalysisOptions {
    AnalysisOptions {
        parallel: !args.no_parallel,
        max_files: args.max_files,
        fail_fast: args.fail_fast,
        exclude_patterns: args.exclude.clone(),
        ignore_ignore_files: args.no_ignore,
        languages: args.languages.clone(),
    }
}

fn lint(config_path: Option<&Path>, args: &CheckArgs) -> Result<(NamingValidator, LintReport)> {
    let config = load_config(config_path, Path::new("."))?;
    let validator = NamingValidator::new_with_config(config)?;

    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths.clone()
    };

    let report = validator.lint_paths(paths.as_slice(), &analysis_options(args))?;
    Ok((validator, report))
}

/// Download `--repo` through the contents API and lint it like a local tree
async fn lint_repository(
    config_path: Option<&Path>,
    link: &str,
    args: &CheckArgs,
) -> Result<(NamingValidator, LintReport)> {
    let config = load_config(config_path, Path::new("."))?;
    let validator = NamingValidator::new_with_config(config)?;

    let mut repo: RepoRef = link.parse()?;
    if let Some(reference) = &args.git_ref {
        repo = repo.with_reference(reference.clone());
    }

    let source = GithubSource::new(GithubConfig::from_env())?;
    let report = validator
        .lint_repository(&source, &repo, &analysis_options(args))
        .await
        .with_context(|| format!("failed to lint {repo}"))?;
    Ok((validator, report))
}

async fn run_check(config_path: Option<&Path>, args: CheckArgs, use_colors: bool) -> Result<i32> {
    let (validator, report) = match &args.repo {
        Some(link) => lint_repository(config_path, link, &args).await?,
        None => lint(config_path, &args)?,
    };

    if let Some(all_path) = &args.all_output {
        validator
            .write_reports(
                &report,
                all_path,
                args.violations_output
                    .clone()
                    .unwrap_or_else(|| violations_path_beside(all_path)),
            )
            .with_context(|| format!("failed to write reports next to {}", all_path.display()))?;
    } else if let Some(violations_path) = &args.violations_output {
        ReportFormatter::default()
            .write_to_file(&report, OutputFormat::Text, ReportView::Violations, violations_path)
            .with_context(|| format!("failed to write {}", violations_path.display()))?;
    }

    let format: OutputFormat = args.format.into();
    let validator = validator.with_report_formatter(ReportFormatter::new(ReportOptions {
        use_colors: use_colors && format == OutputFormat::Text,
        show_summary: format == OutputFormat::Text,
        max_identifiers: None,
    }));
    print!("{}", validator.format_report(&report, format, ReportView::Violations)?);

    Ok(if report.has_violations() { 1 } else { 0 })
}

/// `identifiers.txt` → `identifiers_violations.txt`
fn violations_path_beside(all_path: &Path) -> PathBuf {
    let stem = all_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "identifiers".to_string());
    let file_name = match all_path.extension() {
        Some(ext) => format!("{stem}_violations.{}", ext.to_string_lossy()),
        None => format!("{stem}_violations"),
    };
    all_path.with_file_name(file_name)
}

fn run_evaluate(config_path: Option<&Path>, identifiers: &[String], json: bool) -> Result<i32> {
    let config = load_config(config_path, Path::new("."))?;
    let validator = NamingValidator::new_with_config(config)?;

    let analyses = identifiers
        .iter()
        .map(|identifier| validator.analyze_identifier(identifier))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analyses)?);
    } else {
        for analysis in &analyses {
            print!("{}", describe_analysis(analysis));
        }
    }

    let violating = analyses.iter().any(|analysis| !analysis.violations.is_empty());
    Ok(if violating { 1 } else { 0 })
}

fn describe_analysis(analysis: &IdentifierAnalysis) -> String {
    if analysis.exempt {
        return format!("{}\n  exempt from all rules\n\n", analysis.identifier);
    }

    let labels: Vec<&str> = analysis.labels.iter().map(|label| label.as_str()).collect();
    let rules: Vec<&str> = analysis.violations.iter().map(|rule| rule.as_str()).collect();
    format!(
        "{}\n  words: {}\n  labels: {}\n  violations: {}\n\n",
        analysis.identifier,
        analysis.words.join(", "),
        labels.join(", "),
        if rules.is_empty() { "none".to_string() } else { rules.join(", ") },
    )
}

async fn run_watch(config_path: Option<PathBuf>, path: Option<PathBuf>, delay_ms: u64) -> Result<i32> {
    use notify::{Event, RecursiveMode, Watcher};
    use tokio::sync::mpsc;

    let watch_path = path.unwrap_or_else(|| PathBuf::from("."));
    let debounce = Duration::from_millis(delay_ms);

    println!("Watching {} (debounce {}ms, Ctrl+C to stop)", watch_path.display(), delay_ms);

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            // The receiver only disappears on shutdown.
            let _ = tx.send(event);
        }
        Err(e) => tracing::warn!("Watch error: {}", e),
    })
    .context("failed to create file watcher")?;

    watcher
        .watch(&watch_path, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch '{}'", watch_path.display()))?;

    let mut config_path = config_path;
    run_watch_analysis(config_path.clone(), watch_path.clone()).await;

    while let Some(event) = rx.recv().await {
        let mut reload = is_config_change(&event);
        let mut relevant = reload.is_some() || should_trigger_analysis(&event);

        tokio::time::sleep(debounce).await;
        while let Ok(event) = rx.try_recv() {
            if let Some(changed) = is_config_change(&event) {
                reload = Some(changed);
            }
            relevant |= should_trigger_analysis(&event);
        }

        if let Some(changed) = reload {
            println!("Configuration changed: {}", changed.display());
            config_path = Some(changed);
            relevant = true;
        }

        if relevant {
            run_watch_analysis(config_path.clone(), watch_path.clone()).await;
        }
    }

    Ok(0)
}

/// Whether an event touches a source file some extractor handles
fn should_trigger_analysis(event: &notify::Event) -> bool {
    use notify::EventKind;

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
        _ => return false,
    }

    event.paths.iter().any(|path| SourceLanguage::from_path(path).is_some())
}

/// The configuration file an event touched, if any
fn is_config_change(event: &notify::Event) -> Option<PathBuf> {
    use notify::EventKind;

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => {}
        _ => return None,
    }

    event
        .paths
        .iter()
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| DEFAULT_CONFIG_FILES.contains(&name))
        })
        .cloned()
}

async fn run_watch_analysis(config_path: Option<PathBuf>, watch_path: PathBuf) {
    let args = CheckArgs { paths: vec![watch_path], ..Default::default() };

    let outcome = tokio::task::spawn_blocking(move || lint(config_path.as_deref(), &args)).await;

    match outcome {
        Ok(Ok((validator, report))) => {
            match validator.format_report(&report, OutputFormat::Text, ReportView::Violations) {
                Ok(formatted) => print!("{formatted}"),
                Err(e) => eprintln!("Failed to format report: {e}"),
            }
            println!(
                "{} of {} identifiers violate naming rules ({} files)",
                report.summary.violating_identifiers,
                report.summary.distinct_identifiers,
                report.summary.files_analyzed
            );
        }
        Ok(Err(e)) => eprintln!("Analysis failed: {e:#}"),
        Err(e) => eprintln!("Analysis task failed: {e}"),
    }
}

fn run_validate_config(config_path: Option<PathBuf>) -> Result<i32> {
    let config_path = config_path
        .or_else(|| LintConfig::discover(Path::new(".")))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILES[0]));

    println!("Validating configuration: {}", config_path.display());

    match LintConfig::load_from_file(&config_path) {
        Ok(config) => {
            let languages: Vec<&str> = config.languages.iter().map(|l| l.as_str()).collect();

            println!("Configuration is valid");
            println!("  Languages: {}", languages.join(", "));
            println!("  Path patterns: {}", config.paths.patterns.len());
            println!("  Word lists: {}", config.lexicon.word_lists.len());
            println!("  Extra words: {}", config.lexicon.extra_words.len());
            println!("  Ignored identifier patterns: {}", config.report.ignore_identifiers.len());
            Ok(0)
        }
        Err(e) => {
            eprintln!("Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn run_explain(rule: &str) -> i32 {
    match RuleName::parse(rule) {
        Some(rule) => {
            println!("Rule: {}", rule);
            println!("Id: {}", rule.id());
            println!();
            println!("{}", rule.description());
            0
        }
        None => {
            eprintln!("Rule '{rule}' not found");
            println!();
            println!("Available rules:");
            for rule in RuleName::ALL {
                println!("  - {}", rule.id());
            }
            1
        }
    }
}

fn run_list_rules() -> i32 {
    println!("Naming rules, in evaluation order:\n");
    for rule in RuleName::ALL {
        println!("  {:<28} {}", rule.id(), rule);
    }
    0
}

fn init_logging(verbose: bool, json: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
