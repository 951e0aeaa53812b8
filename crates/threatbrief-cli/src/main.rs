//! # threatbrief CLI entry point
//!
//! Thin command surface over `threatbrief-core` and `threatbrief-runtime`.
//! Logs go to stderr so stdout carries only report, JSON, or excerpt output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use threatbrief_core::assessment::ASSESSMENT_SCHEMA_JSON;
use threatbrief_core::{
    action_item, assessment_from_response, report_filename, serialize_report, simulate,
    Assessment, Excerpt, OrganizationProfile, ResponseError, SecurityControl,
    SimulationToggleSet,
};
use threatbrief_runtime::{
    AnalysisOrchestrator, AnalysisOutcome, ProviderRegistry, RuntimeConfig, Session,
};

/// Cybersecurity intelligence briefs for sales and security teams.
#[derive(Parser, Debug)]
#[command(name = "threatbrief", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one analysis for an organization profile and write the report.
    Analyze(AnalyzeArgs),

    /// Fence-strip, parse, and validate a saved generator response.
    Validate {
        /// Raw response file
        file: PathBuf,
    },

    /// Render a report offline from a saved response.
    Report(ReportArgs),

    /// Show how enabling security controls changes a risk score.
    Simulate(SimulateArgs),

    /// Print one copyable section of a saved assessment.
    Excerpt(ExcerptArgs),

    /// Print the embedded assessment JSON schema.
    Schema,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Organization profile (YAML, or JSON with a .json extension)
    #[arg(long)]
    profile: PathBuf,

    /// Runtime configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the report is written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Report generation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the validated assessment as JSON instead of writing a report
    #[arg(long)]
    json: bool,

    /// Supporting file to list with the analysis (names only, never sent)
    #[arg(long = "attach")]
    attachments: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[arg(long)]
    profile: PathBuf,

    /// Saved generator response or assessment JSON
    #[arg(long)]
    assessment: PathBuf,

    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Risk score to simulate against (0-100)
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(0..=100),
        required_unless_present = "assessment",
        conflicts_with = "assessment"
    )]
    score: Option<u8>,

    /// Take the score from a saved assessment
    #[arg(long)]
    assessment: Option<PathBuf>,

    #[command(flatten)]
    controls: ControlFlags,
}

#[derive(Args, Debug, Default)]
struct ControlFlags {
    /// Multi-factor authentication
    #[arg(long)]
    mfa: bool,

    /// Data encryption
    #[arg(long)]
    encryption: bool,

    /// Immutable backup system
    #[arg(long)]
    backup: bool,

    /// Security awareness training
    #[arg(long)]
    training: bool,

    /// Endpoint detection and response
    #[arg(long)]
    endpoint: bool,
}

impl ControlFlags {
    fn toggle_set(&self) -> SimulationToggleSet {
        let mut toggles = SimulationToggleSet::new();
        toggles.set(SecurityControl::Mfa, self.mfa);
        toggles.set(SecurityControl::Encryption, self.encryption);
        toggles.set(SecurityControl::BackupSystem, self.backup);
        toggles.set(SecurityControl::SecurityTraining, self.training);
        toggles.set(SecurityControl::Endpoint, self.endpoint);
        toggles
    }
}

#[derive(Args, Debug)]
struct ExcerptArgs {
    #[arg(long)]
    assessment: PathBuf,

    /// summary, initiatives, action-plan, questions, brief, executive-summary
    section: Excerpt,

    /// With action-plan: copy only the item at this position (1-based)
    #[arg(long)]
    item: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Analyze(args) => run_analyze(args).await,
        Commands::Validate { file } => run_validate(&file),
        Commands::Report(args) => run_report(args),
        Commands::Simulate(args) => run_simulate(args),
        Commands::Excerpt(args) => run_excerpt(args),
        Commands::Schema => {
            println!("{}", ASSESSMENT_SCHEMA_JSON.trim_end());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<ExitCode> {
    let profile = load_profile(&args.profile)?;
    let config = match &args.config {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    tracing::debug!(?config, "runtime configuration");

    let registry = ProviderRegistry::with_defaults();
    registry
        .validate(&config.provider, &config)
        .context("analysis provider is not usable")?;
    let provider = registry.create(&config.provider, &config)?;
    let orchestrator = AnalysisOrchestrator::builder()
        .provider(provider)
        .config(&config)
        .build()?;

    let session = Session::new();
    for path in &args.attachments {
        session
            .add_attachment(path)
            .with_context(|| format!("cannot attach {}", path.display()))?;
    }
    if !args.attachments.is_empty() {
        tracing::info!(
            attachments = ?session.attachment_names(),
            "attachments are listed only and not sent for analysis"
        );
    }

    tracing::info!(organization = %profile.name, industry = %profile.industry, "starting analysis");
    let assessment = match session.analyze(&orchestrator, profile).await? {
        AnalysisOutcome::Ready(assessment) => assessment,
        AnalysisOutcome::Superseded => bail!("analysis result was superseded"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(assessment.as_ref())?);
        return Ok(ExitCode::SUCCESS);
    }

    let date = args.date.unwrap_or_else(today);
    let (filename, text) = session
        .report(date)
        .context("no assessment available for the report")?;
    let path = write_report(&args.out, &filename, &text)?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn run_validate(file: &Path) -> Result<ExitCode> {
    let raw = read_file(file)?;
    match assessment_from_response(&raw) {
        Ok(assessment) => {
            println!(
                "OK: risk score {}/100, {} threats, {} action items",
                assessment.overall_risk_score,
                assessment.threat_analysis.primary_threats.len(),
                assessment.action_plan.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(ResponseError::Malformed(e)) => {
            println!("MALFORMED: {}", e.reason);
            if !e.excerpt.is_empty() {
                println!("  starts with: {:?}", e.excerpt);
            }
            Ok(ExitCode::from(2))
        }
        Err(ResponseError::Schema(e)) => {
            println!("INVALID: {} violation(s)", e.violations().len());
            for violation in e.violations() {
                let path = if violation.path.is_empty() {
                    "<root>"
                } else {
                    violation.path.as_str()
                };
                println!("  {}: {}", path, violation.message);
            }
            Ok(ExitCode::from(2))
        }
    }
}

fn run_report(args: ReportArgs) -> Result<ExitCode> {
    let profile = load_profile(&args.profile)?;
    let assessment = load_assessment(&args.assessment)?;
    let text = serialize_report(&profile, &assessment, args.date.unwrap_or_else(today));
    let path = write_report(&args.out, &report_filename(&profile), &text)?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn run_simulate(args: SimulateArgs) -> Result<ExitCode> {
    let score = match (args.score, &args.assessment) {
        (Some(score), _) => score,
        (None, Some(path)) => load_assessment(path)?.overall_risk_score,
        (None, None) => bail!("either --score or --assessment is required"),
    };

    let toggles = args.controls.toggle_set();
    let outcome = simulate(score, &toggles);

    println!(
        "Original score: {}/100 ({})",
        outcome.original_score,
        outcome.original_band()
    );
    for control in toggles.enabled() {
        println!("  + {} (-{})", control.label(), control.weight());
    }
    println!(
        "Reduction: {} points ({}%)",
        outcome.reduction,
        outcome.percentage()
    );
    println!("New score: {}/100 ({})", outcome.new_score, outcome.new_band());
    Ok(ExitCode::SUCCESS)
}

fn run_excerpt(args: ExcerptArgs) -> Result<ExitCode> {
    let assessment = load_assessment(&args.assessment)?;
    let text = match (args.section, args.item) {
        (Excerpt::ActionPlan, Some(position)) => action_item(&assessment, position)
            .with_context(|| {
                format!(
                    "action plan has {} item(s), no item {}",
                    assessment.action_plan.len(),
                    position
                )
            })?,
        (section, Some(_)) => bail!("--item only applies to the action-plan section, not {}", section),
        (section, None) => section.render(&assessment),
    };
    println!("{}", text);
    Ok(ExitCode::SUCCESS)
}

fn load_profile(path: &Path) -> Result<OrganizationProfile> {
    OrganizationProfile::from_file(path)
        .with_context(|| format!("failed to load profile {}", path.display()))
}

fn load_assessment(path: &Path) -> Result<Assessment> {
    let raw = read_file(path)?;
    assessment_from_response(&raw)
        .with_context(|| format!("{} does not hold a valid assessment", path.display()))
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_report(dir: &Path, filename: &str, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(filename);
    fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = text.len(), "report written");
    Ok(path)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
