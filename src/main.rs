use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use depreview::{
    config::Config,
    context::RunContext,
    model::Severity,
    output::{
        license_tables, render_license_report, render_vulnerability_report, vulnerability_tables,
    },
    policy::Evaluation,
    provider::{default_provider, ComparisonProvider},
    sink::{CheckRunSink, ConsoleSink, Report, ReportingSink, StepSummarySink},
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const VULNERABLE: u8 = 2;
    pub const DENIED_LICENSE: u8 = 3;
}

#[derive(Parser)]
#[command(name = "depreview")]
#[command(
    author,
    version,
    about = "Review dependency changes in a pull request against severity and license policy"
)]
struct Cli {
    /// Repository slug (owner/repo); defaults to the workflow environment
    #[arg(long)]
    repo: Option<String>,

    /// Base ref of the comparison; defaults to the pull request base SHA
    #[arg(long)]
    base_ref: Option<String>,

    /// Head ref of the comparison; defaults to the pull request head SHA
    #[arg(long)]
    head_ref: Option<String>,

    /// Path to the policy file
    #[arg(short, long, default_value = "depreview.toml")]
    config: PathBuf,

    /// Fail if an added dependency carries a vulnerability at or above this severity
    #[arg(long, value_enum)]
    fail_on_severity: Option<FailLevel>,

    /// Licenses that always fail the review (comma-separated)
    #[arg(long, value_delimiter = ',')]
    deny_licenses: Option<Vec<String>>,

    /// The only licenses that pass the review (comma-separated)
    #[arg(long, value_delimiter = ',')]
    allow_licenses: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "console")]
    format: Format,

    /// Skip posting check runs (console and step summary only)
    #[arg(long)]
    no_check_run: bool,

    /// Environment variable holding the API token
    #[arg(long, default_value = "GITHUB_TOKEN")]
    token_env: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum FailLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl From<FailLevel> for Severity {
    fn from(level: FailLevel) -> Self {
        match level {
            FailLevel::Low => Severity::Low,
            FailLevel::Moderate => Severity::Moderate,
            FailLevel::High => Severity::High,
            FailLevel::Critical => Severity::Critical,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Console,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(level) = cli.fail_on_severity {
        config.fail_on_severity = Some(level.into());
    }
    if let Some(deny) = cli.deny_licenses.clone() {
        config.deny_licenses = Some(deny);
    }
    if let Some(allow) = cli.allow_licenses.clone() {
        config.allow_licenses = Some(allow);
    }
    config.validate()?;

    let (owner, repo, base_ref, head_ref) = resolve_target(&cli)?;
    let token = std::env::var(&cli.token_env)
        .with_context(|| format!("missing API token in ${}", cli.token_env))?;

    let provider = default_provider(token.clone());
    info!(
        provider = provider.name(),
        %owner, %repo, %base_ref, %head_ref,
        "fetching dependency comparison"
    );
    let changes = provider.compare(&owner, &repo, &base_ref, &head_ref).await?;
    info!(count = changes.len(), "dependency changes received");

    let policy = config.license_policy();
    let evaluation = Evaluation::run(&changes, config.fail_on_severity, &policy);
    if !evaluation.license_report.unknown.is_empty() {
        warn!(
            count = evaluation.license_report.unknown.len(),
            "added dependencies with undetermined licenses"
        );
    }

    let generated_at = Utc::now();
    let vulnerability_report = Report {
        check_name: config.check_name_vulnerability.clone(),
        sha: head_ref.clone(),
        body: render_vulnerability_report(
            &evaluation.vulnerable_changes,
            changes.len(),
            generated_at,
        ),
        tables: vulnerability_tables(&evaluation.vulnerable_changes),
        failed: evaluation.vulnerabilities_failed(),
        warnings: Vec::new(),
    };

    let mut license_warnings = Vec::new();
    if !evaluation.license_report.unknown.is_empty() {
        license_warnings.push(format!(
            "{} added {} a license that could not be determined",
            evaluation.license_report.unknown.len(),
            if evaluation.license_report.unknown.len() == 1 {
                "dependency has"
            } else {
                "dependencies have"
            }
        ));
    }
    let license_report = Report {
        check_name: config.check_name_license.clone(),
        sha: head_ref.clone(),
        body: render_license_report(&evaluation.license_report, &policy, generated_at),
        tables: license_tables(&evaluation.license_report),
        failed: evaluation.licenses_failed(),
        warnings: license_warnings,
    };

    if cli.format == Format::Json {
        // Full evaluation for downstream tooling; the raw change list keeps
        // the removed dependencies the policy pipeline never looks at.
        let document = serde_json::json!({
            "changes": changes,
            "vulnerable_changes": evaluation.vulnerable_changes,
            "license_report": evaluation.license_report,
            "failed": evaluation.failed(),
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    }

    let mut sinks: Vec<Box<dyn ReportingSink>> = Vec::new();
    if cli.format == Format::Console {
        sinks.push(Box::new(ConsoleSink));
    }
    if let Some(step_summary) = StepSummarySink::from_env() {
        sinks.push(Box::new(step_summary));
    }
    if !cli.no_check_run {
        sinks.push(Box::new(CheckRunSink::new(
            token,
            format!("{}/{}", owner, repo),
        )));
    }

    // One post per report type per sink, sequentially.
    for sink in &sinks {
        sink.post(&vulnerability_report)
            .await
            .with_context(|| format!("failed to post vulnerability report to {}", sink.name()))?;
        sink.post(&license_report)
            .await
            .with_context(|| format!("failed to post license report to {}", sink.name()))?;
    }

    if evaluation.vulnerabilities_failed() {
        Ok(exit_codes::VULNERABLE)
    } else if evaluation.licenses_failed() {
        Ok(exit_codes::DENIED_LICENSE)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Resolves the repository and ref range from flags, falling back to the
/// workflow event context for anything not given explicitly.
fn resolve_target(cli: &Cli) -> Result<(String, String, String, String)> {
    if let (Some(repo), Some(base), Some(head)) = (&cli.repo, &cli.base_ref, &cli.head_ref) {
        let (owner, name) = parse_slug(repo)?;
        return Ok((owner, name, base.clone(), head.clone()));
    }

    let ctx = RunContext::from_env()?;
    let (owner, name) = match &cli.repo {
        Some(repo) => parse_slug(repo)?,
        None => (ctx.owner, ctx.repo),
    };
    Ok((
        owner,
        name,
        cli.base_ref.clone().unwrap_or(ctx.base_sha),
        cli.head_ref.clone().unwrap_or(ctx.head_sha),
    ))
}

fn parse_slug(slug: &str) -> Result<(String, String)> {
    slug.split_once('/')
        .filter(|(o, r)| !o.is_empty() && !r.is_empty())
        .map(|(o, r)| (o.to_string(), r.to_string()))
        .ok_or_else(|| anyhow!("malformed --repo `{}`; expected `owner/repo`", slug))
}
