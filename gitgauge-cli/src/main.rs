#![deny(missing_docs)]
//! GitGauge command-line interface.
//!
//! Fetches a GitHub repository's public metadata and prints a composite
//! quality score with strengths and recommendations.

mod github;

use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gitgauge_core::{AnalysisResult, RepoSnapshot, render_json, render_markdown, render_text};
use github::{GithubApi, GithubClient};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[cfg_attr(test, allow(dead_code))]
#[command(name = "gitgauge", version, about = "GitGauge CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for the analysis report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
#[cfg_attr(test, allow(dead_code))]
enum Commands {
    /// Analyze a repository and report its quality score.
    Analyze {
        /// Repository to analyze, as `owner/repo` or a GitHub URL.
        repo: String,
        #[command(flatten)]
        report: OutputArgs,
        /// GitHub bearer token for private data and higher rate limits.
        #[arg(long, env = "GITGAUGE_TOKEN")]
        token: Option<String>,
        /// GitHub API root, overridable for testing and GHE installs.
        #[arg(long, env = "GITGAUGE_API_URL", default_value = github::DEFAULT_API_URL)]
        api_url: String,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Analyze {
            repo,
            report,
            token,
            api_url,
        } => run_analyze(&repo, &report, token, &api_url).await,
    };

    if let Err(error) = outcome {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

#[cfg_attr(test, allow(dead_code))]
async fn run_analyze(
    repo: &str,
    report: &OutputArgs,
    token: Option<String>,
    api_url: &str,
) -> CliResult<()> {
    let (owner, name) = parse_repo_spec(repo)?;
    let client = GithubClient::with_base_url(api_url, token)?;
    let result = analyze_repository(&client, &owner, &name).await?;
    emit_report(&result, report).await
}

/// Fetch everything and run the pure analysis pipeline.
async fn analyze_repository(
    api: &impl GithubApi,
    owner: &str,
    name: &str,
) -> gitgauge_core::Result<AnalysisResult> {
    let snapshot = fetch_snapshot(api, owner, name).await?;
    Ok(gitgauge_core::analyze(&snapshot, Utc::now()))
}

/// Issue all raw-data fetches concurrently and assemble the snapshot.
///
/// The join fails as a whole on the first fetch error; no partial
/// snapshot is ever produced and nothing is retried.
async fn fetch_snapshot(
    api: &impl GithubApi,
    owner: &str,
    name: &str,
) -> gitgauge_core::Result<RepoSnapshot> {
    log::info!("fetching repository data for {owner}/{name}");
    let (metadata, issues, pull_requests, contributors, commits, releases, languages, readme) = tokio::try_join!(
        api.fetch_repository(owner, name),
        api.fetch_issues(owner, name),
        api.fetch_pull_requests(owner, name),
        api.fetch_contributors(owner, name),
        api.fetch_commits(owner, name),
        api.fetch_releases(owner, name),
        api.fetch_languages(owner, name),
        api.fetch_readme(owner, name),
    )?;
    log::debug!(
        "fetched {} contributors, {} commits, {} pull requests, {} releases",
        contributors.len(),
        commits.len(),
        pull_requests.len(),
        releases.len()
    );

    Ok(RepoSnapshot {
        owner: owner.to_string(),
        name: name.to_string(),
        stars: metadata.stars,
        forks: metadata.forks,
        open_issues: issues.open,
        closed_issues: issues.closed,
        watchers: metadata.watchers,
        has_wiki: metadata.has_wiki,
        has_website: metadata.has_website,
        created_at: metadata.created_at,
        updated_at: metadata.updated_at,
        contributors,
        commits,
        pull_requests,
        releases,
        languages,
        description: metadata.description,
        readme,
        has_license: metadata.has_license,
    })
}

/// Parse `owner/repo`, or a full GitHub URL, into its two components.
fn parse_repo_spec(spec: &str) -> CliResult<(String, String)> {
    let trimmed = spec.trim();
    let stripped = trimmed
        .strip_prefix("https://github.com/")
        .or_else(|| trimmed.strip_prefix("http://github.com/"))
        .or_else(|| trimmed.strip_prefix("git@github.com:"))
        .unwrap_or(trimmed);
    let stripped = stripped.trim_matches('/');
    let stripped = stripped.strip_suffix(".git").unwrap_or(stripped);

    let mut parts = stripped.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(format!("invalid repository spec: {spec} (expected owner/repo)").into()),
    }
}

/// Render the analysis and write it to stdout or the requested file.
async fn emit_report(result: &AnalysisResult, args: &OutputArgs) -> CliResult<()> {
    let rendered = match args.format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => render_json(result)?,
        OutputFormat::Markdown => render_markdown(result),
    };
    match args.report_output.as_ref() {
        Some(path) => {
            tokio::fs::write(path, rendered.as_bytes()).await?;
            log::info!("report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
