//! Derived-metric math over a raw repository snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::bus_factor;
use crate::domain::{DerivedMetrics, LanguageDistribution, PullRequestState, RepoSnapshot};

/// Window, in days, used for the recent-commit count.
const RECENT_COMMIT_WINDOW_DAYS: i64 = 30;

/// Repositories younger than this have no meaningful release cadence.
const MIN_AGE_FOR_RELEASE_CADENCE_DAYS: u64 = 30;

/// Compute the full set of derived metrics from a snapshot.
///
/// `now` is the reference instant for every day-granularity difference,
/// passed in so analyses are deterministic and testable.
pub fn derive(snapshot: &RepoSnapshot, now: DateTime<Utc>) -> DerivedMetrics {
    let days_since_creation = whole_days_since(snapshot.created_at, now);
    DerivedMetrics {
        days_since_creation,
        days_since_last_update: whole_days_since(snapshot.updated_at, now),
        issue_resolution_rate: issue_resolution_rate(snapshot.open_issues, snapshot.closed_issues),
        pr_merge_rate: pr_merge_rate(snapshot),
        avg_release_frequency_days: release_frequency(snapshot, days_since_creation),
        recent_commit_count: recent_commit_count(snapshot, now),
        bus_factor: bus_factor::calculate(&snapshot.contributors),
        language_distribution: language_distribution(&snapshot.languages),
    }
}

/// Floor-division day difference, clamped to zero for future timestamps.
fn whole_days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let days = (now - then).num_days();
    if days < 0 { 0 } else { days as u64 }
}

/// Percentage of issues resolved; `None` when there are no issues at all.
fn issue_resolution_rate(open: u64, closed: u64) -> Option<f64> {
    let total = open + closed;
    if total == 0 {
        return None;
    }
    Some(closed as f64 / total as f64 * 100.0)
}

/// Percentage of closed pull requests that were merged; `None` when no
/// pull request has been closed yet.
fn pr_merge_rate(snapshot: &RepoSnapshot) -> Option<f64> {
    let closed = snapshot
        .pull_requests
        .iter()
        .filter(|pr| pr.state == PullRequestState::Closed)
        .count();
    if closed == 0 {
        return None;
    }
    let merged = snapshot
        .pull_requests
        .iter()
        .filter(|pr| pr.merged_at.is_some())
        .count();
    Some(merged as f64 / closed as f64 * 100.0)
}

/// Average days between releases: the span between the oldest and newest
/// release divided by the gap count. `None` for repositories with at most
/// one release or younger than 30 days.
fn release_frequency(snapshot: &RepoSnapshot, days_since_creation: u64) -> Option<f64> {
    if snapshot.releases.len() <= 1 || days_since_creation <= MIN_AGE_FOR_RELEASE_CADENCE_DAYS {
        return None;
    }
    let oldest = snapshot.releases.iter().map(|r| r.created_at).min()?;
    let newest = snapshot.releases.iter().map(|r| r.created_at).max()?;
    let span_days = (newest - oldest).num_days().max(0) as f64;
    Some(span_days / (snapshot.releases.len() - 1) as f64)
}

/// Number of commits authored within the last 30 days.
fn recent_commit_count(snapshot: &RepoSnapshot, now: DateTime<Utc>) -> u64 {
    let cutoff = now - Duration::days(RECENT_COMMIT_WINDOW_DAYS);
    snapshot
        .commits
        .iter()
        .filter(|commit| commit.author_date.is_some_and(|date| date >= cutoff))
        .count() as u64
}

/// Language byte counts converted to percentages, each rounded to two
/// decimals; percentages sum to roughly 100 across all entries.
pub fn language_distribution(languages: &BTreeMap<String, u64>) -> LanguageDistribution {
    let total: u64 = languages.values().sum();
    if total == 0 {
        return LanguageDistribution::new();
    }
    languages
        .iter()
        .map(|(language, bytes)| {
            let percentage = *bytes as f64 / total as f64 * 100.0;
            (language.clone(), (percentage * 100.0).round() / 100.0)
        })
        .collect()
}

/// Named inputs shared by the strengths and recommendations analyzers.
///
/// Replaces a long positional parameter list with one structured record
/// so field order can never silently drift between call sites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightInput {
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Number of contributors.
    pub contributors_count: usize,
    /// Bus factor, 1-4.
    pub bus_factor: u32,
    /// Commits authored within the last 30 days.
    pub recent_commits: u64,
    /// Whole days since the last update.
    pub days_since_last_update: u64,
    /// Whole days since the repository was created.
    pub days_since_creation: u64,
    /// Issue resolution percentage, when known.
    pub issue_resolution_rate: Option<f64>,
    /// Total number of issues, open plus closed.
    pub total_issues: u64,
    /// Open issue count.
    pub open_issues: u64,
    /// Pull-request merge percentage, when known.
    pub pr_merge_rate: Option<f64>,
    /// Open pull-request count.
    pub open_prs: u64,
    /// Closed pull-request count.
    pub closed_prs: u64,
    /// Number of published releases.
    pub release_count: usize,
    /// Average days between releases, when known.
    pub avg_release_frequency_days: Option<f64>,
    /// Whether the wiki is enabled.
    pub has_wiki: bool,
    /// Whether a website/homepage is configured.
    pub has_website: bool,
    /// Whether a README exists.
    pub has_readme: bool,
    /// README length in characters.
    pub readme_length: usize,
    /// Description length in characters (0 when absent).
    pub description_length: usize,
    /// Whether a license is declared.
    pub has_license: bool,
}

impl InsightInput {
    /// Assemble the insight inputs from a snapshot and its derived metrics.
    pub fn from_parts(snapshot: &RepoSnapshot, metrics: &DerivedMetrics) -> Self {
        let open_prs = snapshot
            .pull_requests
            .iter()
            .filter(|pr| pr.state == PullRequestState::Open)
            .count() as u64;
        let closed_prs = snapshot.pull_requests.len() as u64 - open_prs;
        Self {
            stars: snapshot.stars,
            forks: snapshot.forks,
            contributors_count: snapshot.contributors.len(),
            bus_factor: metrics.bus_factor,
            recent_commits: metrics.recent_commit_count,
            days_since_last_update: metrics.days_since_last_update,
            days_since_creation: metrics.days_since_creation,
            issue_resolution_rate: metrics.issue_resolution_rate,
            total_issues: snapshot.open_issues + snapshot.closed_issues,
            open_issues: snapshot.open_issues,
            pr_merge_rate: metrics.pr_merge_rate,
            open_prs,
            closed_prs,
            release_count: snapshot.releases.len(),
            avg_release_frequency_days: metrics.avg_release_frequency_days,
            has_wiki: snapshot.has_wiki,
            has_website: snapshot.has_website,
            has_readme: snapshot.readme.present,
            readme_length: snapshot.readme.length,
            description_length: snapshot
                .description
                .as_deref()
                .map(str::len)
                .unwrap_or(0),
            has_license: snapshot.has_license,
        }
    }
}
