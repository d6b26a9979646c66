//! Snapshot analysis: metrics, scores, insights, and final assembly.

use chrono::{DateTime, Utc};

use crate::domain::{AnalysisResult, HealthFlags, RepoSnapshot, ScoreBreakdown, ScoreCategory};
use crate::metrics::{self, InsightInput};
use crate::score::{self, ScoreInput};
use crate::{recommendations, strengths};

/// Static names and descriptions for the five score categories.
const CATEGORY_DESCRIPTIONS: [(&str, &str); 5] = [
    ("Popularity", "Stars on a logarithmic scale"),
    ("Activity", "Recency of updates and commit volume"),
    ("Community", "Contributor breadth, forks, and bus factor"),
    ("Maintenance", "Issue and pull request handling plus licensing"),
    ("Documentation", "README, description, wiki, and website"),
];

/// Analyze a fully materialized snapshot into the final result.
///
/// Pure and deterministic for a fixed `now`: derives the metrics, runs
/// the bus-factor, scoring, and insight analyzers in dependency order,
/// and assembles the immutable [`AnalysisResult`]. Partial results are
/// never produced; callers must hand in a complete snapshot.
pub fn analyze(snapshot: &RepoSnapshot, now: DateTime<Utc>) -> AnalysisResult {
    let metrics = metrics::derive(snapshot, now);
    let insight_input = InsightInput::from_parts(snapshot, &metrics);

    let breakdown = score::calculate(&ScoreInput {
        stars: snapshot.stars,
        forks: snapshot.forks,
        days_since_last_update: metrics.days_since_last_update,
        recent_commits: metrics.recent_commit_count,
        contributors_count: snapshot.contributors.len(),
        bus_factor: metrics.bus_factor,
        issue_resolution_rate: metrics.issue_resolution_rate,
        pr_merge_rate: metrics.pr_merge_rate,
        has_readme: snapshot.readme.present,
        readme_length: snapshot.readme.length,
        has_wiki: snapshot.has_wiki,
        has_website: snapshot.has_website,
        description_length: insight_input.description_length,
        has_license: snapshot.has_license,
    });

    let health = health_flags(snapshot, &insight_input);
    let strengths = strengths::identify(&insight_input);
    let recommendations = recommendations::generate(&insight_input);

    AnalysisResult {
        repository: format!("{}/{}", snapshot.owner, snapshot.name),
        description: snapshot.description.clone(),
        total_score: format!("{:.2}", breakdown.total()),
        categories: categories(&breakdown),
        metrics,
        health,
        strengths,
        recommendations,
    }
}

/// Fixed health-flag predicates over the derived metrics.
fn health_flags(snapshot: &RepoSnapshot, input: &InsightInput) -> HealthFlags {
    HealthFlags {
        is_popular: snapshot.stars > 100,
        is_active: (input.days_since_last_update < 30 && input.recent_commits > 0)
            || input.recent_commits > 5,
        has_community: input.contributors_count > 3 && input.bus_factor > 1,
        is_well_maintained: input.issue_resolution_rate.is_some_and(|rate| rate > 50.0),
        is_well_documented: (input.has_readme && input.readme_length > 300)
            || (input.has_website && input.has_readme),
    }
}

fn categories(breakdown: &ScoreBreakdown) -> Vec<ScoreCategory> {
    let scores = [
        breakdown.popularity,
        breakdown.activity,
        breakdown.community,
        breakdown.maintenance,
        breakdown.documentation,
    ];
    CATEGORY_DESCRIPTIONS
        .iter()
        .zip(scores)
        .map(|((name, description), score)| ScoreCategory {
            name: (*name).to_string(),
            score: format!("{score:.2}"),
            description: (*description).to_string(),
        })
        .collect()
}
