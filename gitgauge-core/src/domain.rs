//! Domain entities for GitGauge.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mapping of language names to their percentage of total bytes.
pub type LanguageDistribution = BTreeMap<String, f64>;

/// A repository contributor and their lifetime contribution count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Stable identifier of the contributor.
    pub id: u64,
    /// Total number of contributions attributed to this contributor.
    pub contributions: u64,
}

/// A single commit, reduced to its authoring timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Author timestamp, absent when the commit carries no author date.
    pub author_date: Option<DateTime<Utc>>,
}

/// State of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// The pull request is still open.
    Open,
    /// The pull request has been closed (merged or not).
    Closed,
}

/// A pull request, reduced to the signals scoring needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestInfo {
    /// Open/closed state.
    pub state: PullRequestState,
    /// Merge timestamp, present only for merged pull requests.
    pub merged_at: Option<DateTime<Utc>>,
}

/// A published release, reduced to its creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// When the release was created.
    pub created_at: DateTime<Utc>,
}

/// README detection supplied by the data source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadmeProbe {
    /// Whether a README file exists.
    pub present: bool,
    /// README length in characters (0 when absent).
    pub length: usize,
}

/// Raw repository signals assembled from the data source.
///
/// All counts are non-negative by construction; collections are
/// independent and immutable once the snapshot is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    /// Repository owner login.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Open issue count (pull requests excluded).
    pub open_issues: u64,
    /// Closed issue count (pull requests excluded).
    pub closed_issues: u64,
    /// Watcher/subscriber count.
    pub watchers: u64,
    /// Whether the repository wiki is enabled.
    pub has_wiki: bool,
    /// Whether a homepage/website is configured.
    pub has_website: bool,
    /// Repository creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Contributors with their contribution counts.
    pub contributors: Vec<Contributor>,
    /// Recent commits.
    pub commits: Vec<CommitInfo>,
    /// Recent pull requests.
    pub pull_requests: Vec<PullRequestInfo>,
    /// Published releases.
    pub releases: Vec<ReleaseInfo>,
    /// Language byte counts keyed by language name.
    pub languages: BTreeMap<String, u64>,
    /// Repository description, when set.
    pub description: Option<String>,
    /// README detection result.
    pub readme: ReadmeProbe,
    /// Whether the repository declares a license.
    pub has_license: bool,
}

/// Metrics derived once per analysis from a [`RepoSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Whole days since the repository was created.
    pub days_since_creation: u64,
    /// Whole days since the repository was last updated.
    pub days_since_last_update: u64,
    /// Percentage of issues resolved, absent when there are no issues.
    pub issue_resolution_rate: Option<f64>,
    /// Percentage of closed pull requests that were merged, absent when
    /// no pull request has been closed yet.
    pub pr_merge_rate: Option<f64>,
    /// Average days between releases, absent for repositories with at
    /// most one release or younger than 30 days.
    pub avg_release_frequency_days: Option<f64>,
    /// Commits authored within the last 30 days.
    pub recent_commit_count: u64,
    /// Bus factor risk score, 1-4.
    pub bus_factor: u32,
    /// Language usage percentages, each rounded to two decimals.
    pub language_distribution: LanguageDistribution,
}

/// The five weighted sub-scores, each clamped to [0, 20].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Popularity sub-score.
    pub popularity: f64,
    /// Activity sub-score.
    pub activity: f64,
    /// Community sub-score.
    pub community: f64,
    /// Maintenance sub-score.
    pub maintenance: f64,
    /// Documentation sub-score.
    pub documentation: f64,
}

impl ScoreBreakdown {
    /// Unweighted sum of the five sub-scores, in [0, 100] by construction.
    pub fn total(&self) -> f64 {
        self.popularity + self.activity + self.community + self.maintenance + self.documentation
    }
}

/// Boolean health flags derived from the metrics by fixed predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFlags {
    /// More than 100 stars.
    pub is_popular: bool,
    /// Updated recently with commit activity.
    pub is_active: bool,
    /// More than three contributors with a bus factor above one.
    pub has_community: bool,
    /// Known issue resolution rate above 50%.
    pub is_well_maintained: bool,
    /// Substantial README, or a website alongside a README.
    pub is_well_documented: bool,
}

/// A named score category presented in the final result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCategory {
    /// Category name.
    pub name: String,
    /// Sub-score formatted to two decimals.
    pub score: String,
    /// Static description of what the category measures.
    pub description: String,
}

/// Final analysis output, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Repository identity as `owner/name`.
    pub repository: String,
    /// Repository description, when set.
    pub description: Option<String>,
    /// Total score formatted to two decimals.
    pub total_score: String,
    /// The five score categories, in fixed order.
    pub categories: Vec<ScoreCategory>,
    /// Derived metrics projection.
    pub metrics: DerivedMetrics,
    /// Boolean health flags.
    pub health: HealthFlags,
    /// Positive observations, in rule-evaluation order.
    pub strengths: Vec<String>,
    /// Improvement suggestions, in rule-evaluation order.
    pub recommendations: Vec<String>,
}
