//! Weighted quality scoring across five capped categories.

use serde::{Deserialize, Serialize};

use crate::domain::ScoreBreakdown;

/// Cap applied to every category sub-score.
const CATEGORY_CAP: f64 = 20.0;

/// Named inputs for the score calculation.
///
/// Rates are `None` when the underlying denominator is zero (no issues,
/// no closed pull requests); a missing rate contributes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Whole days since the last update.
    pub days_since_last_update: u64,
    /// Commits authored within the last 30 days.
    pub recent_commits: u64,
    /// Number of contributors.
    pub contributors_count: usize,
    /// Bus factor, 1-4.
    pub bus_factor: u32,
    /// Issue resolution percentage, when known.
    pub issue_resolution_rate: Option<f64>,
    /// Pull-request merge percentage, when known.
    pub pr_merge_rate: Option<f64>,
    /// Whether a README exists.
    pub has_readme: bool,
    /// README length in characters.
    pub readme_length: usize,
    /// Whether the wiki is enabled.
    pub has_wiki: bool,
    /// Whether a website/homepage is configured.
    pub has_website: bool,
    /// Description length in characters (0 when absent).
    pub description_length: usize,
    /// Whether a license is declared.
    pub has_license: bool,
}

/// Compute the five category sub-scores from raw metrics.
///
/// Pure function; every sub-score lands in [0, 20], so the unweighted
/// total lands in [0, 100] by construction. No intermediate rounding is
/// applied before summation.
pub fn calculate(input: &ScoreInput) -> ScoreBreakdown {
    ScoreBreakdown {
        popularity: popularity_score(input.stars),
        activity: activity_score(input.days_since_last_update, input.recent_commits),
        community: community_score(input.contributors_count, input.forks, input.bus_factor),
        maintenance: maintenance_score(input),
        documentation: documentation_score(input),
    }
}

/// Logarithmic star scaling so mega-popular repositories do not dominate.
fn popularity_score(stars: u64) -> f64 {
    (((stars + 1) as f64).log10() * 6.5).min(CATEGORY_CAP)
}

fn activity_score(days_since_last_update: u64, recent_commits: u64) -> f64 {
    let base = match days_since_last_update {
        0..7 => 15.0,
        7..30 => 12.0,
        30..90 => 10.0,
        90..180 => 7.0,
        180..365 => 3.0,
        _ => 0.0,
    };
    let bonus = if recent_commits > 20 {
        5.0
    } else {
        (recent_commits as f64 / 4.0).min(5.0)
    };
    (base + bonus).min(CATEGORY_CAP)
}

fn community_score(contributors_count: usize, forks: u64, bus_factor: u32) -> f64 {
    let contributor_score = (contributors_count as f64 * 1.5).min(10.0);
    let fork_score = (((forks + 1) as f64).log10() * 3.0).min(6.0);
    let bus_factor_score = ((bus_factor.saturating_sub(1)) as f64 * 2.0).min(4.0);
    contributor_score + fork_score + bus_factor_score
}

fn maintenance_score(input: &ScoreInput) -> f64 {
    let issue_component = input.issue_resolution_rate.unwrap_or(0.0) / 5.0;
    let pr_component = input.pr_merge_rate.unwrap_or(0.0) / 10.0;
    let commit_component = input.recent_commits as f64 * 0.4;
    let license_component = if input.has_license { 4.0 } else { 0.0 };
    (issue_component + pr_component + commit_component + license_component).min(CATEGORY_CAP)
}

fn documentation_score(input: &ScoreInput) -> f64 {
    let readme_bonus: f64 = if input.has_readme { 5.0 } else { 0.0 };
    // Wiki and website share a single bonus: wiki first, website as
    // fallback, so a repository with both is awarded once.
    let wiki_or_website_bonus = if input.has_wiki || input.has_website {
        5.0
    } else {
        0.0
    };
    let readme_length_bonus = if !input.has_readme {
        0.0
    } else if input.readme_length > 500 {
        5.0
    } else if input.readme_length > 100 {
        3.0
    } else {
        0.0
    };
    let description_bonus = if input.description_length > 20 { 5.0 } else { 0.0 };
    (readme_bonus + wiki_or_website_bonus + readme_length_bonus + description_bonus)
        .min(CATEGORY_CAP)
}
