//! Positive observations derived from metric thresholds.

use crate::metrics::InsightInput;

/// Identify repository strengths in a fixed evaluation order.
///
/// Tiered groups append at most one message (the highest matching tier);
/// independent checks append whenever their predicate holds. Pure and
/// order-preserving; a minimal repository yields little or nothing.
pub fn identify(input: &InsightInput) -> Vec<String> {
    let mut strengths = Vec::new();

    if let Some(message) = star_strength(input.stars) {
        strengths.push(message);
    }
    if let Some(message) = contributor_strength(input.contributors_count, input.bus_factor) {
        strengths.push(message);
    }
    if let Some(message) = commit_strength(input.recent_commits) {
        strengths.push(message);
    }
    if let Some(message) = issue_strength(input.issue_resolution_rate, input.total_issues) {
        strengths.push(message);
    }
    if let Some(message) = release_strength(input.release_count) {
        strengths.push(message);
    }
    if let Some(message) = documentation_strength(input) {
        strengths.push(message);
    }

    if input.forks > 100 {
        strengths.push("🍴 Forked by over 100 developers".to_string());
    }
    if input.bus_factor >= 3 {
        strengths.push("🚌 Knowledge is well distributed across maintainers".to_string());
    }
    if input.days_since_last_update < 7 && input.recent_commits > 5 {
        strengths.push("⚡ Actively developed with very recent commits".to_string());
    }
    if input.pr_merge_rate.is_some_and(|rate| rate > 70.0) && input.closed_prs > 20 {
        strengths.push("🔀 Pull requests are reviewed and merged consistently".to_string());
    }
    if input.has_license {
        strengths.push("📄 Clearly licensed for reuse".to_string());
    }

    strengths
}

fn star_strength(stars: u64) -> Option<String> {
    if stars > 5000 {
        Some("⭐ Exceptional popularity with over 5,000 stars".to_string())
    } else if stars > 1000 {
        Some("⭐ Highly popular with over 1,000 stars".to_string())
    } else if stars > 100 {
        Some("⭐ Well received with over 100 stars".to_string())
    } else {
        None
    }
}

fn contributor_strength(contributors: usize, bus_factor: u32) -> Option<String> {
    if contributors > 20 {
        Some("👥 Large contributor community (20+ contributors)".to_string())
    } else if contributors > 10 {
        Some("👥 Healthy contributor base (10+ contributors)".to_string())
    } else if contributors > 5 && bus_factor > 1 {
        Some("👥 Growing contributor community".to_string())
    } else {
        None
    }
}

fn commit_strength(recent_commits: u64) -> Option<String> {
    if recent_commits > 50 {
        Some("🔥 Very high recent activity (50+ commits this month)".to_string())
    } else if recent_commits > 30 {
        Some("🔥 High recent activity (30+ commits this month)".to_string())
    } else if recent_commits > 10 {
        Some("🔥 Steady recent activity (10+ commits this month)".to_string())
    } else {
        None
    }
}

fn issue_strength(resolution_rate: Option<f64>, total_issues: u64) -> Option<String> {
    let rate = resolution_rate?;
    if rate > 80.0 {
        Some("✅ Excellent issue resolution rate (above 80%)".to_string())
    } else if rate > 60.0 && total_issues > 20 {
        Some("✅ Good issue resolution rate across a sizeable backlog".to_string())
    } else {
        None
    }
}

fn release_strength(release_count: usize) -> Option<String> {
    if release_count > 20 {
        Some("📦 Mature release history (20+ releases)".to_string())
    } else if release_count > 5 {
        Some("📦 Regular releases".to_string())
    } else {
        None
    }
}

fn documentation_strength(input: &InsightInput) -> Option<String> {
    if input.has_website && input.has_readme && input.readme_length > 1000 {
        Some("📚 Comprehensive documentation with README and website".to_string())
    } else if input.has_website && input.has_readme {
        Some("📚 Documented with README and website".to_string())
    } else if input.has_readme && input.readme_length > 1000 {
        Some("📚 Thorough README documentation".to_string())
    } else if input.has_readme {
        Some("📚 Has README documentation".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::identify;
    use crate::metrics::InsightInput;

    fn minimal_input() -> InsightInput {
        InsightInput {
            contributors_count: 1,
            bus_factor: 1,
            days_since_last_update: 200,
            days_since_creation: 200,
            ..InsightInput::default()
        }
    }

    fn thriving_input() -> InsightInput {
        InsightInput {
            stars: 6000,
            forks: 250,
            contributors_count: 30,
            bus_factor: 3,
            recent_commits: 60,
            days_since_last_update: 2,
            days_since_creation: 900,
            issue_resolution_rate: Some(90.0),
            total_issues: 300,
            open_issues: 30,
            pr_merge_rate: Some(85.0),
            open_prs: 4,
            closed_prs: 120,
            release_count: 25,
            avg_release_frequency_days: Some(30.0),
            has_wiki: true,
            has_website: true,
            has_readme: true,
            readme_length: 4000,
            description_length: 60,
            has_license: true,
        }
    }

    #[test]
    fn minimal_repository_yields_almost_nothing() {
        let strengths = identify(&minimal_input());
        assert!(strengths.len() < 2, "unexpected strengths: {strengths:?}");
    }

    #[test]
    fn tiered_groups_fire_only_their_highest_tier() {
        let strengths = identify(&thriving_input());
        let star_lines: Vec<&String> =
            strengths.iter().filter(|s| s.contains('⭐')).collect();
        assert_eq!(star_lines.len(), 1);
        assert!(star_lines[0].contains("5,000"));

        let doc_lines: Vec<&String> =
            strengths.iter().filter(|s| s.contains('📚')).collect();
        assert_eq!(doc_lines.len(), 1);
        assert!(doc_lines[0].contains("website"));
    }

    #[test]
    fn thriving_repository_matches_every_group() {
        let strengths = identify(&thriving_input());
        // Six tiered groups plus five independent checks.
        assert_eq!(strengths.len(), 11);
    }

    #[test]
    fn order_follows_rule_table_evaluation() {
        let strengths = identify(&thriving_input());
        assert!(strengths[0].contains('⭐'));
        assert!(strengths.last().expect("non-empty").contains("licensed"));
    }

    #[test]
    fn middle_star_tier_fires_for_moderate_popularity() {
        let input = InsightInput {
            stars: 1500,
            days_since_last_update: 200,
            ..minimal_input()
        };
        let strengths = identify(&input);
        assert!(strengths.iter().any(|s| s.contains("1,000")));
        assert!(!strengths.iter().any(|s| s.contains("5,000")));
    }

    #[test]
    fn small_team_contributor_tier_needs_bus_factor_above_one() {
        let solo_heavy = InsightInput {
            contributors_count: 7,
            bus_factor: 1,
            ..minimal_input()
        };
        assert!(!identify(&solo_heavy).iter().any(|s| s.contains('👥')));

        let shared = InsightInput {
            contributors_count: 7,
            bus_factor: 2,
            ..minimal_input()
        };
        assert!(identify(&shared).iter().any(|s| s.contains('👥')));
    }

    #[test]
    fn unknown_resolution_rate_never_matches() {
        let input = InsightInput {
            issue_resolution_rate: None,
            total_issues: 0,
            ..thriving_input()
        };
        assert!(!identify(&input).iter().any(|s| s.contains('✅')));
    }

    #[test]
    fn identify_is_idempotent() {
        let input = thriving_input();
        assert_eq!(identify(&input), identify(&input));
    }
}
