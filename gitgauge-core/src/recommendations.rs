//! Improvement suggestions derived from metric thresholds.

use crate::metrics::InsightInput;

/// Generate improvement recommendations in a fixed evaluation order.
///
/// Each check appends one fixed advisory message; tiered checks append
/// at most one. A fully healthy repository yields an empty list, which
/// is a valid state rather than an error.
pub fn generate(input: &InsightInput) -> Vec<String> {
    let mut recommendations = Vec::new();

    if input.description_length < 20 {
        recommendations
            .push("📝 Add a project description of at least 20 characters".to_string());
    }

    if !input.has_readme {
        recommendations.push("📖 Add a README to introduce the project".to_string());
    } else if input.readme_length < 300 {
        recommendations
            .push("📖 Expand the README with setup and usage instructions".to_string());
    }

    if !input.has_wiki && !input.has_website && input.contributors_count > 3 {
        recommendations
            .push("🌐 Add a wiki or project website for deeper documentation".to_string());
    }

    if !input.has_license {
        recommendations.push("⚖️ Add a license so others know how they may use the code".to_string());
    }

    if input.days_since_last_update > 180 {
        recommendations
            .push("🕸️ Repository looks abandoned; no updates in over six months".to_string());
    } else if input.days_since_last_update > 90 {
        recommendations.push("🕸️ Activity is slowing; last update over three months ago".to_string());
    }

    if input.contributors_count < 2 {
        recommendations
            .push("👤 Attract additional contributors to share the workload".to_string());
    }

    if input.bus_factor == 1 && input.stars > 50 {
        recommendations.push(
            "🚌 Contributions are concentrated in one person; spread knowledge across the team"
                .to_string(),
        );
    }

    if input.issue_resolution_rate.is_some_and(|rate| rate < 50.0) {
        recommendations
            .push("🐛 Improve issue resolution; fewer than half of issues get closed".to_string());
    }

    if input.open_prs > 5 && input.closed_prs < input.open_prs {
        recommendations.push("🔀 Review the growing pull request backlog".to_string());
    }

    if input.open_issues > 0 && input.days_since_last_update > 90 {
        recommendations.push("📅 Triage open issues that have gone stale".to_string());
    }

    if input.release_count == 0 && input.days_since_creation > 90 {
        recommendations.push("📦 Publish a first release to mark a stable state".to_string());
    } else if input
        .avg_release_frequency_days
        .is_some_and(|days| days > 180.0)
    {
        recommendations.push("📦 Release more frequently; gaps exceed six months".to_string());
    }

    recommendations
}
