//! Report formatting for analysis results.

use std::fmt::Write;

use serde::Serialize;

use crate::domain::{AnalysisResult, LanguageDistribution};

/// Render an analysis result as plain text.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}: score {}/100", result.repository, result.total_score);
    if let Some(description) = result.description.as_deref() {
        let _ = writeln!(output, "{description}");
    }
    let _ = writeln!(output);
    for category in &result.categories {
        let _ = writeln!(
            output,
            "  {:<14} {:>6}  {}",
            category.name, category.score, category.description
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Bus factor: {}", result.metrics.bus_factor);
    let _ = writeln!(
        output,
        "Updated {} day(s) ago; {} commit(s) in the last 30 days",
        result.metrics.days_since_last_update, result.metrics.recent_commit_count
    );
    append_rate(&mut output, "Issue resolution", result.metrics.issue_resolution_rate);
    append_rate(&mut output, "PR merge rate", result.metrics.pr_merge_rate);
    if !result.metrics.language_distribution.is_empty() {
        let _ = writeln!(output, "Languages:");
        for (language, percent) in format_language_stats(&result.metrics.language_distribution) {
            let _ = writeln!(output, "  {language}: {percent:.2}%");
        }
    }
    append_lines(&mut output, "Strengths", &result.strengths);
    append_lines(&mut output, "Recommendations", &result.recommendations);
    output
}

/// Render an analysis result as Markdown.
pub fn render_markdown(result: &AnalysisResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# GitGauge Report: {}\n", result.repository);
    if let Some(description) = result.description.as_deref() {
        let _ = writeln!(output, "> {description}\n");
    }
    let _ = writeln!(output, "**Total score: {}/100**\n", result.total_score);
    let _ = writeln!(output, "| Category | Score | Measures |");
    let _ = writeln!(output, "| --- | ---: | --- |");
    for category in &result.categories {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            category.name, category.score, category.description
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Metrics\n");
    let _ = writeln!(output, "- Bus factor: {}", result.metrics.bus_factor);
    let _ = writeln!(
        output,
        "- Days since last update: {}",
        result.metrics.days_since_last_update
    );
    let _ = writeln!(
        output,
        "- Commits in the last 30 days: {}",
        result.metrics.recent_commit_count
    );
    let _ = writeln!(
        output,
        "- Issue resolution rate: {}",
        format_rate(result.metrics.issue_resolution_rate)
    );
    let _ = writeln!(
        output,
        "- PR merge rate: {}",
        format_rate(result.metrics.pr_merge_rate)
    );
    if !result.metrics.language_distribution.is_empty() {
        let _ = writeln!(output, "\n### Languages\n");
        for (language, percent) in format_language_stats(&result.metrics.language_distribution) {
            let _ = writeln!(output, "- {language}: {percent:.2}%");
        }
    }
    append_markdown_list(&mut output, "Strengths", &result.strengths, "None identified.");
    append_markdown_list(
        &mut output,
        "Recommendations",
        &result.recommendations,
        "Nothing to suggest; the repository looks healthy.",
    );
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Format language stats sorted by percentage, descending.
pub fn format_language_stats(stats: &LanguageDistribution) -> Vec<(String, f64)> {
    let mut items: Vec<(String, f64)> = stats.iter().map(|(k, v)| (k.clone(), *v)).collect();
    items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    items
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{rate:.2}%"),
        None => "n/a".to_string(),
    }
}

fn append_rate(output: &mut String, label: &str, rate: Option<f64>) {
    let _ = writeln!(output, "{label}: {}", format_rate(rate));
}

fn append_lines(output: &mut String, title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let _ = writeln!(output, "\n{title}:");
    for line in lines {
        let _ = writeln!(output, "  {line}");
    }
}

fn append_markdown_list(output: &mut String, title: &str, lines: &[String], empty: &str) {
    let _ = writeln!(output, "\n## {title}\n");
    if lines.is_empty() {
        let _ = writeln!(output, "{empty}");
        return;
    }
    for line in lines {
        let _ = writeln!(output, "- {line}");
    }
}
