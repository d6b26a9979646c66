#![deny(missing_docs)]
//! GitGauge core library.
//!
//! This crate contains the pure scoring and insight pipeline: derived
//! repository metrics, the bus-factor calculator, the five-category
//! quality score, and the strengths/recommendations rule tables.

pub mod analyzer;
pub mod bus_factor;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod recommendations;
pub mod report;
pub mod score;
pub mod strengths;

pub use analyzer::analyze;
pub use domain::{
    AnalysisResult, CommitInfo, Contributor, DerivedMetrics, HealthFlags, LanguageDistribution,
    PullRequestInfo, PullRequestState, ReadmeProbe, ReleaseInfo, RepoSnapshot, ScoreBreakdown,
    ScoreCategory,
};
pub use error::{GaugeError, Result};
pub use metrics::InsightInput;
pub use report::{format_language_stats, render_json, render_markdown, render_text};
pub use score::ScoreInput;
