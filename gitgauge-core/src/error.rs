//! Error types for GitGauge core.

use std::{error::Error, fmt};

/// Error type for GitGauge analysis operations.
#[derive(Debug)]
pub enum GaugeError {
    /// The data source hit the GitHub API rate limit.
    RateLimited {
        /// Approximate minutes until the rate limit resets.
        reset_minutes: u64,
    },
    /// Any other failure raised by the data source; the message is
    /// propagated verbatim and the analysis aborts entirely.
    Upstream(String),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for GaugeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited { reset_minutes } => write!(
                f,
                "GitHub API rate limit exceeded; try again in about {reset_minutes} minute(s)"
            ),
            Self::Upstream(message) => write!(f, "{message}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for GaugeError {}

/// Convenience result type for GitGauge core.
pub type Result<T> = std::result::Result<T, GaugeError>;
