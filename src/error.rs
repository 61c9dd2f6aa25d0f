//! Error type for a demo run.

use crate::config::ConfigError;
use article_search_opensearch::SearchError;
use thiserror::Error;

/// Errors that end a demo run.
#[derive(Error, Debug)]
pub enum DemoError {
    /// The search backend failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing results failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more query runners failed; the others still ran.
    #[error("{} query runner(s) failed: {}", .failed.len(), .failed.join(", "))]
    RunnersFailed {
        /// Names of the failed runners.
        failed: Vec<String>,
    },
}

/// Result type alias for demo operations.
pub type Result<T> = std::result::Result<T, DemoError>;
