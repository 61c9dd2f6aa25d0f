//! Article search demo.
//!
//! Creates an article index on an OpenSearch/Elasticsearch node (or the
//! in-process backend in dry-run mode), optionally inserts three sample articles and
//! runs three canned queries against it:
//!
//! - a term query for `"article"`
//! - a phrase match for `"past"`
//! - a bool query matching `"article"` and filtering to articles dated after now
//!
//! Each query prints one line per matching article text followed by a line of
//! 40 dashes on stdout. Everything else goes to the log on stderr.
//!
//! # Example
//!
//! ```rust
//! use article_search::{run_demo, BackendKind, DemoConfig, build_backend};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let config = DemoConfig {
//!     backend: BackendKind::Memory,
//!     seed_data: true,
//!     ..DemoConfig::default()
//! };
//! let backend = build_backend(&config).unwrap();
//!
//! let mut out = Vec::new();
//! let summary = run_demo(&config, backend.as_ref(), &mut out).await.unwrap();
//! assert_eq!(summary.seeded, 3);
//! # });
//! ```

#![warn(missing_docs)]

pub mod article;
pub mod bootstrap;
pub mod config;
pub mod demo;
pub mod error;
pub mod output;
pub mod runners;

pub use article::Article;
pub use bootstrap::{bootstrap_index, seed_articles};
pub use config::{BackendKind, ConfigError, DemoConfig};
pub use demo::{build_backend, run_demo, DemoSummary};
pub use error::{DemoError, Result};
pub use runners::{filtered_request, phrase_request, term_request, QueryRunner};
