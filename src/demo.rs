//! One end-to-end demo run.

use crate::{
    article::Article,
    bootstrap::{bootstrap_index, seed_articles},
    config::{BackendKind, DemoConfig},
    error::{DemoError, Result},
    runners::QueryRunner,
};
use article_search_log::{error, info, warn};
use article_search_opensearch::{ErrorKind, MemoryBackend, OpenSearchClient, SearchBackend, SearchError};
use chrono::Utc;
use std::io::Write;

/// What happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSummary {
    /// False when the index already existed.
    pub index_created: bool,
    /// Number of sample articles inserted.
    pub seeded: usize,
    /// Hit count per runner, in execution order.
    pub hits: Vec<(QueryRunner, usize)>,
}

/// Build the backend selected by the configuration.
///
/// [`BackendKind::Memory`] is a dry-run mode for trying the flow without a
/// server. It only understands the queries the demo sends.
pub fn build_backend(config: &DemoConfig) -> Result<Box<dyn SearchBackend>> {
    let backend: Box<dyn SearchBackend> = match config.backend {
        BackendKind::OpenSearch => Box::new(OpenSearchClient::new(config.client_config())?),
        BackendKind::Memory => {
            warn!("Dry run: using the in-process backend, no search service is contacted");
            Box::new(MemoryBackend::new(&config.index))
        }
    };
    Ok(backend)
}

/// Create the index, optionally seed it, then run every query runner in order.
///
/// An already existing index is logged and the run continues. Any other
/// bootstrap or seeding failure ends the run. A failing runner is logged with
/// its error kind and the remaining runners still run; the failures are
/// reported together at the end as [`DemoError::RunnersFailed`].
pub async fn run_demo<W: Write>(
    config: &DemoConfig,
    backend: &dyn SearchBackend,
    out: &mut W,
) -> Result<DemoSummary> {
    let index_created =
        match bootstrap_index::<Article>(backend, &config.index, config.shards, config.replicas)
            .await
        {
            Ok(()) => true,
            Err(SearchError::IndexExists(name)) => {
                warn!("Index {} already exists; keeping its settings and mapping", name);
                false
            }
            Err(e) => return Err(e.into()),
        };

    let mut seeded = 0;
    if config.seed_data {
        seeded = seed_articles(backend, &config.index, Utc::now()).await?.len();
        writeln!(out, "Data inserted.")?;
    }

    let mut hits = Vec::new();
    let mut failed = Vec::new();

    for runner in QueryRunner::ALL {
        info!("{}:", runner.heading());

        match runner.run(backend, Utc::now(), out).await {
            Ok(count) => hits.push((runner, count)),
            Err(e) => {
                let kind = match &e {
                    DemoError::Search(search) => search.kind(),
                    _ => ErrorKind::Other,
                };
                error!("{} query failed ({}): {}", runner, kind, e);
                failed.push(runner.name().to_string());
            }
        }
    }

    if !failed.is_empty() {
        return Err(DemoError::RunnersFailed { failed });
    }

    Ok(DemoSummary {
        index_created,
        seeded,
        hits,
    })
}
