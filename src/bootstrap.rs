//! Index creation and sample data.

use crate::article::Article;
use article_search_log::{debug, info};
use article_search_opensearch::{index_document, Document, IndexSettings, Result, SearchBackend};
use chrono::{DateTime, Utc};

/// Create `index` with the given shard and replica counts and `D`'s mapping.
///
/// An existing index is reported as `SearchError::IndexExists`; its settings
/// and mapping are left untouched.
pub async fn bootstrap_index<D: Document>(
    backend: &dyn SearchBackend,
    index: &str,
    shards: u32,
    replicas: u32,
) -> Result<()> {
    let settings = IndexSettings::new()
        .shards(shards)
        .replicas(replicas)
        .mappings(D::mapping());

    debug!("Index body for {}: {}", index, settings.to_json());

    backend.create_index(index, &settings).await?;
    info!(
        "Created index {} ({} shard(s), {} replica(s))",
        index, shards, replicas
    );
    Ok(())
}

/// Insert the sample articles and refresh so they are searchable right away.
///
/// Returns the generated document IDs.
pub async fn seed_articles(
    backend: &dyn SearchBackend,
    index: &str,
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    let mut ids = Vec::new();

    for article in Article::samples(now) {
        ids.push(index_document(backend, index, &article).await?);
    }

    backend.refresh(index).await?;
    info!("Inserted {} sample articles into {}", ids.len(), index);

    Ok(ids)
}
