//! The capability surface shared by every search backend.

use crate::{
    document::Document,
    error::Result,
    index::{IndexSettings, IndexSettingsReport},
    search::{SearchRequest, SearchResponse},
};
use async_trait::async_trait;
use serde_json::Value;

/// Operations the demo needs from a search service.
///
/// Implemented by [`OpenSearchClient`](crate::OpenSearchClient) for a real
/// cluster and by [`MemoryBackend`](crate::MemoryBackend) for in-process use.
/// Documents cross this boundary as JSON so the trait stays object safe; see
/// [`index_document`] and [`search_documents`] for typed access.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Create an index. Fails with `IndexExists` if it is already there.
    async fn create_index(&self, name: &str, settings: &IndexSettings) -> Result<()>;

    /// Delete an index. Fails with `IndexNotFound` if it is missing.
    async fn delete_index(&self, name: &str) -> Result<()>;

    /// Whether an index exists.
    async fn index_exists(&self, name: &str) -> Result<bool>;

    /// Shard and replica counts of an index.
    async fn index_settings(&self, name: &str) -> Result<IndexSettingsReport>;

    /// Store a document under a generated ID and return that ID.
    async fn index_json(&self, index: &str, document: &Value) -> Result<String>;

    /// Make recent writes visible to search.
    async fn refresh(&self, index: &str) -> Result<()>;

    /// Run a search.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;

    /// Index used when a request does not name one.
    fn default_index(&self) -> &str;
}

/// Serialize and store a typed document.
pub async fn index_document<D: Document>(
    backend: &dyn SearchBackend,
    index: &str,
    document: &D,
) -> Result<String> {
    let value = serde_json::to_value(document)?;
    backend.index_json(index, &value).await
}

/// Run a search and deserialize the hits.
pub async fn search_documents<D: Document>(
    backend: &dyn SearchBackend,
    request: &SearchRequest,
) -> Result<Vec<D>> {
    backend.search(request).await?.documents()
}
