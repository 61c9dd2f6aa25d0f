//! HTTP client for OpenSearch/Elasticsearch.

use crate::{
    backend::SearchBackend,
    config::ClientConfig,
    error::{Result, SearchError},
    index::{IndexManager, IndexSettings, IndexSettingsReport},
    search::{SearchRequest, SearchResponse},
};
use article_search_log::{debug, info};
use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    OpenSearch,
};
use serde_json::Value;
use std::sync::Arc;

/// Search backend talking to a single node over HTTP.
#[derive(Clone)]
pub struct OpenSearchClient {
    client: Arc<OpenSearch>,
    config: Arc<ClientConfig>,
}

impl OpenSearchClient {
    /// Create a new client. No request is sent until the first operation.
    pub fn new(config: ClientConfig) -> Result<Self> {
        info!("Initializing search client for: {}", config.url);

        if config.default_index.is_empty() {
            return Err(SearchError::Validation("No default index provided".to_string()));
        }

        let url = opensearch::http::Url::parse(&config.url)
            .map_err(|e| SearchError::Validation(format!("Invalid URL: {}", e)))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(config.request_timeout)
            .disable_proxy();

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder =
                builder.auth(opensearch::auth::Credentials::Basic(user.clone(), pass.clone()));
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::Connection(e.to_string()))?;

        debug!("Search client initialized");

        Ok(Self {
            client: Arc::new(OpenSearch::new(transport)),
            config: Arc::new(config),
        })
    }

    /// Index management operations.
    pub fn indices(&self) -> IndexManager {
        IndexManager::new(self.client.clone())
    }
}

#[async_trait]
impl SearchBackend for OpenSearchClient {
    async fn create_index(&self, name: &str, settings: &IndexSettings) -> Result<()> {
        self.indices().create(name, settings).await
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        self.indices().delete(name).await
    }

    async fn index_exists(&self, name: &str) -> Result<bool> {
        self.indices().exists(name).await
    }

    async fn index_settings(&self, name: &str) -> Result<IndexSettingsReport> {
        self.indices().settings(name).await
    }

    async fn index_json(&self, index: &str, document: &Value) -> Result<String> {
        debug!("Indexing document with generated ID in index {}", index);

        let response = self
            .client
            .index(opensearch::IndexParts::Index(index))
            .body(document)
            .send()
            .await?;

        let status = response.status_code();
        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(SearchError::Internal(SearchError::reason_from_body(
                &body,
                "Indexing failed",
            )));
        }

        body["_id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SearchError::Internal("No _id in index response".to_string()))
    }

    async fn refresh(&self, index: &str) -> Result<()> {
        self.indices().refresh(index).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let index = request.index.as_deref().unwrap_or(self.default_index());
        let body = request.to_body();

        debug!("Searching index {} with {}", index, body);

        let response = self
            .client
            .search(opensearch::SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await?;

        let status = response.status_code();
        let result: Value = response.json().await?;

        if status == opensearch::http::StatusCode::NOT_FOUND {
            return Err(SearchError::IndexNotFound(index.to_string()));
        }

        if !status.is_success() {
            return Err(SearchError::Query(SearchError::reason_from_body(
                &result,
                "Search failed",
            )));
        }

        SearchResponse::from_json(&result)
    }

    fn default_index(&self) -> &str {
        &self.config.default_index
    }
}

impl std::fmt::Debug for OpenSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchClient")
            .field("url", &self.config.url)
            .field("default_index", &self.config.default_index)
            .finish()
    }
}
