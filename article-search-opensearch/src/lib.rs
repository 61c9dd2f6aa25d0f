//! Search backends for the article search demo.
//!
//! This crate provides:
//! - [`SearchBackend`], the operations the demo needs from a search service
//! - [`OpenSearchClient`], an HTTP implementation for OpenSearch/Elasticsearch
//! - [`MemoryBackend`], an embedded implementation that needs no server
//! - A query DSL expressed as plain data ([`Query`], [`BoolQuery`], ...)
//! - Index settings and field mappings
//!
//! # Example
//!
//! ```rust,no_run
//! use article_search_opensearch::{
//!     ClientConfig, Document, Mapping, MappingField, OpenSearchClient, Query, SearchRequest,
//!     search_documents,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Recipe {
//!     title: String,
//! }
//!
//! impl Document for Recipe {
//!     fn mapping() -> Mapping {
//!         Mapping::new().field("title", MappingField::text())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenSearchClient::new(ClientConfig::new("http://localhost:9200", "recipes"))?;
//!
//!     let request = SearchRequest::new(Query::match_text("title", "soup"));
//!     let recipes: Vec<Recipe> = search_documents(&client, &request).await?;
//!     println!("{} recipes", recipes.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod backend;
mod client;
mod config;
mod document;
mod error;
mod index;
mod memory;
mod query;
mod search;

pub use backend::{index_document, search_documents, SearchBackend};
pub use client::OpenSearchClient;
pub use config::{ClientConfig, DEFAULT_URL};
pub use document::Document;
pub use error::{ErrorKind, Result, SearchError};
pub use index::{FieldType, IndexManager, IndexSettings, IndexSettingsReport, Mapping, MappingField};
pub use memory::{analyze, MemoryBackend, DEFAULT_SIZE};
pub use query::{BoolQuery, MatchPhraseQuery, MatchQuery, Operator, Query, RangeQuery, TermQuery};
pub use search::{Hit, SearchRequest, SearchResponse};
