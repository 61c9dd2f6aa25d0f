//! Index settings, mappings and index management over HTTP.

use crate::error::{Result, SearchError};
use article_search_log::{debug, info};
use opensearch::OpenSearch;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Index manager for creating and inspecting indices.
#[derive(Clone)]
pub struct IndexManager {
    client: Arc<OpenSearch>,
}

impl IndexManager {
    pub(crate) fn new(client: Arc<OpenSearch>) -> Self {
        Self { client }
    }

    /// Create a new index.
    ///
    /// Fails with [`SearchError::IndexExists`] when the service reports
    /// `resource_already_exists_exception`, and with
    /// [`SearchError::MappingConflict`] when it rejects the settings or mapping.
    pub async fn create(&self, name: &str, settings: &IndexSettings) -> Result<()> {
        info!("Creating index: {}", name);

        let response = self
            .client
            .indices()
            .create(opensearch::indices::IndicesCreateParts::Index(name))
            .body(settings.to_json())
            .send()
            .await?;

        let status = response.status_code();
        if status.is_success() {
            return Ok(());
        }

        let body: Value = response.json().await?;
        let error_type = body["error"]["type"].as_str().unwrap_or("");

        let reason = SearchError::reason_from_body(&body, "Index creation failed");

        match error_type {
            "resource_already_exists_exception" => Err(SearchError::IndexExists(name.to_string())),
            "mapper_parsing_exception" | "illegal_argument_exception" => {
                Err(SearchError::MappingConflict(reason))
            }
            _ => Err(SearchError::Internal(reason)),
        }
    }

    /// Delete an index.
    pub async fn delete(&self, name: &str) -> Result<()> {
        info!("Deleting index: {}", name);

        let response = self
            .client
            .indices()
            .delete(opensearch::indices::IndicesDeleteParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();

        if status == opensearch::http::StatusCode::NOT_FOUND {
            return Err(SearchError::IndexNotFound(name.to_string()));
        }

        if !status.is_success() {
            let body: Value = response.json().await?;
            return Err(SearchError::Internal(SearchError::reason_from_body(
                &body,
                "Index deletion failed",
            )));
        }

        Ok(())
    }

    /// Check if an index exists.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        debug!("Checking if index exists: {}", name);

        let response = self
            .client
            .indices()
            .exists(opensearch::indices::IndicesExistsParts::Index(&[name]))
            .send()
            .await?;

        Ok(response.status_code().is_success())
    }

    /// Fetch the shard and replica counts the service reports for an index.
    pub async fn settings(&self, name: &str) -> Result<IndexSettingsReport> {
        debug!("Getting settings for index: {}", name);

        let response = self
            .client
            .indices()
            .get_settings(opensearch::indices::IndicesGetSettingsParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();

        if status == opensearch::http::StatusCode::NOT_FOUND {
            return Err(SearchError::IndexNotFound(name.to_string()));
        }

        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(SearchError::Internal(SearchError::reason_from_body(
                &body,
                "Fetching index settings failed",
            )));
        }

        IndexSettingsReport::from_response(name, &body)
    }

    /// Refresh an index so recent writes become searchable.
    pub async fn refresh(&self, name: &str) -> Result<()> {
        debug!("Refreshing index: {}", name);

        let response = self
            .client
            .indices()
            .refresh(opensearch::indices::IndicesRefreshParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();

        if status == opensearch::http::StatusCode::NOT_FOUND {
            return Err(SearchError::IndexNotFound(name.to_string()));
        }

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(SearchError::Internal(SearchError::reason_from_body(
                &body,
                "Index refresh failed",
            )));
        }

        Ok(())
    }
}

/// Settings used when creating an index.
#[derive(Debug, Clone, Default)]
pub struct IndexSettings {
    /// Number of shards.
    pub number_of_shards: Option<u32>,
    /// Number of replicas.
    pub number_of_replicas: Option<u32>,
    /// Field mappings.
    pub mappings: Option<Mapping>,
}

impl IndexSettings {
    /// Create new index settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of shards.
    pub fn shards(mut self, shards: u32) -> Self {
        self.number_of_shards = Some(shards);
        self
    }

    /// Set number of replicas.
    pub fn replicas(mut self, replicas: u32) -> Self {
        self.number_of_replicas = Some(replicas);
        self
    }

    /// Set mappings.
    pub fn mappings(mut self, mappings: Mapping) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Render the create-index request body.
    pub fn to_json(&self) -> Value {
        let mut body = serde_json::Map::new();
        let mut settings = serde_json::Map::new();

        if let Some(shards) = self.number_of_shards {
            settings.insert("number_of_shards".to_string(), json!(shards));
        }
        if let Some(replicas) = self.number_of_replicas {
            settings.insert("number_of_replicas".to_string(), json!(replicas));
        }

        if !settings.is_empty() {
            body.insert("settings".to_string(), Value::Object(settings));
        }

        if let Some(mappings) = &self.mappings {
            body.insert("mappings".to_string(), mappings.to_json());
        }

        Value::Object(body)
    }
}

/// Shard and replica counts as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettingsReport {
    /// Number of primary shards.
    pub number_of_shards: u32,
    /// Number of replicas per shard.
    pub number_of_replicas: u32,
}

impl IndexSettingsReport {
    /// Parse a `GET /{index}/_settings` response.
    ///
    /// The service reports the counts as strings (`"1"`); plain numbers are
    /// accepted too.
    pub fn from_response(name: &str, body: &Value) -> Result<Self> {
        let index = &body[name]["settings"]["index"];
        if index.is_null() {
            return Err(SearchError::IndexNotFound(name.to_string()));
        }

        let count = |key: &str| -> Result<u32> {
            let value = &index[key];
            value
                .as_u64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    SearchError::Internal(format!("Missing or invalid {} for {}", key, name))
                })
        };

        Ok(Self {
            number_of_shards: count("number_of_shards")?,
            number_of_replicas: count("number_of_replicas")?,
        })
    }
}

/// Field mapping configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    /// Field definitions, keyed by field name.
    pub properties: BTreeMap<String, MappingField>,
}

impl Mapping {
    /// Create a new mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, field: MappingField) -> Self {
        self.properties.insert(name.into(), field);
        self
    }

    /// Type of a top-level field, if mapped.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.properties.get(name).map(|f| f.field_type)
    }

    /// Render the `mappings` object.
    pub fn to_json(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, field)| (name.clone(), field.to_json()))
            .collect();

        json!({ "properties": properties })
    }
}

/// Field mapping definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingField {
    /// Field type.
    pub field_type: FieldType,
    /// Values longer than this are not indexed (keyword fields).
    pub ignore_above: Option<u32>,
    /// Multi-fields indexing the same value another way.
    pub fields: BTreeMap<String, MappingField>,
}

impl MappingField {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            ignore_above: None,
            fields: BTreeMap::new(),
        }
    }

    /// Full-text field.
    pub fn text() -> Self {
        Self::of(FieldType::Text)
    }

    /// Exact-value field.
    pub fn keyword() -> Self {
        Self::of(FieldType::Keyword)
    }

    /// 32-bit integer field.
    pub fn integer() -> Self {
        Self::of(FieldType::Integer)
    }

    /// Date field.
    pub fn date() -> Self {
        Self::of(FieldType::Date)
    }

    /// Text field with a `keyword` sub-field, the default mapping for strings.
    pub fn text_with_keyword() -> Self {
        Self::text().sub_field("keyword", Self::keyword().ignore_above(256))
    }

    /// Set `ignore_above`.
    pub fn ignore_above(mut self, length: u32) -> Self {
        self.ignore_above = Some(length);
        self
    }

    /// Add a multi-field.
    pub fn sub_field(mut self, name: impl Into<String>, field: MappingField) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    fn to_json(&self) -> Value {
        let mut field = serde_json::Map::new();

        field.insert("type".to_string(), json!(self.field_type.as_str()));

        if let Some(length) = self.ignore_above {
            field.insert("ignore_above".to_string(), json!(length));
        }
        if !self.fields.is_empty() {
            let fields: serde_json::Map<String, Value> = self
                .fields
                .iter()
                .map(|(name, sub)| (name.clone(), sub.to_json()))
                .collect();
            field.insert("fields".to_string(), Value::Object(fields));
        }

        Value::Object(field)
    }
}

/// Field types used by the demo's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Analyzed full-text field.
    Text,
    /// Exact match keyword field.
    Keyword,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Double precision float.
    Double,
    /// Boolean.
    Boolean,
    /// Date.
    Date,
}

impl FieldType {
    /// Name used in mapping JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        }
    }
}
