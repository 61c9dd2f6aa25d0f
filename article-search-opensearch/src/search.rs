//! Search requests and responses.

use crate::{
    error::{Result, SearchError},
    query::Query,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// A complete search: which index, which query, how many hits.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Target index. `None` means the backend's default index.
    pub index: Option<String>,
    /// The query.
    pub query: Query,
    /// Maximum number of hits. `None` leaves the service default in place.
    pub size: Option<u64>,
}

impl SearchRequest {
    /// Search the default index with `query`.
    pub fn new(query: Query) -> Self {
        Self {
            index: None,
            query,
            size: None,
        }
    }

    /// Target a specific index.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Limit the number of hits.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Render the `_search` request body.
    pub fn to_body(&self) -> Value {
        let mut body = json!({ "query": self.query.to_json() });
        if let Some(size) = self.size {
            body["size"] = json!(size);
        }
        body
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Document ID.
    pub id: String,
    /// Index the document lives in.
    pub index: String,
    /// Relevance score.
    pub score: Option<f64>,
    /// The stored document.
    pub source: Value,
}

/// Search response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Total matching documents.
    pub total: u64,
    /// Time taken in milliseconds.
    pub took_ms: u64,
    /// Returned hits, in the order the backend ranked them.
    pub hits: Vec<Hit>,
}

impl SearchResponse {
    /// Parse a `_search` response body.
    pub fn from_json(body: &Value) -> Result<Self> {
        let mut hits = Vec::new();

        if let Some(raw_hits) = body["hits"]["hits"].as_array() {
            for hit in raw_hits {
                let source = hit
                    .get("_source")
                    .cloned()
                    .ok_or_else(|| SearchError::Internal("Missing _source in hit".to_string()))?;

                hits.push(Hit {
                    id: hit["_id"].as_str().unwrap_or_default().to_string(),
                    index: hit["_index"].as_str().unwrap_or_default().to_string(),
                    score: hit["_score"].as_f64(),
                    source,
                });
            }
        }

        // Older engines report `total` as a bare number.
        let total = body["hits"]["total"]["value"]
            .as_u64()
            .or_else(|| body["hits"]["total"].as_u64())
            .unwrap_or(hits.len() as u64);

        Ok(Self {
            total,
            took_ms: body["took"].as_u64().unwrap_or(0),
            hits,
        })
    }

    /// Deserialize every hit's source.
    pub fn documents<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.hits
            .iter()
            .map(|hit| serde_json::from_value(hit.source.clone()).map_err(SearchError::from))
            .collect()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Note {
        text: String,
    }

    #[test]
    fn test_request_body() {
        let request = SearchRequest::new(Query::term("text", "a")).size(5);
        assert_eq!(
            request.to_body(),
            json!({ "query": { "term": { "text": { "value": "a" } } }, "size": 5 })
        );
        assert_eq!(request.index, None);
    }

    #[test]
    fn test_parse_response() {
        let body = json!({
            "took": 3,
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_index": "notes", "_id": "1", "_score": 1.5, "_source": { "text": "one" } },
                    { "_index": "notes", "_id": "2", "_score": 0.5, "_source": { "text": "two" } }
                ]
            }
        });

        let response = SearchResponse::from_json(&body).unwrap();
        assert_eq!(response.total, 2);
        assert_eq!(response.took_ms, 3);
        assert_eq!(response.hits[0].id, "1");
        assert_eq!(response.hits[1].score, Some(0.5));

        let notes: Vec<Note> = response.documents().unwrap();
        assert_eq!(
            notes,
            vec![Note { text: "one".into() }, Note { text: "two".into() }]
        );
    }

    #[test]
    fn test_parse_empty_response() {
        let body = json!({ "took": 1, "hits": { "total": 0, "hits": [] } });
        let response = SearchResponse::from_json(&body).unwrap();
        assert!(response.is_empty());
        assert_eq!(response.total, 0);
    }

    #[test]
    fn test_hit_without_source_is_an_error() {
        let body = json!({ "hits": { "hits": [ { "_id": "1" } ] } });
        assert!(SearchResponse::from_json(&body).is_err());
    }
}
