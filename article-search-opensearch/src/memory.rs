//! Embedded in-process search backend.
//!
//! Evaluates the same [`Query`] values the HTTP client sends, against
//! documents kept in memory. Text analysis is a plain lowercase split on
//! non-alphanumeric characters, which agrees with the engine's standard
//! analyzer for the ASCII sentences the demo stores. There is no ranking:
//! every hit scores `1.0` and hits come back in insertion order.

use crate::{
    backend::SearchBackend,
    error::{Result, SearchError},
    index::{FieldType, IndexSettings, IndexSettingsReport, Mapping},
    query::{BoolQuery, MatchQuery, Operator, Query, RangeQuery, TermQuery},
    search::{Hit, SearchRequest, SearchResponse},
};
use article_search_log::debug;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Hits returned when a request sets no size, matching the engine default.
pub const DEFAULT_SIZE: u64 = 10;

#[derive(Debug, Default)]
struct StoredIndex {
    report: Option<IndexSettingsReport>,
    mapping: Mapping,
    documents: Vec<(String, Value)>,
}

/// Search backend holding every index in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    default_index: String,
    indices: RwLock<HashMap<String, StoredIndex>>,
    next_id: AtomicU64,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new(default_index: impl Into<String>) -> Self {
        Self {
            default_index: default_index.into(),
            indices: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of documents stored in an index.
    pub fn document_count(&self, index: &str) -> usize {
        self.indices
            .read()
            .get(index)
            .map(|stored| stored.documents.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    async fn create_index(&self, name: &str, settings: &IndexSettings) -> Result<()> {
        let mut indices = self.indices.write();

        if indices.contains_key(name) {
            return Err(SearchError::IndexExists(name.to_string()));
        }

        debug!("Creating in-memory index: {}", name);

        indices.insert(
            name.to_string(),
            StoredIndex {
                report: Some(IndexSettingsReport {
                    number_of_shards: settings.number_of_shards.unwrap_or(1),
                    number_of_replicas: settings.number_of_replicas.unwrap_or(1),
                }),
                mapping: settings.mappings.clone().unwrap_or_default(),
                documents: Vec::new(),
            },
        );

        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        self.indices
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| SearchError::IndexNotFound(name.to_string()))
    }

    async fn index_exists(&self, name: &str) -> Result<bool> {
        Ok(self.indices.read().contains_key(name))
    }

    async fn index_settings(&self, name: &str) -> Result<IndexSettingsReport> {
        let indices = self.indices.read();
        let stored = indices
            .get(name)
            .ok_or_else(|| SearchError::IndexNotFound(name.to_string()))?;

        Ok(stored.report.unwrap_or(IndexSettingsReport {
            number_of_shards: 1,
            number_of_replicas: 1,
        }))
    }

    async fn index_json(&self, index: &str, document: &Value) -> Result<String> {
        if !document.is_object() {
            return Err(SearchError::Validation(
                "Document must be a JSON object".to_string(),
            ));
        }

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst).to_string();
        debug!("Storing document {} in in-memory index {}", id, index);

        // Writing to a missing index creates it, as the engine does.
        self.indices
            .write()
            .entry(index.to_string())
            .or_default()
            .documents
            .push((id.clone(), document.clone()));

        Ok(id)
    }

    async fn refresh(&self, index: &str) -> Result<()> {
        if self.indices.read().contains_key(index) {
            Ok(())
        } else {
            Err(SearchError::IndexNotFound(index.to_string()))
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let index = request.index.as_deref().unwrap_or(&self.default_index);
        let indices = self.indices.read();
        let stored = indices
            .get(index)
            .ok_or_else(|| SearchError::IndexNotFound(index.to_string()))?;

        let matched: Vec<&(String, Value)> = stored
            .documents
            .iter()
            .filter(|(_, doc)| matches(&request.query, doc, &stored.mapping))
            .collect();

        let limit = request.size.unwrap_or(DEFAULT_SIZE) as usize;
        let hits = matched
            .iter()
            .take(limit)
            .map(|(id, doc)| Hit {
                id: id.clone(),
                index: index.to_string(),
                score: Some(1.0),
                source: doc.clone(),
            })
            .collect();

        Ok(SearchResponse {
            total: matched.len() as u64,
            took_ms: 0,
            hits,
        })
    }

    fn default_index(&self) -> &str {
        &self.default_index
    }
}

// ============================================================================
// Query evaluation
// ============================================================================

/// Split text into lowercase alphanumeric tokens.
pub fn analyze(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn matches(query: &Query, doc: &Value, mapping: &Mapping) -> bool {
    match query {
        Query::MatchAll => true,
        Query::Term(term) => matches_term(term, doc, mapping),
        Query::Match(m) => matches_text(m, doc, mapping),
        Query::MatchPhrase(phrase) => {
            let Some((value, FieldType::Text)) = resolve(&phrase.field, doc, mapping) else {
                return false;
            };
            let wanted = analyze(&phrase.query);
            let tokens = value.as_str().map(analyze).unwrap_or_default();
            !wanted.is_empty() && tokens.windows(wanted.len()).any(|w| w == wanted.as_slice())
        }
        Query::Range(range) => matches_range(range, doc, mapping),
        Query::Bool(b) => matches_bool(b, doc, mapping),
    }
}

/// Locate a field's value and its type. `name.sub` addresses a multi-field.
fn resolve<'a>(field: &str, doc: &'a Value, mapping: &Mapping) -> Option<(&'a Value, FieldType)> {
    if let Some(value) = doc.get(field) {
        let field_type = mapping
            .field_type(field)
            .unwrap_or_else(|| infer_type(value));
        return Some((value, field_type));
    }

    let (base, sub) = field.split_once('.')?;
    let value = doc.get(base)?;
    let field_type = match mapping.properties.get(base) {
        Some(mapped) => mapped.fields.get(sub)?.field_type,
        // Dynamically mapped strings get a `keyword` sub-field.
        None if sub == "keyword" && value.is_string() => FieldType::Keyword,
        None => return None,
    };
    Some((value, field_type))
}

fn infer_type(value: &Value) -> FieldType {
    match value {
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => FieldType::Long,
        Value::Number(_) => FieldType::Double,
        Value::String(s) if parse_date(s).is_some() => FieldType::Date,
        _ => FieldType::Text,
    }
}

fn matches_term(term: &TermQuery, doc: &Value, mapping: &Mapping) -> bool {
    let Some((value, field_type)) = resolve(&term.field, doc, mapping) else {
        return false;
    };

    match field_type {
        FieldType::Text => match (value.as_str(), term.value.as_str()) {
            (Some(text), Some(wanted)) => analyze(text).iter().any(|token| token == wanted),
            _ => false,
        },
        _ => compare(value, &term.value, field_type) == Some(Ordering::Equal),
    }
}

fn matches_text(query: &MatchQuery, doc: &Value, mapping: &Mapping) -> bool {
    let Some((value, field_type)) = resolve(&query.field, doc, mapping) else {
        return false;
    };

    if field_type != FieldType::Text {
        let wanted = Value::String(query.query.clone());
        return compare(value, &wanted, field_type) == Some(Ordering::Equal);
    }

    let tokens = value.as_str().map(analyze).unwrap_or_default();
    let wanted = analyze(&query.query);
    let mut hits = wanted.iter().map(|w| tokens.contains(w));

    match query.operator.unwrap_or(Operator::Or) {
        Operator::Or => hits.any(|hit| hit),
        Operator::And => !wanted.is_empty() && hits.all(|hit| hit),
    }
}

fn matches_range(range: &RangeQuery, doc: &Value, mapping: &Mapping) -> bool {
    let Some((value, field_type)) = resolve(&range.field, doc, mapping) else {
        return false;
    };

    let check = |bound: &Option<Value>, accept: fn(Ordering) -> bool| match bound {
        Some(bound) => compare(value, bound, field_type).is_some_and(accept),
        None => true,
    };

    check(&range.gt, Ordering::is_gt)
        && check(&range.gte, Ordering::is_ge)
        && check(&range.lt, Ordering::is_lt)
        && check(&range.lte, Ordering::is_le)
}

fn matches_bool(query: &BoolQuery, doc: &Value, mapping: &Mapping) -> bool {
    let all = |clauses: &[Query]| clauses.iter().all(|q| matches(q, doc, mapping));

    if !all(&query.must) || !all(&query.filter) {
        return false;
    }
    if query.must_not.iter().any(|q| matches(q, doc, mapping)) {
        return false;
    }

    let should_required = query.must.is_empty() && query.filter.is_empty();
    if should_required && !query.should.is_empty() {
        return query.should.iter().any(|q| matches(q, doc, mapping));
    }

    true
}

/// Order a stored value against a query value, or `None` if incomparable.
fn compare(value: &Value, other: &Value, field_type: FieldType) -> Option<Ordering> {
    match field_type {
        FieldType::Date => Some(to_instant(value)?.cmp(&to_instant(other)?)),
        FieldType::Integer | FieldType::Long | FieldType::Double => {
            to_number(value)?.partial_cmp(&to_number(other)?)
        }
        FieldType::Boolean => Some(value.as_bool()?.cmp(&other.as_bool()?)),
        FieldType::Keyword | FieldType::Text => Some(value.as_str()?.cmp(other.as_str()?)),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Dates are RFC 3339 strings or epoch milliseconds.
fn to_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        _ => None,
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MappingField;
    use serde_json::json;

    fn mapping() -> Mapping {
        Mapping::new()
            .field("body", MappingField::text_with_keyword())
            .field("published", MappingField::date())
            .field("views", MappingField::integer())
    }

    fn doc(body: &str, published: &str, views: i64) -> Value {
        json!({ "body": body, "published": published, "views": views })
    }

    #[test]
    fn test_analyze() {
        assert_eq!(
            analyze("This is an article text from the past."),
            vec!["this", "is", "an", "article", "text", "from", "the", "past"]
        );
        assert!(analyze(" ... ").is_empty());
    }

    #[test]
    fn test_term_is_not_analyzed() {
        let d = doc("An Article", "2024-01-01T00:00:00Z", 1);
        assert!(matches(&Query::term("body", "article"), &d, &mapping()));
        assert!(!matches(&Query::term("body", "Article"), &d, &mapping()));
        assert!(matches(&Query::term("body.keyword", "An Article"), &d, &mapping()));
        assert!(matches(&Query::term("views", 1), &d, &mapping()));
    }

    #[test]
    fn test_match_operators() {
        let d = doc("red green", "2024-01-01T00:00:00Z", 1);
        assert!(matches(&Query::match_text("body", "Blue GREEN"), &d, &mapping()));
        let and = Query::Match(MatchQuery::new("body", "blue green").operator(Operator::And));
        assert!(!matches(&and, &d, &mapping()));
        assert!(!matches(&Query::match_text("body", "!!"), &d, &mapping()));
    }

    #[test]
    fn test_phrase_requires_contiguous_tokens() {
        let d = doc("from the past", "2024-01-01T00:00:00Z", 1);
        assert!(matches(&Query::match_phrase("body", "the past"), &d, &mapping()));
        assert!(!matches(&Query::match_phrase("body", "past the"), &d, &mapping()));
        assert!(!matches(&Query::match_phrase("body", "from past"), &d, &mapping()));
        assert!(!matches(&Query::match_phrase("published", "2024"), &d, &mapping()));
    }

    #[test]
    fn test_range_on_dates_and_numbers() {
        let d = doc("x", "2024-06-01T12:00:00+02:00", 10);

        let after: Query = RangeQuery::new("published").gt("2024-06-01T09:59:59Z").into();
        assert!(matches(&after, &d, &mapping()));

        let same_instant: Query = RangeQuery::new("published").gt("2024-06-01T10:00:00Z").into();
        assert!(!matches(&same_instant, &d, &mapping()));

        let inclusive: Query = RangeQuery::new("published").gte("2024-06-01T10:00:00Z").into();
        assert!(matches(&inclusive, &d, &mapping()));

        let views: Query = RangeQuery::new("views").gte(5).lt(10).into();
        assert!(!matches(&views, &d, &mapping()));
    }

    #[test]
    fn test_bool_clauses() {
        let d = doc("an article", "2024-01-01T00:00:00Z", 3);

        let query: Query = BoolQuery {
            must: vec![Query::match_text("body", "article")],
            must_not: vec![Query::term("views", 4)],
            filter: vec![RangeQuery::new("views").gt(2).into()],
            ..BoolQuery::default()
        }
        .into();
        assert!(matches(&query, &d, &mapping()));

        let only_should: Query = BoolQuery {
            should: vec![Query::term("body", "nothing"), Query::term("body", "an")],
            ..BoolQuery::default()
        }
        .into();
        assert!(matches(&only_should, &d, &mapping()));

        let excluded: Query = BoolQuery {
            must_not: vec![Query::MatchAll],
            ..BoolQuery::default()
        }
        .into();
        assert!(!matches(&excluded, &d, &mapping()));
    }

    #[test]
    fn test_unmapped_fields_use_inferred_types() {
        let d = json!({ "title": "Hello world", "when": "2024-01-01T00:00:00Z" });
        let empty = Mapping::new();
        assert!(matches(&Query::match_text("title", "world"), &d, &empty));
        assert!(matches(&Query::term("title.keyword", "Hello world"), &d, &empty));
        let range: Query = RangeQuery::new("when").lt("2025-01-01T00:00:00Z").into();
        assert!(matches(&range, &d, &empty));
        assert!(!matches(&Query::term("missing", "x"), &d, &empty));
    }

    #[tokio::test]
    async fn test_create_twice_reports_exists() {
        let backend = MemoryBackend::new("notes");
        let settings = IndexSettings::new().shards(2).replicas(0);

        backend.create_index("notes", &settings).await.unwrap();
        let second = backend.create_index("notes", &settings).await;
        assert!(matches!(second, Err(SearchError::IndexExists(name)) if name == "notes"));

        let report = backend.index_settings("notes").await.unwrap();
        assert_eq!(report.number_of_shards, 2);
        assert_eq!(report.number_of_replicas, 0);
    }

    #[tokio::test]
    async fn test_search_respects_size_and_default_index() {
        let backend = MemoryBackend::new("notes");
        for i in 0..12 {
            backend
                .index_json("notes", &json!({ "body": format!("note {}", i) }))
                .await
                .unwrap();
        }

        let response = backend
            .search(&SearchRequest::new(Query::match_text("body", "note")))
            .await
            .unwrap();
        assert_eq!(response.total, 12);
        assert_eq!(response.hits.len(), DEFAULT_SIZE as usize);

        let response = backend
            .search(&SearchRequest::new(Query::MatchAll).size(3))
            .await
            .unwrap();
        assert_eq!(response.hits.len(), 3);
        assert_eq!(response.hits[0].source["body"], "note 0");
    }

    #[tokio::test]
    async fn test_missing_index_errors() {
        let backend = MemoryBackend::new("notes");
        let search = backend.search(&SearchRequest::new(Query::MatchAll)).await;
        assert!(matches!(search, Err(SearchError::IndexNotFound(_))));
        assert!(backend.refresh("notes").await.is_err());
        assert!(backend.delete_index("notes").await.is_err());
        assert!(!backend.index_exists("notes").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_non_object_document() {
        let backend = MemoryBackend::new("notes");
        let result = backend.index_json("notes", &json!("just a string")).await;
        assert!(matches!(result, Err(SearchError::Validation(_))));
        assert_eq!(backend.document_count("notes"), 0);
    }
}
