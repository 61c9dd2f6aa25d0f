//! Query DSL as plain data.
//!
//! Queries are values, not builder chains: a [`Query`] can be inspected and
//! compared in tests, rendered to the engine's JSON with [`Query::to_json`],
//! or evaluated directly by the embedded backend.

use serde_json::{json, Value};

/// Query types understood by both backends.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Match all documents.
    MatchAll,
    /// Exact token lookup. The value is not analyzed.
    Term(TermQuery),
    /// Analyzed full-text match.
    Match(MatchQuery),
    /// Analyzed tokens must appear contiguously and in order.
    MatchPhrase(MatchPhraseQuery),
    /// Numeric or date range.
    Range(RangeQuery),
    /// Compound query.
    Bool(BoolQuery),
}

impl Query {
    /// Term query on a field.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term(TermQuery::new(field, value))
    }

    /// Match query on a field.
    pub fn match_text(field: impl Into<String>, query: impl Into<String>) -> Self {
        Query::Match(MatchQuery::new(field, query))
    }

    /// Phrase match on a field.
    pub fn match_phrase(field: impl Into<String>, phrase: impl Into<String>) -> Self {
        Query::MatchPhrase(MatchPhraseQuery::new(field, phrase))
    }

    /// Render the query in the engine's JSON DSL.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Term(t) => t.to_json(),
            Query::Match(m) => m.to_json(),
            Query::MatchPhrase(p) => p.to_json(),
            Query::Range(r) => r.to_json(),
            Query::Bool(b) => b.to_json(),
        }
    }
}

impl From<RangeQuery> for Query {
    fn from(range: RangeQuery) -> Self {
        Query::Range(range)
    }
}

impl From<BoolQuery> for Query {
    fn from(bool_query: BoolQuery) -> Self {
        Query::Bool(bool_query)
    }
}

/// Term query for exact matching.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    /// Field name.
    pub field: String,
    /// Exact value to match.
    pub value: Value,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({ "term": { &self.field: { "value": self.value } } })
    }
}

/// Match query for full-text search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    /// Field to search.
    pub field: String,
    /// Search text.
    pub query: String,
    /// `and` requires every token; the engine default is `or`.
    pub operator: Option<Operator>,
}

impl MatchQuery {
    /// Create a new match query.
    pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: query.into(),
            operator: None,
        }
    }

    /// Set the operator.
    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    fn to_json(&self) -> Value {
        let mut query = json!({ "query": self.query });

        if let Some(op) = self.operator {
            query["operator"] = json!(op.as_str());
        }

        json!({ "match": { &self.field: query } })
    }
}

/// Boolean operator between the tokens of a match query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Any token.
    Or,
    /// Every token.
    And,
}

impl Operator {
    fn as_str(&self) -> &'static str {
        match self {
            Operator::Or => "or",
            Operator::And => "and",
        }
    }
}

/// Phrase match query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPhraseQuery {
    /// Field to search.
    pub field: String,
    /// Phrase text.
    pub query: String,
}

impl MatchPhraseQuery {
    /// Create a new phrase query.
    pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: query.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({ "match_phrase": { &self.field: { "query": self.query } } })
    }
}

/// Range query for numeric/date ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    /// Field name.
    pub field: String,
    /// Greater than.
    pub gt: Option<Value>,
    /// Greater than or equal.
    pub gte: Option<Value>,
    /// Less than.
    pub lt: Option<Value>,
    /// Less than or equal.
    pub lte: Option<Value>,
}

impl RangeQuery {
    /// Create an unbounded range query.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            gt: None,
            gte: None,
            lt: None,
            lte: None,
        }
    }

    /// Set greater than.
    pub fn gt(mut self, value: impl Into<Value>) -> Self {
        self.gt = Some(value.into());
        self
    }

    /// Set greater than or equal.
    pub fn gte(mut self, value: impl Into<Value>) -> Self {
        self.gte = Some(value.into());
        self
    }

    /// Set less than.
    pub fn lt(mut self, value: impl Into<Value>) -> Self {
        self.lt = Some(value.into());
        self
    }

    /// Set less than or equal.
    pub fn lte(mut self, value: impl Into<Value>) -> Self {
        self.lte = Some(value.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut range = serde_json::Map::new();

        for (key, bound) in [
            ("gt", &self.gt),
            ("gte", &self.gte),
            ("lt", &self.lt),
            ("lte", &self.lte),
        ] {
            if let Some(v) = bound {
                range.insert(key.to_string(), v.clone());
            }
        }

        json!({ "range": { &self.field: range } })
    }
}

/// Bool query for combining queries.
///
/// `must` clauses contribute to the score, `filter` clauses only decide
/// inclusion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    /// Must match (AND, scored).
    pub must: Vec<Query>,
    /// Should match (OR).
    pub should: Vec<Query>,
    /// Must not match (NOT).
    pub must_not: Vec<Query>,
    /// Must match (AND, not scored).
    pub filter: Vec<Query>,
}

impl BoolQuery {
    /// Create an empty bool query.
    pub fn new() -> Self {
        Self::default()
    }

    fn to_json(&self) -> Value {
        let mut bool_query = serde_json::Map::new();

        for (key, clauses) in [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
            ("filter", &self.filter),
        ] {
            if !clauses.is_empty() {
                bool_query.insert(
                    key.to_string(),
                    Value::Array(clauses.iter().map(Query::to_json).collect()),
                );
            }
        }

        json!({ "bool": bool_query })
    }
}
