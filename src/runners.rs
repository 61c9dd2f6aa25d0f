//! The three canned queries.
//!
//! Each runner is split into a pure request builder and an execution step,
//! so the query shape can be checked without a backend.

use crate::{
    article::{fields, Article},
    error::Result,
    output,
};
use article_search_log::debug;
use article_search_opensearch::{search_documents, BoolQuery, Query, RangeQuery, SearchBackend, SearchRequest};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

/// Token looked up by the term query.
pub const TERM_VALUE: &str = "article";

/// Phrase matched by the phrase query.
pub const PHRASE_VALUE: &str = "past";

/// Text matched by the filtered query's `must` clause.
pub const FILTER_MATCH_VALUE: &str = "article";

/// Exact term lookup of `"article"` in the article text.
pub fn term_request() -> SearchRequest {
    SearchRequest::new(Query::term(fields::ARTICLE_TEXT, TERM_VALUE))
}

/// Phrase match of `"past"` in the article text.
pub fn phrase_request() -> SearchRequest {
    SearchRequest::new(Query::match_phrase(fields::ARTICLE_TEXT, PHRASE_VALUE))
}

/// Articles matching `"article"` and dated strictly after `now`.
///
/// The cutoff is the instant the request is built, so the result depends on
/// when the demo runs relative to when the data was inserted.
pub fn filtered_request(now: DateTime<Utc>) -> SearchRequest {
    let cutoff = now.to_rfc3339_opts(SecondsFormat::AutoSi, true);

    SearchRequest::new(
        BoolQuery {
            must: vec![Query::match_text(fields::ARTICLE_TEXT, FILTER_MATCH_VALUE)],
            filter: vec![RangeQuery::new(fields::ARTICLE_DATE).gt(cutoff).into()],
            ..BoolQuery::default()
        }
        .into(),
    )
}

/// The demo's query runners, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRunner {
    /// Term query.
    Term,
    /// Phrase match.
    Phrase,
    /// Match plus date-range filter.
    Filtered,
}

impl QueryRunner {
    /// Every runner, in execution order.
    pub const ALL: [QueryRunner; 3] = [QueryRunner::Term, QueryRunner::Phrase, QueryRunner::Filtered];

    /// Short name for logs and error reports.
    pub fn name(&self) -> &'static str {
        match self {
            QueryRunner::Term => "term",
            QueryRunner::Phrase => "phrase",
            QueryRunner::Filtered => "filter",
        }
    }

    /// Heading logged before the results.
    pub fn heading(&self) -> &'static str {
        match self {
            QueryRunner::Term => "Term query results",
            QueryRunner::Phrase => "Match query results",
            QueryRunner::Filtered => "Filter query results",
        }
    }

    /// The request this runner sends. `now` only affects the filtered query.
    pub fn request(&self, now: DateTime<Utc>) -> SearchRequest {
        match self {
            QueryRunner::Term => term_request(),
            QueryRunner::Phrase => phrase_request(),
            QueryRunner::Filtered => filtered_request(now),
        }
    }

    /// Fetch the matching articles.
    pub async fn fetch(&self, backend: &dyn SearchBackend, now: DateTime<Utc>) -> Result<Vec<Article>> {
        let request = self.request(now);
        debug!("Running {} query: {}", self.name(), request.to_body());
        Ok(search_documents::<Article>(backend, &request).await?)
    }

    /// Fetch the matching articles and print them. Returns the hit count.
    pub async fn run<W: Write>(
        &self,
        backend: &dyn SearchBackend,
        now: DateTime<Utc>,
        out: &mut W,
    ) -> Result<usize> {
        let articles = self.fetch(backend, now).await?;
        output::write_results(out, &articles)?;
        Ok(articles.len())
    }
}

impl std::fmt::Display for QueryRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
