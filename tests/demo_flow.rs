//! End-to-end demo flows against the in-memory backend.

use article_search::{
    bootstrap_index, build_backend, run_demo, seed_articles, Article, BackendKind, DemoConfig,
    DemoError, QueryRunner,
};
use article_search_opensearch::{
    index_document, IndexSettings, IndexSettingsReport, MemoryBackend, SearchBackend, SearchError,
    SearchRequest, SearchResponse,
};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

const INDEX: &str = "simply-recipes";

fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out).lines().map(str::to_string).collect()
}

fn separator() -> String {
    "-".repeat(40)
}

async fn seeded_backend() -> MemoryBackend {
    let backend = MemoryBackend::new(INDEX);
    bootstrap_index::<Article>(&backend, INDEX, 1, 1).await.unwrap();
    seed_articles(&backend, INDEX, Utc::now()).await.unwrap();
    backend
}

fn memory_config(seed_data: bool) -> DemoConfig {
    DemoConfig {
        backend: BackendKind::Memory,
        index: INDEX.to_string(),
        seed_data,
        ..DemoConfig::default()
    }
}

// =============================================================================
// Query runners
// =============================================================================

#[tokio::test]
async fn test_term_query_returns_every_sample() {
    let backend = seeded_backend().await;
    let mut out = Vec::new();

    let count = QueryRunner::Term.run(&backend, Utc::now(), &mut out).await.unwrap();

    assert_eq!(count, 3);
    let printed = lines(&out);
    assert_eq!(printed.len(), 4);
    assert!(printed.contains(&"This is an article text.".to_string()));
    assert!(printed.contains(&"This is an article text from the past.".to_string()));
    assert!(printed.contains(&"This is an article text from the future.".to_string()));
    assert_eq!(printed[3], separator());
}

#[tokio::test]
async fn test_phrase_query_returns_only_past_article() {
    let backend = seeded_backend().await;
    let mut out = Vec::new();

    let count = QueryRunner::Phrase.run(&backend, Utc::now(), &mut out).await.unwrap();

    assert_eq!(count, 1);
    assert_eq!(
        lines(&out),
        vec!["This is an article text from the past.".to_string(), separator()]
    );
}

#[tokio::test]
async fn test_filtered_query_keeps_only_later_articles() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let backend = MemoryBackend::new(INDEX);
    bootstrap_index::<Article>(&backend, INDEX, 1, 1).await.unwrap();

    index_document(&backend, INDEX, &Article::new(2, now - Duration::days(2), "An article from before"))
        .await
        .unwrap();
    index_document(&backend, INDEX, &Article::new(2, now + Duration::days(5), "An article from later"))
        .await
        .unwrap();
    backend.refresh(INDEX).await.unwrap();

    let mut out = Vec::new();
    let count = QueryRunner::Filtered.run(&backend, now, &mut out).await.unwrap();

    assert_eq!(count, 1);
    assert_eq!(lines(&out), vec!["An article from later".to_string(), separator()]);
}

#[tokio::test]
async fn test_filtered_query_without_future_articles_prints_only_separator() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let backend = MemoryBackend::new(INDEX);
    bootstrap_index::<Article>(&backend, INDEX, 1, 1).await.unwrap();

    index_document(&backend, INDEX, &Article::new(1, now, "An article from today"))
        .await
        .unwrap();
    index_document(&backend, INDEX, &Article::new(2, now - Duration::days(2), "An article from before"))
        .await
        .unwrap();

    let mut out = Vec::new();
    let count = QueryRunner::Filtered.run(&backend, now, &mut out).await.unwrap();

    assert_eq!(count, 0);
    assert_eq!(lines(&out), vec![separator()]);
}

#[tokio::test]
async fn test_runner_on_empty_index_prints_only_separator() {
    let backend = MemoryBackend::new(INDEX);
    bootstrap_index::<Article>(&backend, INDEX, 1, 1).await.unwrap();

    for runner in QueryRunner::ALL {
        let mut out = Vec::new();
        let count = runner.run(&backend, Utc::now(), &mut out).await.unwrap();
        assert_eq!(count, 0);
        assert_eq!(lines(&out), vec![separator()]);
    }
}

#[tokio::test]
async fn test_runner_on_missing_index_fails_with_not_found() {
    let backend = MemoryBackend::new(INDEX);
    let mut out = Vec::new();

    let err = QueryRunner::Term.run(&backend, Utc::now(), &mut out).await.unwrap_err();

    assert!(matches!(err, DemoError::Search(SearchError::IndexNotFound(_))));
    assert!(out.is_empty());
}

// =============================================================================
// Bootstrap
// =============================================================================

#[tokio::test]
async fn test_bootstrap_reports_requested_counts() {
    let backend = MemoryBackend::new(INDEX);
    bootstrap_index::<Article>(&backend, INDEX, 1, 1).await.unwrap();

    let report = backend.index_settings(INDEX).await.unwrap();
    assert_eq!(
        report,
        IndexSettingsReport {
            number_of_shards: 1,
            number_of_replicas: 1
        }
    );
}

#[tokio::test]
async fn test_second_bootstrap_reports_index_exists() {
    let backend = MemoryBackend::new(INDEX);
    bootstrap_index::<Article>(&backend, INDEX, 1, 1).await.unwrap();

    let err = bootstrap_index::<Article>(&backend, INDEX, 3, 0).await.unwrap_err();

    assert!(matches!(err, SearchError::IndexExists(ref name) if name == INDEX));
    let report = backend.index_settings(INDEX).await.unwrap();
    assert_eq!(report.number_of_shards, 1);
}

#[tokio::test]
async fn test_seeding_inserts_three_articles() {
    let backend = MemoryBackend::new(INDEX);
    bootstrap_index::<Article>(&backend, INDEX, 1, 1).await.unwrap();

    let ids = seed_articles(&backend, INDEX, Utc::now()).await.unwrap();

    assert_eq!(ids.len(), 3);
    assert_eq!(backend.document_count(INDEX), 3);
}

// =============================================================================
// Full runs
// =============================================================================

#[tokio::test]
async fn test_demo_run_with_seed_data() {
    let config = memory_config(true);
    let backend = MemoryBackend::new(INDEX);
    let mut out = Vec::new();

    let summary = run_demo(&config, &backend, &mut out).await.unwrap();

    assert!(summary.index_created);
    assert_eq!(summary.seeded, 3);
    assert_eq!(
        summary.hits,
        vec![
            (QueryRunner::Term, 3),
            (QueryRunner::Phrase, 1),
            (QueryRunner::Filtered, 1),
        ]
    );

    let printed = lines(&out);
    assert_eq!(printed[0], "Data inserted.");
    // 1 + (3 + 1) + (1 + 1) + (1 + 1)
    assert_eq!(printed.len(), 9);
    assert_eq!(printed[6], separator());
    assert_eq!(printed[7], "This is an article text from the future.");
    assert_eq!(printed[8], separator());
}

#[tokio::test]
async fn test_demo_run_without_seed_data_prints_three_separators() {
    let config = memory_config(false);
    let backend = MemoryBackend::new(INDEX);
    let mut out = Vec::new();

    let summary = run_demo(&config, &backend, &mut out).await.unwrap();

    assert_eq!(summary.seeded, 0);
    assert_eq!(lines(&out), vec![separator(), separator(), separator()]);
}

#[tokio::test]
async fn test_demo_rerun_keeps_existing_index() {
    let backend = MemoryBackend::new(INDEX);

    run_demo(&memory_config(true), &backend, &mut Vec::new()).await.unwrap();

    let mut out = Vec::new();
    let summary = run_demo(&memory_config(false), &backend, &mut out).await.unwrap();

    assert!(!summary.index_created);
    assert_eq!(summary.hits[0], (QueryRunner::Term, 3));
}

/// Delegates to a memory backend but rejects every search.
struct RejectingSearch {
    inner: MemoryBackend,
}

#[async_trait]
impl SearchBackend for RejectingSearch {
    async fn create_index(&self, name: &str, settings: &IndexSettings) -> article_search_opensearch::Result<()> {
        self.inner.create_index(name, settings).await
    }

    async fn delete_index(&self, name: &str) -> article_search_opensearch::Result<()> {
        self.inner.delete_index(name).await
    }

    async fn index_exists(&self, name: &str) -> article_search_opensearch::Result<bool> {
        self.inner.index_exists(name).await
    }

    async fn index_settings(&self, name: &str) -> article_search_opensearch::Result<IndexSettingsReport> {
        self.inner.index_settings(name).await
    }

    async fn index_json(&self, index: &str, document: &Value) -> article_search_opensearch::Result<String> {
        self.inner.index_json(index, document).await
    }

    async fn refresh(&self, index: &str) -> article_search_opensearch::Result<()> {
        self.inner.refresh(index).await
    }

    async fn search(&self, _request: &SearchRequest) -> article_search_opensearch::Result<SearchResponse> {
        Err(SearchError::Query("failed to parse query".to_string()))
    }

    fn default_index(&self) -> &str {
        self.inner.default_index()
    }
}

#[tokio::test]
async fn test_failing_runners_are_reported_together() {
    let backend = RejectingSearch {
        inner: MemoryBackend::new(INDEX),
    };
    let mut out = Vec::new();

    let err = run_demo(&memory_config(true), &backend, &mut out).await.unwrap_err();

    match err {
        DemoError::RunnersFailed { failed } => {
            assert_eq!(failed, vec!["term", "phrase", "filter"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    // Seeding still happened before the runners.
    assert_eq!(lines(&out), vec!["Data inserted.".to_string()]);
    assert_eq!(backend.inner.document_count(INDEX), 3);
}

#[tokio::test]
async fn test_dry_run_backend_needs_no_server() {
    let config = DemoConfig {
        url: String::new(),
        ..memory_config(true)
    };
    config.validate().unwrap();

    let backend = build_backend(&config).unwrap();
    assert_eq!(backend.default_index(), INDEX);

    let summary = run_demo(&config, backend.as_ref(), &mut Vec::new()).await.unwrap();
    assert_eq!(summary.seeded, 3);
}
