//! The article document.

use article_search_opensearch::{Document, Mapping, MappingField};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Field names as stored in the index.
pub mod fields {
    /// Authoring user.
    pub const USER_ID: &str = "userId";
    /// Authoring timestamp.
    pub const ARTICLE_DATE: &str = "articleDate";
    /// Searchable body.
    pub const ARTICLE_TEXT: &str = "articleText";
}

/// An article written by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Authoring user.
    pub user_id: i32,
    /// When the article was written.
    pub article_date: DateTime<Utc>,
    /// Free-text body.
    pub article_text: String,
}

impl Article {
    /// Create an article.
    pub fn new(user_id: i32, article_date: DateTime<Utc>, article_text: impl Into<String>) -> Self {
        Self {
            user_id,
            article_date,
            article_text: article_text.into(),
        }
    }

    /// The three sample articles, dated relative to `now`.
    pub fn samples(now: DateTime<Utc>) -> Vec<Article> {
        vec![
            Article::new(1, now, "This is an article text."),
            Article::new(
                2,
                now - Duration::days(2),
                "This is an article text from the past.",
            ),
            Article::new(
                2,
                now + Duration::days(5),
                "This is an article text from the future.",
            ),
        ]
    }
}

impl Document for Article {
    fn mapping() -> Mapping {
        Mapping::new()
            .field(fields::USER_ID, MappingField::integer())
            .field(fields::ARTICLE_DATE, MappingField::date())
            .field(fields::ARTICLE_TEXT, MappingField::text_with_keyword())
    }
}
