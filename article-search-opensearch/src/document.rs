//! Document trait.

use crate::index::Mapping;
use serde::{de::DeserializeOwned, Serialize};

/// A type that can be stored in and read back from a search index.
///
/// The mapping is derived from the type itself, so an index can be created
/// for it without spelling the field types out at the call site.
///
/// # Example
///
/// ```rust
/// use article_search_opensearch::{Document, Mapping, MappingField};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Recipe {
///     title: String,
///     servings: i32,
/// }
///
/// impl Document for Recipe {
///     fn mapping() -> Mapping {
///         Mapping::new()
///             .field("title", MappingField::text())
///             .field("servings", MappingField::integer())
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Field mapping for this document type.
    fn mapping() -> Mapping;
}
