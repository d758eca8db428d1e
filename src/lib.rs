//! # Kiln - relational object loading for vector object stores
//!
//! Kiln fires flat, prefixed records (`article_title`, `author_name`, ...)
//! into linked objects in an external vector object store: one object per
//! schema class per record, deterministic ids, automatic dedup of objects
//! that repeat across records, and cross-reference edges for every
//! reference property the schema declares.
//!
//! ## Modules
//!
//! - **schema**: tagged schema model parsed once from the store's document
//! - **loader**: the `GraphLoader` - decompose, dedup, link, flush
//! - **store**: the `ObjectStore` seam with in-memory and HTTP backends
//! - **query**: typed builder for nearest-neighbor `Get` queries
//! - **record**: `FlatRecord` and fan-out helpers for multi-valued fields
//!
//! ## Quick start
//!
//! ```rust
//! use kiln::{GraphLoader, MemoryStore};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), kiln::LoadError> {
//! let schema = json!({
//!     "classes": [
//!         {"class": "Article", "properties": [
//!             {"name": "title", "dataType": ["string"]},
//!             {"name": "hasAuthors", "dataType": ["Author"]}
//!         ]},
//!         {"class": "Author", "properties": [
//!             {"name": "name", "dataType": ["string"]},
//!             {"name": "wroteArticles", "dataType": ["Article"]}
//!         ]}
//!     ]
//! });
//!
//! let mut store = MemoryStore::new(schema);
//! {
//!     let mut loader = GraphLoader::new(&mut store, 30)?;
//!     let record = json!({"article_title": "A", "author_name": "Smith"});
//!     loader.load(record.as_object().unwrap())?;
//!     // same author again: the Author object is not re-created
//!     let record = json!({"article_title": "B", "author_name": "Smith"});
//!     loader.load(record.as_object().unwrap())?;
//! }   // dropping the loader flushes the partial batch
//!
//! assert_eq!(store.object_count("Article"), 2);
//! assert_eq!(store.object_count("Author"), 1);
//! assert_eq!(store.references().len(), 4);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::BufRead;

pub mod error;
pub mod loader;
pub mod query;
pub mod record;
pub mod schema;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{LoadError, SchemaError, StoreError};
pub use loader::{object_id, GraphLoader};
pub use query::GetQuery;
pub use record::{explode, split_list, FlatRecord};
pub use schema::{parse_schema, ClassSchema, ReferenceProperty, ScalarProperty, Schema};
pub use store::{HttpStore, MemoryStore, ObjectStore};

/// Main entry point for streams: load newline-delimited JSON records
/// through a loader. Each line must be one object in `FlatRecord` form;
/// blank lines are skipped. Returns the number of records loaded.
pub fn load_ndjson<R: BufRead, S: ObjectStore>(
    reader: R,
    loader: &mut GraphLoader<'_, S>,
) -> Result<usize> {
    let mut loaded = 0;

    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).context("Failed to parse JSON")?;
        let record = value
            .as_object()
            .context("Expected one JSON object per line")?;

        loader.load(record)?;
        loaded += 1;
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_ndjson() {
        let schema = json!({
            "classes": [
                {"class": "Author", "properties": [
                    {"name": "name", "dataType": ["string"]}
                ]}
            ]
        });
        let input = b"{\"author_name\": \"Smith\"}\n\n{\"author_name\": \"Jones\"}\n" as &[u8];

        let mut store = MemoryStore::new(schema);
        {
            let mut loader = GraphLoader::new(&mut store, 30).unwrap();
            let loaded = load_ndjson(input, &mut loader).unwrap();
            assert_eq!(loaded, 2);
        }

        assert_eq!(store.object_count("Author"), 2);
    }
}
