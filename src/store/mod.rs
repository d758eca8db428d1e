//! The external object store seam
//!
//! The loader only ever talks to the store through [`ObjectStore`]: read
//! the schema once, enqueue creations, flush on shutdown. Buffering and
//! auto-submission below the batch threshold are the store's own concern;
//! the loader's only contract with the batch is that [`ObjectStore::flush`]
//! drains it.

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use serde_json::{Map, Value};
use uuid::Uuid;

pub trait ObjectStore {
    /// Batch-size hint from the loader. Stores that do not buffer may
    /// ignore it.
    fn set_batch_size(&mut self, hint: usize);

    /// The store's current schema document.
    fn schema(&self) -> Result<Value, StoreError>;

    /// Add one object creation to the pending batch.
    fn enqueue_object(
        &mut self,
        class: &str,
        id: Uuid,
        properties: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Add one cross-reference creation to the pending batch.
    fn enqueue_reference(
        &mut self,
        from_class: &str,
        from_id: Uuid,
        property: &str,
        to_id: Uuid,
    ) -> Result<(), StoreError>;

    /// Submit everything still buffered, including partial batches.
    fn flush(&mut self) -> Result<(), StoreError>;
}
