//! In-memory object store
//!
//! Buffers and "submits" operations exactly like a remote store would, but
//! keeps everything inspectable. Used by tests as the submission spy and by
//! `kiln-load --dry-run`.

use crate::error::StoreError;
use crate::store::ObjectStore;
use serde_json::{Map, Value};
use uuid::Uuid;

/// One submitted object creation.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub class: String,
    pub id: Uuid,
    pub properties: Map<String, Value>,
}

/// One submitted cross-reference creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReference {
    pub from_class: String,
    pub from_id: Uuid,
    pub property: String,
    pub to_id: Uuid,
}

pub struct MemoryStore {
    schema: Value,
    batch_size: usize,
    pending_objects: Vec<StoredObject>,
    pending_references: Vec<StoredReference>,
    objects: Vec<StoredObject>,
    references: Vec<StoredReference>,
    flushes: usize,
}

impl MemoryStore {
    pub fn new(schema: Value) -> Self {
        MemoryStore {
            schema,
            batch_size: 30,
            pending_objects: Vec::new(),
            pending_references: Vec::new(),
            objects: Vec::new(),
            references: Vec::new(),
            flushes: 0,
        }
    }

    /// Objects submitted so far (pending operations excluded).
    pub fn objects(&self) -> &[StoredObject] {
        &self.objects
    }

    /// References submitted so far (pending operations excluded).
    pub fn references(&self) -> &[StoredReference] {
        &self.references
    }

    pub fn object_count(&self, class: &str) -> usize {
        self.objects.iter().filter(|o| o.class == class).count()
    }

    /// Operations buffered but not yet submitted.
    pub fn pending(&self) -> usize {
        self.pending_objects.len() + self.pending_references.len()
    }

    /// How many times a batch has been submitted, auto or explicit.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    fn submit(&mut self) {
        if self.pending() == 0 {
            return;
        }
        self.objects.append(&mut self.pending_objects);
        self.references.append(&mut self.pending_references);
        self.flushes += 1;
    }

    fn submit_if_full(&mut self) {
        if self.pending() >= self.batch_size {
            self.submit();
        }
    }
}

impl ObjectStore for MemoryStore {
    fn set_batch_size(&mut self, hint: usize) {
        self.batch_size = hint.max(1);
    }

    fn schema(&self) -> Result<Value, StoreError> {
        Ok(self.schema.clone())
    }

    fn enqueue_object(
        &mut self,
        class: &str,
        id: Uuid,
        properties: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.pending_objects.push(StoredObject {
            class: class.to_string(),
            id,
            properties,
        });
        self.submit_if_full();
        Ok(())
    }

    fn enqueue_reference(
        &mut self,
        from_class: &str,
        from_id: Uuid,
        property: &str,
        to_id: Uuid,
    ) -> Result<(), StoreError> {
        self.pending_references.push(StoredReference {
            from_class: from_class.to_string(),
            from_id,
            property: property.to_string(),
            to_id,
        });
        self.submit_if_full();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.submit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(name: &str) -> (Uuid, Map<String, Value>) {
        let mut properties = Map::new();
        properties.insert("name".to_string(), json!(name));
        (Uuid::new_v4(), properties)
    }

    #[test]
    fn auto_submits_at_batch_size() {
        let mut store = MemoryStore::new(json!({"classes": []}));
        store.set_batch_size(2);

        let (id, props) = object("a");
        store.enqueue_object("Author", id, props).unwrap();
        assert_eq!(store.objects().len(), 0);
        assert_eq!(store.pending(), 1);

        let (id, props) = object("b");
        store.enqueue_object("Author", id, props).unwrap();
        assert_eq!(store.objects().len(), 2);
        assert_eq!(store.pending(), 0);
        assert_eq!(store.flushes(), 1);
    }

    #[test]
    fn flush_drains_partial_batch() {
        let mut store = MemoryStore::new(json!({"classes": []}));
        store.set_batch_size(100);

        let (id, props) = object("a");
        store.enqueue_object("Author", id, props).unwrap();
        store
            .enqueue_reference("Author", id, "wroteArticles", Uuid::new_v4())
            .unwrap();
        assert_eq!(store.objects().len(), 0);

        store.flush().unwrap();
        assert_eq!(store.objects().len(), 1);
        assert_eq!(store.references().len(), 1);
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn empty_flush_is_not_counted() {
        let mut store = MemoryStore::new(json!({"classes": []}));
        store.flush().unwrap();
        assert_eq!(store.flushes(), 0);
    }
}
