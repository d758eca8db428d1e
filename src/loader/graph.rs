use crate::error::LoadError;
use crate::loader::identity::object_id;
use crate::record::FlatRecord;
use crate::schema::{parse_schema, Schema};
use crate::store::ObjectStore;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Loads flat records into an object store as linked objects.
///
/// The loader reads and validates the store's schema once at construction.
/// Each [`load`](GraphLoader::load) call resolves one object per class from
/// `<class>_<property>` record fields, enqueues creations for objects it
/// has not created before, and enqueues one edge per declared reference
/// property between the objects of that call.
///
/// Dropping the loader flushes the store's partial batch. Call
/// [`finish`](GraphLoader::finish) first when the flush error matters; a
/// flush failure during drop is only logged.
///
/// Not thread-safe: the created-set and the store's pending batch are
/// unsynchronized. Share work across loaders, not a loader across threads.
pub struct GraphLoader<'a, S: ObjectStore> {
    store: &'a mut S,
    schema: Schema,
    created: HashMap<String, HashSet<Uuid>>,
    finished: bool,
}

impl<'a, S: ObjectStore> GraphLoader<'a, S> {
    pub fn new(store: &'a mut S, batch_size: usize) -> Result<Self, LoadError> {
        store.set_batch_size(batch_size);
        let document = store.schema()?;
        let schema = parse_schema(&document)?;
        debug!(classes = schema.classes.len(), batch_size, "loader ready");

        Ok(GraphLoader {
            store,
            schema,
            created: HashMap::new(),
            finished: false,
        })
    }

    /// The parsed schema, in loader iteration order.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Load one record: create its objects (at most once each) and link
    /// them through every declared reference property.
    pub fn load(&mut self, record: &FlatRecord) -> Result<(), LoadError> {
        // Resolve every class before enqueueing anything, so a missing
        // field leaves nothing from this call submitted and the
        // created-set untouched.
        let mut ids: HashMap<&str, Uuid> = HashMap::with_capacity(self.schema.classes.len());
        let mut resolved = Vec::with_capacity(self.schema.classes.len());
        for class in &self.schema.classes {
            let mut properties = FlatRecord::new();
            for scalar in &class.scalars {
                let value = record.get(&scalar.accessor).ok_or_else(|| {
                    LoadError::MissingField {
                        class: class.name.clone(),
                        field: scalar.accessor.clone(),
                    }
                })?;
                properties.insert(scalar.name.clone(), value.clone());
            }
            let id = object_id(&class.name, &properties);
            ids.insert(class.name.as_str(), id);
            resolved.push((class, id, properties));
        }

        for (class, id, properties) in resolved {
            let seen = self.created.entry(class.name.clone()).or_default();
            if seen.insert(id) {
                trace!(class = %class.name, %id, "create object");
                self.store.enqueue_object(&class.name, id, properties)?;
            } else {
                trace!(class = %class.name, %id, "object already created, skipping");
            }
        }

        // Edges are re-submitted on every call; the store tolerates
        // duplicate edge submissions.
        for class in &self.schema.classes {
            let from_id = ids[class.name.as_str()];
            for reference in &class.references {
                // the target is a declared class, so it resolved above
                let to_id = ids[reference.target.as_str()];
                self.store
                    .enqueue_reference(&class.name, from_id, &reference.name, to_id)?;
            }
        }

        Ok(())
    }

    /// Flush the store's pending batch, surfacing the error.
    pub fn finish(&mut self) -> Result<(), LoadError> {
        self.finished = true;
        self.store.flush()?;
        Ok(())
    }
}

impl<S: ObjectStore> Drop for GraphLoader<'_, S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(error) = self.store.flush() {
            warn!(%error, "flush on drop failed");
        }
    }
}
