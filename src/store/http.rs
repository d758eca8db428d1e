//! HTTP object store
//!
//! Speaks the store's REST surface with a blocking client:
//! `GET/POST /v1/schema`, `POST /v1/batch/objects`,
//! `POST /v1/batch/references`, `POST /v1/graphql`. Creations are buffered
//! locally and submitted whenever the pending batch reaches the configured
//! size, or on [`ObjectStore::flush`].

use crate::error::StoreError;
use crate::query::GetQuery;
use crate::store::ObjectStore;
use anyhow::anyhow;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
struct BatchObject {
    class: String,
    id: String,
    properties: Map<String, Value>,
}

/// Beacon-style reference payload: `from` carries the source object and
/// edge property, `to` the target object.
#[derive(Debug, Clone, Serialize)]
struct BatchReference {
    from: String,
    to: String,
}

pub struct HttpStore {
    base: String,
    http: reqwest::blocking::Client,
    batch_size: usize,
    pending_objects: Vec<BatchObject>,
    pending_references: Vec<BatchReference>,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }
        HttpStore {
            base,
            http: reqwest::blocking::Client::new(),
            batch_size: 30,
            pending_objects: Vec::new(),
            pending_references: Vec::new(),
        }
    }

    /// Create the schema on the store.
    pub fn create_schema(&self, schema: &Value) -> Result<(), StoreError> {
        let response = self
            .http
            .post(format!("{}/v1/schema", self.base))
            .json(schema)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    /// Drop every class (and all its objects) from the store.
    pub fn delete_schema(&self) -> Result<(), StoreError> {
        let document = self.fetch_schema()?;
        let classes = document
            .get("classes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for class in classes {
            if let Some(name) = class.get("class").and_then(Value::as_str) {
                let response = self
                    .http
                    .delete(format!("{}/v1/schema/{}", self.base, name))
                    .send()?;
                Self::check(response)?;
            }
        }
        Ok(())
    }

    /// Run a nearest-neighbor query and return the raw response document.
    pub fn query(&self, query: &GetQuery) -> Result<Value, StoreError> {
        self.graphql(&query.to_graphql())
    }

    /// How many objects of `class` the store currently holds.
    pub fn count(&self, class: &str) -> Result<u64, StoreError> {
        let query = format!("{{ Aggregate {{ {class} {{ meta {{ count }} }} }} }}");
        let response = self.graphql(&query)?;
        response
            .pointer(&format!("/data/Aggregate/{class}/0/meta/count"))
            .and_then(Value::as_u64)
            .ok_or_else(|| StoreError::Other(anyhow!("malformed aggregate response for `{class}`")))
    }

    fn graphql(&self, query: &str) -> Result<Value, StoreError> {
        let response = self
            .http
            .post(format!("{}/v1/graphql", self.base))
            .json(&json!({"query": query}))
            .send()?;
        let response = Self::check(response)?;
        Ok(response.json()?)
    }

    fn fetch_schema(&self) -> Result<Value, StoreError> {
        let response = self
            .http
            .get(format!("{}/v1/schema", self.base))
            .send()?;
        let response = Self::check(response)?;
        Ok(response.json()?)
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn submit_pending(&mut self) -> Result<(), StoreError> {
        if !self.pending_objects.is_empty() {
            debug!(objects = self.pending_objects.len(), "submitting object batch");
            let response = self
                .http
                .post(format!("{}/v1/batch/objects", self.base))
                .json(&json!({"objects": &self.pending_objects}))
                .send()?;
            Self::check(response)?;
            self.pending_objects.clear();
        }
        if !self.pending_references.is_empty() {
            debug!(
                references = self.pending_references.len(),
                "submitting reference batch"
            );
            let response = self
                .http
                .post(format!("{}/v1/batch/references", self.base))
                .json(&self.pending_references)
                .send()?;
            Self::check(response)?;
            self.pending_references.clear();
        }
        Ok(())
    }

    fn pending(&self) -> usize {
        self.pending_objects.len() + self.pending_references.len()
    }
}

impl ObjectStore for HttpStore {
    fn set_batch_size(&mut self, hint: usize) {
        self.batch_size = hint.max(1);
    }

    fn schema(&self) -> Result<Value, StoreError> {
        self.fetch_schema()
    }

    fn enqueue_object(
        &mut self,
        class: &str,
        id: Uuid,
        properties: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.pending_objects.push(BatchObject {
            class: class.to_string(),
            id: id.to_string(),
            properties,
        });
        if self.pending() >= self.batch_size {
            self.submit_pending()?;
        }
        Ok(())
    }

    fn enqueue_reference(
        &mut self,
        from_class: &str,
        from_id: Uuid,
        property: &str,
        to_id: Uuid,
    ) -> Result<(), StoreError> {
        self.pending_references.push(BatchReference {
            from: format!("weaviate://localhost/{from_class}/{from_id}/{property}"),
            to: format!("weaviate://localhost/{to_id}"),
        });
        if self.pending() >= self.batch_size {
            self.submit_pending()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.submit_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slashes() {
        let store = HttpStore::new("http://localhost:8080///");
        assert_eq!(store.base, "http://localhost:8080");
    }

    #[test]
    fn reference_beacons() {
        let mut store = HttpStore::new("http://localhost:8080");
        store.set_batch_size(100);
        let from = Uuid::nil();
        let to = Uuid::nil();
        store
            .enqueue_reference("Article", from, "hasAuthors", to)
            .unwrap();

        let reference = &store.pending_references[0];
        assert_eq!(
            reference.from,
            format!("weaviate://localhost/Article/{from}/hasAuthors")
        );
        assert_eq!(reference.to, format!("weaviate://localhost/{to}"));
    }
}
