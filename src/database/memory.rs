use super::{CollectionPath, Document, DocumentStore, Fields, Query, WriteBatch};
use crate::error::StoreError;
use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

type Collections = BTreeMap<String, BTreeMap<String, Fields>>;

/// Document store kept entirely in process memory.
///
/// Used by tests and by `--test` runs. Reads under a path prefix can be made to fail with
/// [`InMemoryStore::simulate_outage`] to exercise error paths.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<Collections>,
    outages: Mutex<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read of a collection whose path starts with `prefix` fails with
    /// [`StoreError::Unavailable`] until [`InMemoryStore::restore`] is called.
    pub fn simulate_outage(&self, prefix: &str) {
        if let Ok(mut outages) = self.outages.lock() {
            outages.insert(prefix.to_string());
        }
    }

    pub fn restore(&self) {
        if let Ok(mut outages) = self.outages.lock() {
            outages.clear();
        }
    }

    fn check_outage(&self, path: &CollectionPath) -> Result<(), StoreError> {
        let outages = self
            .outages
            .lock()
            .map_err(|_| StoreError::Unavailable("outage table lock poisoned".to_string()))?;
        if outages.iter().any(|prefix| path.starts_with(prefix)) {
            return Err(StoreError::Unavailable(format!("reads of {} are failing", path)));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }
}

impl DocumentStore for InMemoryStore {
    fn list(&self, path: &CollectionPath, query: &Query) -> Result<Vec<Document>, StoreError> {
        path.validate()?;
        self.check_outage(path)?;
        let collections = self.lock()?;
        let documents = collections
            .get(&path.to_string())
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(query.apply(documents))
    }

    fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError> {
        path.validate()?;
        self.check_outage(path)?;
        let collections = self.lock()?;
        Ok(collections
            .get(&path.to_string())
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        let mut collections = self.lock()?;

        // Apply to a working copy so a failing op leaves the store untouched
        let mut working = collections.clone();
        for op in batch.ops() {
            let (path, id) = op.target();
            let key = path.to_string();
            let current = working.get(&key).and_then(|docs| docs.get(id)).cloned();
            match op.apply(current)? {
                Some(fields) => {
                    working.entry(key).or_default().insert(id.to_string(), fields);
                }
                None => {
                    if let Some(docs) = working.get_mut(&key) {
                        docs.remove(id);
                    }
                }
            }
        }
        *collections = working;
        debug!("Committed batch of {} writes", batch.ops().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_empty_collection_lists_nothing() {
        let store = InMemoryStore::new();
        let docs = store.list(&CollectionPath::new("courses"), &Query::new()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_get_missing_document_is_none() {
        let store = InMemoryStore::new();
        let doc = store.get(&CollectionPath::new("courses"), "nope").unwrap();
        assert!(doc.is_none());
    }

    #[test]
    fn test_failed_batch_leaves_store_unchanged() {
        let store = InMemoryStore::new();
        let courses = CollectionPath::new("courses");

        let mut batch = WriteBatch::new();
        batch.set(&courses, "c1", fields(json!({"title": "Rust"})));
        batch.increment(&courses, "missing", "moduleCount", 1, None);

        assert!(matches!(
            store.commit(batch),
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.get(&courses, "c1").unwrap().is_none());
    }

    #[test]
    fn test_outage_fails_reads_under_prefix_only() {
        let store = InMemoryStore::new();
        store.simulate_outage("users/u1");

        let broken = CollectionPath::new("users").child("u1", "login_tracking");
        let healthy = CollectionPath::new("users").child("u2", "login_tracking");
        assert!(matches!(
            store.list(&broken, &Query::new()),
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.list(&healthy, &Query::new()).is_ok());

        store.restore();
        assert!(store.list(&broken, &Query::new()).is_ok());
    }

    #[test]
    fn test_outage_does_not_spill_into_similar_ids() {
        let store = InMemoryStore::new();
        store.simulate_outage("users/u1");

        let neighbour = CollectionPath::new("users").child("u10", "login_tracking");
        assert!(store.list(&neighbour, &Query::new()).is_ok());
        assert!(store.get(&CollectionPath::new("users"), "u1").is_ok());
    }
}
