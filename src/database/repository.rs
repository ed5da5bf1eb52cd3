use super::{CollectionPath, Direction, Document, DocumentStore, Fields, Query, WriteBatch};
use crate::date_provider::DateProvider;
use crate::error::StoreError;
use crate::models::timestamp;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// A record type stored as one document per instance
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Human-readable name used in log lines
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Generates a fresh document identifier
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// CRUD accessor for one collection path.
///
/// Reads return `Ok(None)`/empty vectors for missing data; every store failure is logged and
/// handed back unchanged. Nothing is retried.
pub struct Repository<'a, T> {
    store: &'a dyn DocumentStore,
    clock: &'a dyn DateProvider,
    path: CollectionPath,
    default_query: Query,
    _entity: PhantomData<T>,
}

impl<'a, T: Entity> Repository<'a, T> {
    pub fn new(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider, path: CollectionPath) -> Self {
        Repository {
            store,
            clock,
            path,
            default_query: Query::new(),
            _entity: PhantomData,
        }
    }

    /// Ordering applied by [`Repository::get_all`] and the filtered reads
    pub fn ordered_by(mut self, field: &str, direction: Direction) -> Self {
        self.default_query = self.default_query.order_by(field, direction);
        self
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    pub(crate) fn store(&self) -> &'a dyn DocumentStore {
        self.store
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.get_current_time()
    }

    pub fn get_all(&self) -> Result<Vec<T>, StoreError> {
        self.query(&self.default_query)
    }

    /// Documents whose `field` equals `value`, in the default order
    pub fn get_where(&self, field: &str, value: impl Into<Value>) -> Result<Vec<T>, StoreError> {
        let query = self.default_query.clone().where_eq(field, value);
        self.query(&query)
    }

    pub fn query(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        let documents = self.logged("list", self.store.list(&self.path, query))?;
        let entities = documents
            .into_iter()
            .map(|doc| self.decode(doc))
            .collect::<Result<Vec<T>, StoreError>>();
        self.logged("decode", entities)
    }

    /// Like [`Repository::get_all`], but documents that fail to decode are skipped with a warning
    pub fn get_all_lenient(&self) -> Result<Vec<T>, StoreError> {
        let documents = self.logged("list", self.store.list(&self.path, &self.default_query))?;
        let mut entities = Vec::with_capacity(documents.len());
        for doc in documents {
            let id = doc.id.clone();
            match self.decode(doc) {
                Ok(entity) => entities.push(entity),
                Err(e) => warn!("Skipping {} {}/{}: {}", T::KIND, self.path, id, e),
            }
        }
        Ok(entities)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        let document = self.logged("read", self.store.get(&self.path, id))?;
        match document {
            Some(doc) => Ok(Some(self.logged("decode", self.decode(doc))?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let documents = self.logged("count", self.store.list(&self.path, &Query::new()))?;
        Ok(documents.len())
    }

    /// Stores `entity` under a new id, stamping `createdAt` and `updatedAt`
    pub fn create(&self, entity: &T) -> Result<String, StoreError> {
        let id = new_document_id();
        self.create_with_id(&id, entity)?;
        Ok(id)
    }

    /// Creates or replaces the document `id`
    pub fn create_with_id(&self, id: &str, entity: &T) -> Result<(), StoreError> {
        let fields = self.encode_new(entity)?;
        let mut batch = WriteBatch::new();
        batch.set(&self.path, id, fields);
        self.logged("create", self.store.commit(batch))?;
        info!("Created {} {}/{}", T::KIND, self.path, id);
        Ok(())
    }

    /// Merges the fields present in `patch` into document `id` and refreshes `updatedAt`.
    /// No cross-field validation happens here.
    pub fn update<P: Serialize>(&self, id: &str, patch: &P) -> Result<(), StoreError> {
        let fields = self.encode_patch(patch)?;
        self.update_fields(id, fields)
    }

    pub fn update_fields(&self, id: &str, mut fields: Fields) -> Result<(), StoreError> {
        fields.insert(UPDATED_AT.to_string(), timestamp::to_value(&self.now()));
        let mut batch = WriteBatch::new();
        batch.merge(&self.path, id, fields);
        self.logged("update", self.store.commit(batch))?;
        debug!("Updated {} {}/{}", T::KIND, self.path, id);
        Ok(())
    }

    /// Hard delete; children under nested paths are left for the caller to clean up
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete(&self.path, id);
        self.logged("delete", self.store.commit(batch))?;
        info!("Deleted {} {}/{}", T::KIND, self.path, id);
        Ok(())
    }

    pub(crate) fn encode_new(&self, entity: &T) -> Result<Fields, StoreError> {
        let mut fields = to_fields(entity)?;
        fields.remove("id");
        let now = timestamp::to_value(&self.now());
        fields.insert(CREATED_AT.to_string(), now.clone());
        fields.insert(UPDATED_AT.to_string(), now);
        Ok(fields)
    }

    pub(crate) fn encode_patch<P: Serialize>(&self, patch: &P) -> Result<Fields, StoreError> {
        let mut fields = to_fields(patch)?;
        fields.remove("id");
        fields.remove(CREATED_AT);
        Ok(fields)
    }

    fn decode(&self, doc: Document) -> Result<T, StoreError> {
        let mut fields = doc.fields;
        fields.insert("id".to_string(), Value::String(doc.id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    pub(crate) fn logged<R>(&self, action: &str, result: Result<R, StoreError>) -> Result<R, StoreError> {
        if let Err(e) = &result {
            error!("Failed to {} {} in {}: {}", action, T::KIND, self.path, e);
        }
        result
    }
}

fn to_fields<S: Serialize>(value: &S) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "expected an object, got {}",
            other
        )))),
    }
}
