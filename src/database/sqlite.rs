use super::connection::init_connection;
use super::{CollectionPath, Document, DocumentStore, Fields, Query, WriteBatch};
use crate::error::StoreError;
use crate::row_factories::DocumentRowFactory;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

/// Document store persisted in a single SQLite table of JSON bodies
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let conn = init_connection(db_path)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }

    pub fn count_documents(&self) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn read_fields(
    conn: &Connection,
    path: &str,
    id: &str,
) -> Result<Option<Fields>, StoreError> {
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM documents WHERE collection_path = ?1 AND id = ?2",
            params![path, id],
            |row| row.get(0),
        )
        .optional()?;
    match data {
        Some(data) => Ok(Some(DocumentRowFactory::parse_fields(&data).map_err(|_| {
            StoreError::Malformed {
                path: path.to_string(),
                id: id.to_string(),
            }
        })?)),
        None => Ok(None),
    }
}

impl DocumentStore for SqliteStore {
    fn list(&self, path: &CollectionPath, query: &Query) -> Result<Vec<Document>, StoreError> {
        path.validate()?;
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, data FROM documents
             WHERE collection_path = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map([path.to_string()], DocumentRowFactory::from_row)?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        debug!("Loaded {} documents from {}", documents.len(), path);
        Ok(query.apply(documents))
    }

    fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError> {
        path.validate()?;
        let conn = self.lock()?;
        let fields = read_fields(&conn, &path.to_string(), id)?;
        Ok(fields.map(|fields| Document {
            id: id.to_string(),
            fields,
        }))
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for op in batch.ops() {
            let (path, id) = op.target();
            let key = path.to_string();
            let current = read_fields(&tx, &key, id)?;
            match op.apply(current)? {
                Some(fields) => {
                    let data = serde_json::to_string(&Value::Object(fields))?;
                    tx.execute(
                        "INSERT INTO documents (collection_path, id, data) VALUES (?1, ?2, ?3)
                         ON CONFLICT(collection_path, id) DO UPDATE SET data = excluded.data",
                        params![key, id, data],
                    )?;
                }
                None => {
                    tx.execute(
                        "DELETE FROM documents WHERE collection_path = ?1 AND id = ?2",
                        params![key, id],
                    )?;
                }
            }
        }

        // Dropping the transaction on an early return rolls it back
        tx.commit()?;
        debug!("Committed batch of {} writes", batch.ops().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open(":memory:").expect("Failed to create test database")
    }

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_set_then_get() {
        let store = create_test_store();
        let courses = CollectionPath::new("courses");
        let mut batch = WriteBatch::new();
        batch.set(&courses, "c1", fields(json!({"title": "SQL Basics"})));
        store.commit(batch).unwrap();

        let doc = store.get(&courses, "c1").unwrap().unwrap();
        assert_eq!(doc.fields["title"], json!("SQL Basics"));
        assert_eq!(store.count_documents().unwrap(), 1);
    }

    #[test]
    fn test_nested_collections_are_separate() {
        let store = create_test_store();
        let m1 = CollectionPath::new("courses").child("c1", "modules");
        let m2 = CollectionPath::new("courses").child("c2", "modules");
        let mut batch = WriteBatch::new();
        batch.set(&m1, "a", fields(json!({"order": 1})));
        batch.set(&m2, "b", fields(json!({"order": 1})));
        store.commit(batch).unwrap();

        let docs = store.list(&m1, &Query::new()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "a");
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let store = create_test_store();
        let courses = CollectionPath::new("courses");
        let mut batch = WriteBatch::new();
        batch.set(&courses, "c1", fields(json!({"title": "Rust"})));
        batch.merge(&courses, "ghost", fields(json!({"title": "x"})));

        assert!(store.commit(batch).is_err());
        assert!(store.get(&courses, "c1").unwrap().is_none());
        assert_eq!(store.count_documents().unwrap(), 0);
    }

    #[test]
    fn test_delete_removes_document() {
        let store = create_test_store();
        let courses = CollectionPath::new("courses");
        let mut batch = WriteBatch::new();
        batch.set(&courses, "c1", fields(json!({})));
        store.commit(batch).unwrap();

        let mut batch = WriteBatch::new();
        batch.delete(&courses, "c1");
        store.commit(batch).unwrap();
        assert!(store.get(&courses, "c1").unwrap().is_none());
    }
}
