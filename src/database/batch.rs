use super::{CollectionPath, Fields};
use crate::error::StoreError;
use serde_json::Value;

/// A single write inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or replace the whole document
    Set {
        path: CollectionPath,
        id: String,
        fields: Fields,
    },
    /// Overwrite only the given fields of an existing document
    Merge {
        path: CollectionPath,
        id: String,
        fields: Fields,
    },
    /// Remove the document. With `must_exist` a missing document fails the whole batch.
    Delete {
        path: CollectionPath,
        id: String,
        must_exist: bool,
    },
    /// Add `by` to a numeric field of an existing document, optionally clamped from below.
    /// The current value is read inside the same atomic section as the write.
    Increment {
        path: CollectionPath,
        id: String,
        field: String,
        by: i64,
        floor: Option<i64>,
    },
}

impl WriteOp {
    pub fn target(&self) -> (&CollectionPath, &str) {
        match self {
            WriteOp::Set { path, id, .. }
            | WriteOp::Merge { path, id, .. }
            | WriteOp::Delete { path, id, .. }
            | WriteOp::Increment { path, id, .. } => (path, id),
        }
    }

    /// Computes the document that results from applying this op to `current`.
    /// `None` means the document no longer exists.
    pub fn apply(&self, current: Option<Fields>) -> Result<Option<Fields>, StoreError> {
        match self {
            WriteOp::Set { fields, .. } => Ok(Some(fields.clone())),
            WriteOp::Merge { path, id, fields } => {
                let mut doc = current.ok_or_else(|| not_found(path, id))?;
                for (key, value) in fields {
                    doc.insert(key.clone(), value.clone());
                }
                Ok(Some(doc))
            }
            WriteOp::Delete {
                path,
                id,
                must_exist,
            } => {
                if *must_exist && current.is_none() {
                    return Err(not_found(path, id));
                }
                Ok(None)
            }
            WriteOp::Increment {
                path,
                id,
                field,
                by,
                floor,
            } => {
                let mut doc = current.ok_or_else(|| not_found(path, id))?;
                let existing = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
                let mut next = existing.saturating_add(*by);
                if let Some(floor) = floor {
                    next = next.max(*floor);
                }
                doc.insert(field.clone(), Value::from(next));
                Ok(Some(doc))
            }
        }
    }
}

fn not_found(path: &CollectionPath, id: &str) -> StoreError {
    StoreError::NotFound {
        path: path.to_string(),
        id: id.to_string(),
    }
}

/// Ordered list of writes that a store applies all-or-nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: &CollectionPath, id: &str, fields: Fields) -> &mut Self {
        self.ops.push(WriteOp::Set {
            path: path.clone(),
            id: id.to_string(),
            fields,
        });
        self
    }

    pub fn merge(&mut self, path: &CollectionPath, id: &str, fields: Fields) -> &mut Self {
        self.ops.push(WriteOp::Merge {
            path: path.clone(),
            id: id.to_string(),
            fields,
        });
        self
    }

    pub fn delete(&mut self, path: &CollectionPath, id: &str) -> &mut Self {
        self.ops.push(WriteOp::Delete {
            path: path.clone(),
            id: id.to_string(),
            must_exist: false,
        });
        self
    }

    /// Like [`WriteBatch::delete`], but the batch fails with `NotFound` if the document is
    /// already gone when the store applies it
    pub fn delete_existing(&mut self, path: &CollectionPath, id: &str) -> &mut Self {
        self.ops.push(WriteOp::Delete {
            path: path.clone(),
            id: id.to_string(),
            must_exist: true,
        });
        self
    }

    pub fn increment(
        &mut self,
        path: &CollectionPath,
        id: &str,
        field: &str,
        by: i64,
        floor: Option<i64>,
    ) -> &mut Self {
        self.ops.push(WriteOp::Increment {
            path: path.clone(),
            id: id.to_string(),
            field: field.to_string(),
            by,
            floor,
        });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        for op in &self.ops {
            let (path, id) = op.target();
            path.validate()?;
            if id.trim().is_empty() || id.contains('/') {
                return Err(StoreError::InvalidPath(format!("{}/{}", path, id)));
            }
        }
        Ok(())
    }
}
