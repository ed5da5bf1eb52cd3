use crate::database::{Document, Fields};
use rusqlite::Row;
use rusqlite::types::Type;
use serde_json::Value;

/// Factory for creating Document objects from rows of the `documents` table
pub struct DocumentRowFactory;

impl DocumentRowFactory {
    /// Creates a Document from a database row
    /// Expected columns: id, data
    pub fn from_row(row: &Row) -> rusqlite::Result<Document> {
        let id: String = row.get(0)?;
        let data: String = row.get(1)?;
        Ok(Document {
            id,
            fields: Self::parse_fields(&data)?,
        })
    }

    /// Parses the JSON body of a stored document; anything but an object is a conversion failure
    pub fn parse_fields(data: &str) -> rusqlite::Result<Fields> {
        match serde_json::from_str::<Value>(data) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(rusqlite::Error::InvalidColumnType(
                1,
                "data".to_string(),
                Type::Text,
            )),
            Err(e) => Err(rusqlite::Error::FromSqlConversionFailure(
                1,
                Type::Text,
                Box::new(e),
            )),
        }
    }
}
