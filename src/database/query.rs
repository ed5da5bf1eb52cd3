use super::Document;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Equality filters, one ordering field and an optional limit over a single collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filters, sorts and truncates documents already loaded from one collection.
    /// Documents missing the ordering field sort last in either direction.
    pub fn apply(&self, documents: Vec<Document>) -> Vec<Document> {
        let mut matching: Vec<Document> = documents
            .into_iter()
            .filter(|doc| {
                self.filters
                    .iter()
                    .all(|(field, expected)| doc.fields.get(field) == Some(expected))
            })
            .collect();

        if let Some(order) = &self.order_by {
            matching.sort_by(|a, b| {
                let left = present(a.fields.get(&order.field));
                let right = present(b.fields.get(&order.field));
                match (left, right) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(x), Some(y)) => {
                        let ord = compare_values(x, y);
                        match order.direction {
                            Direction::Ascending => ord,
                            Direction::Descending => ord.reverse(),
                        }
                    }
                }
            });
        }

        if let Some(limit) = self.limit {
            matching.truncate(limit);
        }
        matching
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> Document {
        Document {
            id: id.to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_order_descending_by_number() {
        let docs = vec![
            doc("a", json!({"points": 10})),
            doc("b", json!({"points": 50})),
            doc("c", json!({"points": 25})),
        ];
        let result = Query::new()
            .order_by("points", Direction::Descending)
            .apply(docs);
        assert_eq!(ids(&result), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_missing_field_sorts_last() {
        let docs = vec![
            doc("a", json!({})),
            doc("b", json!({"order": 2})),
            doc("c", json!({"order": null})),
            doc("d", json!({"order": 1})),
        ];
        let asc = Query::new()
            .order_by("order", Direction::Ascending)
            .apply(docs.clone());
        assert_eq!(ids(&asc), vec!["d", "b", "a", "c"]);

        let desc = Query::new()
            .order_by("order", Direction::Descending)
            .apply(docs);
        assert_eq!(ids(&desc), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_filter_and_limit() {
        let docs = vec![
            doc("a", json!({"moduleId": "m1"})),
            doc("b", json!({"moduleId": "m2"})),
            doc("c", json!({"moduleId": "m1"})),
        ];
        let result = Query::new().where_eq("moduleId", "m1").limit(1).apply(docs);
        assert_eq!(ids(&result), vec!["a"]);
    }
}
