use crate::error::StoreError;
use std::fmt;

/// Slash-separated location of a collection, e.g. `courses/{courseId}/modules`.
///
/// A collection path always has an odd number of segments: collection names at even
/// positions, document ids in between.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    pub fn new(collection: &str) -> Self {
        CollectionPath {
            segments: vec![collection.to_string()],
        }
    }

    /// Path of the sub-collection `name` below document `id` of this collection
    pub fn child(&self, id: &str, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        segments.push(name.to_string());
        CollectionPath { segments }
    }

    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Checks that no segment is empty or contains a separator
    pub fn validate(&self) -> Result<(), StoreError> {
        let bad = self
            .segments
            .iter()
            .any(|s| s.trim().is_empty() || s.contains('/'));
        if bad || self.segments.len() % 2 == 0 {
            return Err(StoreError::InvalidPath(self.to_string()));
        }
        Ok(())
    }

    /// Whether `prefix` names this path or one of its ancestors, compared whole segments
    /// at a time. A trailing separator in `prefix` is ignored.
    pub fn starts_with(&self, prefix: &str) -> bool {
        let wanted: Vec<&str> = prefix.trim_end_matches('/').split('/').collect();
        wanted.len() <= self.segments.len()
            && wanted.iter().zip(&self.segments).all(|(w, s)| *w == s.as_str())
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
