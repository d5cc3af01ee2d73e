//! Post-processing of returned documents.
//!
//! A [`FieldMapping`] copies the value of a source field into a destination
//! field on every document. Source fields are kept, so a mapping acts as a
//! rename for callers that only read the destination and as a duplicate for
//! everyone else.

use serde_json::Value;

use crate::error::{Error, Result};

/// A single Solr document.
pub type Document = serde_json::Map<String, Value>;

/// Ordered source -> destination table.
///
/// Entries are applied in insertion order. Inserting an existing source
/// replaces its destination without moving the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    entries: Vec<(String, String)>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the destination previously mapped from `source`, if any.
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Option<String> {
        let source = source.into();
        let destination = destination.into();

        match self.entries.iter_mut().find(|(s, _)| *s == source) {
            Some((_, existing)) => Some(std::mem::replace(existing, destination)),
            None => {
                self.entries.push((source, destination));
                None
            }
        }
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, d)| d.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies the table to one document in place.
    pub fn apply(&self, doc: &mut Document) {
        for (source, destination) in &self.entries {
            // A document without the source field gets no destination either.
            if let Some(value) = doc.get(source).cloned() {
                doc.insert(destination.clone(), value);
            }
        }
    }
}

impl<S, D> FromIterator<(S, D)> for FieldMapping
where
    S: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        mapping.extend(iter);
        mapping
    }
}

impl<S, D> Extend<(S, D)> for FieldMapping
where
    S: Into<String>,
    D: Into<String>,
{
    fn extend<I: IntoIterator<Item = (S, D)>>(&mut self, iter: I) {
        for (source, destination) in iter {
            self.insert(source, destination);
        }
    }
}

/// Applies `mapping` to every document. An empty mapping returns `docs` as is.
pub fn map_documents(mut docs: Vec<Document>, mapping: &FieldMapping) -> Vec<Document> {
    if mapping.is_empty() {
        return docs;
    }
    for doc in &mut docs {
        mapping.apply(doc);
    }
    docs
}

/// Extracts `response.docs` from a search response and maps it.
///
/// Fails with [`Error::ShapeMismatch`] when the body is not of the form
/// `{"response": {"docs": [...]}}`.
pub fn map_response(body: Value, mapping: &FieldMapping) -> Result<Vec<Document>> {
    let docs = match body {
        Value::Object(mut root) => match root.remove("response") {
            Some(Value::Object(mut response)) => response.remove("docs"),
            _ => None,
        },
        _ => None,
    };

    let Some(Value::Array(docs)) = docs else {
        return Err(Error::ShapeMismatch(
            "expected an array at response.docs".to_string(),
        ));
    };

    let total = docs.len();
    let docs: Vec<Document> = docs
        .into_iter()
        .filter_map(|doc| match doc {
            Value::Object(doc) => Some(doc),
            _ => None,
        })
        .collect();

    if docs.len() != total {
        tracing::debug!(
            skipped = total - docs.len(),
            "Ignoring non-object entries in response.docs"
        );
    }

    Ok(map_documents(docs, mapping))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_mapping_copies_and_keeps_source() {
        let mapping: FieldMapping = [("topicstitle", "topics")].into_iter().collect();
        let original = doc(json!({
            "topicstitle": ["Tech Talk"],
            "contenttypetitle": ["Videos"],
            "relatedHubstitle": ["Skid Steer Loaders"],
            "publishdate": "2016-05-25T22:00:00Z"
        }));

        let mapped = map_documents(vec![original], &mapping);

        assert_eq!(
            Value::Object(mapped[0].clone()),
            json!({
                "topicstitle": ["Tech Talk"],
                "contenttypetitle": ["Videos"],
                "relatedHubstitle": ["Skid Steer Loaders"],
                "publishdate": "2016-05-25T22:00:00Z",
                "topics": ["Tech Talk"]
            })
        );
    }

    #[test]
    fn test_empty_mapping_is_identity() {
        let docs = vec![doc(json!({"id": "1"})), doc(json!({"id": "2"}))];
        assert_eq!(map_documents(docs.clone(), &FieldMapping::new()), docs);
    }

    #[test]
    fn test_missing_source_leaves_document_alone() {
        let mapping: FieldMapping = [("summary", "teaser")].into_iter().collect();
        let mapped = map_documents(vec![doc(json!({"id": "1"}))], &mapping);
        assert_eq!(Value::Object(mapped[0].clone()), json!({"id": "1"}));
    }

    #[test]
    fn test_later_entries_win_on_shared_destination() {
        let mut mapping = FieldMapping::new();
        mapping.insert("title", "label");
        mapping.insert("shorttitle", "label");

        let mapped = map_documents(
            vec![doc(json!({"title": "Long", "shorttitle": "Short"}))],
            &mapping,
        );
        assert_eq!(mapped[0]["label"], json!("Short"));
    }

    #[test]
    fn test_reinsert_overwrites_in_place() {
        let mut mapping = FieldMapping::new();
        assert_eq!(mapping.insert("a", "b"), None);
        mapping.insert("c", "d");
        assert_eq!(mapping.insert("a", "z"), Some("b".to_string()));

        let entries: Vec<_> = mapping.iter().collect();
        assert_eq!(entries, vec![("a", "z"), ("c", "d")]);
        assert_eq!(mapping.get("a"), Some("z"));
    }

    #[test]
    fn test_map_response_extracts_docs() {
        let mapping: FieldMapping = [("name", "label")].into_iter().collect();
        let body = json!({
            "responseHeader": {"status": 0},
            "response": {"numFound": 1, "docs": [{"name": "Loader"}, 42]}
        });

        let docs = map_response(body, &mapping).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["label"], json!("Loader"));
    }

    #[test]
    fn test_map_response_shape_mismatch() {
        let mapping = FieldMapping::new();
        for body in [
            json!({}),
            json!({"response": {}}),
            json!({"response": {"docs": {}}}),
            json!({"response": []}),
            json!([1, 2, 3]),
        ] {
            let err = map_response(body, &mapping).unwrap_err();
            assert!(matches!(err, Error::ShapeMismatch(_)));
        }
    }
}
