//! Document model for in-flight events.
//!
//! A [`Document`] is one event being normalized: a mutable JSON tree rooted
//! at an object. All documents currently flowing through a pipeline live in
//! a [`DocumentSet`] arena; transformers pass around [`DocHandle`] indices
//! and mutate through the arena, so a mutation made by one branch is visible
//! to every other holder of the same handle without shared ownership.
//!
//! Configuration trees use the same `serde_json::Value` representation but
//! are read-only snapshots consumed at build time; they are never inserted
//! into a `DocumentSet`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dotted field path into a document, e.g. `event.module.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path. Empty segments are preserved as-is; an empty
    /// string yields a single empty segment addressing the field `""`.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// One event document. Owns its whole value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Value,
}

impl Document {
    /// An empty document (`{}`).
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Wrap an existing value as a document root.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Read the value at `path`, if present.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.segments() {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Set the value at `path`, creating intermediate objects as needed.
    ///
    /// A non-object intermediate on the path is overwritten by an object;
    /// assignment never fails at runtime.
    pub fn set(&mut self, path: &FieldPath, value: Value) {
        let (last, parents) = path
            .segments()
            .split_last()
            .expect("a parsed path always has at least one segment");

        let mut current = &mut self.root;
        for segment in parents {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            current = current
                .as_object_mut()
                .expect("just coerced to an object")
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current
            .as_object_mut()
            .expect("just coerced to an object")
            .insert(last.clone(), value);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of a document inside a [`DocumentSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocHandle(usize);

/// Arena of documents currently in flight through a pipeline.
///
/// The arena outlives every handle taken from it during a single drive of
/// the pipeline; documents are never removed mid-flight, so handles stay
/// valid for the whole run.
#[derive(Debug, Default)]
pub struct DocumentSet {
    docs: Vec<Document>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a document into the arena, returning its handle.
    pub fn insert(&mut self, doc: Document) -> DocHandle {
        self.docs.push(doc);
        DocHandle(self.docs.len() - 1)
    }

    pub fn get(&self, handle: DocHandle) -> &Document {
        &self.docs[handle.0]
    }

    pub fn get_mut(&mut self, handle: DocHandle) -> &mut Document {
        &mut self.docs[handle.0]
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
