//! The stream-transformer seam.
//!
//! A [`Transform`] maps a batch of document handles to a batch of document
//! handles, mutating documents through the shared [`DocumentSet`] arena.
//! Cardinality is expressed directly by the returned vector: a filter
//! returns a subset, a 1:1 stage returns its input unchanged.
//!
//! Construction of a transform never touches documents; only [`Transform::apply`]
//! does. Builders return [`Lifter`]s, which own their captured
//! sub-transforms and hold no reference to the configuration they were
//! built from.

use crate::document::{DocHandle, DocumentSet};

/// A constructed stream stage.
pub trait Transform: Send + Sync {
    /// Drive a batch of documents through this stage.
    ///
    /// Relative order of surviving documents is preserved.
    fn apply(&self, docs: &mut DocumentSet, input: Vec<DocHandle>) -> Vec<DocHandle>;

    /// Stage name for diagnostics.
    fn name(&self) -> &str;
}

/// A boxed transform, the unit the builder algebra composes.
pub type Lifter = Box<dyn Transform>;

/// Forwards every input unchanged.
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, _docs: &mut DocumentSet, input: Vec<DocHandle>) -> Vec<DocHandle> {
        input
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Closure-backed transform, mostly useful in tests.
pub struct FnTransform<F> {
    name: String,
    func: F,
}

impl<F> FnTransform<F>
where
    F: Fn(&mut DocumentSet, Vec<DocHandle>) -> Vec<DocHandle> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(&mut DocumentSet, Vec<DocHandle>) -> Vec<DocHandle> + Send + Sync,
{
    fn apply(&self, docs: &mut DocumentSet, input: Vec<DocHandle>) -> Vec<DocHandle> {
        (self.func)(docs, input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_identity_forwards_all_handles() {
        let mut docs = DocumentSet::new();
        let a = docs.insert(Document::new());
        let b = docs.insert(Document::new());

        let out = Identity.apply(&mut docs, vec![a, b]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn test_fn_transform_filters() {
        let drop_all = FnTransform::new("drop-all", |_docs, _input| Vec::new());
        let mut docs = DocumentSet::new();
        let handle = docs.insert(Document::new());

        assert!(drop_all.apply(&mut docs, vec![handle]).is_empty());
        assert_eq!(drop_all.name(), "drop-all");
    }
}
