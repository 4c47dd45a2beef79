//! The combinator algebra: serial `chain` and fan-out `broadcast`.
//!
//! Both are registered as combinator builders under `combinator.chain` and
//! `combinator.broadcast`. Given well-typed input they never fail, so their
//! builder signature is infallible.

use crate::document::{DocHandle, DocumentSet};
use crate::transform::{Lifter, Transform};

/// Serial composition: the output of each stage feeds the next.
///
/// A stage that drops a document removes it from every downstream stage.
/// An empty list composes to the identity transform.
pub fn chain(transformers: Vec<Lifter>) -> Lifter {
    Box::new(Chain {
        stages: transformers,
    })
}

struct Chain {
    stages: Vec<Lifter>,
}

impl Transform for Chain {
    fn apply(&self, docs: &mut DocumentSet, input: Vec<DocHandle>) -> Vec<DocHandle> {
        self.stages
            .iter()
            .fold(input, |items, stage| stage.apply(docs, items))
    }

    fn name(&self) -> &str {
        "chain"
    }
}

/// Parallel fan-out: every branch sees the same input batch.
///
/// The output is the concatenation of each branch's output, in branch
/// declaration order; within a branch, that branch's own ordering is
/// preserved. Per input document the output cardinality is the sum of the
/// branch cardinalities. Branches run sequentially, so mutations made by an
/// earlier branch are visible to later ones.
pub fn broadcast(transformers: Vec<Lifter>) -> Lifter {
    Box::new(Broadcast {
        branches: transformers,
    })
}

struct Broadcast {
    branches: Vec<Lifter>,
}

impl Transform for Broadcast {
    fn apply(&self, docs: &mut DocumentSet, input: Vec<DocHandle>) -> Vec<DocHandle> {
        let mut output = Vec::new();
        for branch in &self.branches {
            output.extend(branch.apply(docs, input.clone()));
        }
        output
    }

    fn name(&self) -> &str {
        "broadcast"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::transform::FnTransform;
    use serde_json::json;

    fn set_field(name: &str, value: serde_json::Value) -> Lifter {
        let field = crate::document::FieldPath::parse(name);
        Box::new(FnTransform::new(format!("set-{name}"), move |docs, input| {
            for &handle in &input {
                docs.get_mut(handle).set(&field, value.clone());
            }
            input
        }))
    }

    fn drop_all() -> Lifter {
        Box::new(FnTransform::new("drop-all", |_docs, _input| Vec::new()))
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let mut docs = DocumentSet::new();
        let handle = docs.insert(Document::new());

        let composed = chain(Vec::new());
        assert_eq!(composed.apply(&mut docs, vec![handle]), vec![handle]);
    }

    #[test]
    fn test_chain_applies_stages_in_order() {
        let mut docs = DocumentSet::new();
        let handle = docs.insert(Document::new());

        let composed = chain(vec![
            set_field("a", json!(1)),
            set_field("a", json!(2)),
            set_field("b", json!(3)),
        ]);
        let out = composed.apply(&mut docs, vec![handle]);

        assert_eq!(out, vec![handle]);
        assert_eq!(docs.get(handle).root(), &json!({"a": 2, "b": 3}));
    }

    #[test]
    fn test_chain_drop_removes_from_downstream() {
        let mut docs = DocumentSet::new();
        let handle = docs.insert(Document::new());

        let composed = chain(vec![drop_all(), set_field("never", json!(true))]);
        let out = composed.apply(&mut docs, vec![handle]);

        assert!(out.is_empty());
        assert_eq!(docs.get(handle).root(), &json!({}));
    }

    #[test]
    fn test_broadcast_cardinality_is_sum_of_branches() {
        let mut docs = DocumentSet::new();
        let handle = docs.insert(Document::new());

        let composed = broadcast(vec![
            set_field("a", json!(1)),
            drop_all(),
            set_field("b", json!(2)),
        ]);
        let out = composed.apply(&mut docs, vec![handle]);

        // Two passing branches each emit the document once.
        assert_eq!(out, vec![handle, handle]);
    }

    #[test]
    fn test_broadcast_branches_share_the_document() {
        let mut docs = DocumentSet::new();
        let handle = docs.insert(Document::new());

        let composed = broadcast(vec![set_field("a", json!(1)), set_field("b", json!(2))]);
        composed.apply(&mut docs, vec![handle]);

        assert_eq!(docs.get(handle).root(), &json!({"a": 1, "b": 2}));
    }
}
