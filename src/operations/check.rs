//! The `check` operation: predicate filter.
//!
//! Config is a non-empty array of conditions, each a single-member object
//! `{field-path: expected}`. The built transform forwards a document only
//! when every condition holds, and never mutates. An expected `null`
//! matches a missing field as well as an explicit null.

use serde_json::Value;

use super::ValueExpr;
use crate::document::{DocHandle, Document, DocumentSet, FieldPath};
use crate::error::BuildError;
use crate::trace::TraceSink;
use crate::transform::{Lifter, Transform};

/// Operation builder for `check`.
pub fn build(config: &Value, tracer: &TraceSink) -> Result<Lifter, BuildError> {
    let Some(elements) = config.as_array() else {
        let msg = "\"check\" configuration must be an array";
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    };

    // Validated on actual element count, not reserved capacity.
    if elements.is_empty() {
        let msg = "\"check\" configuration must not be empty";
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    }

    let mut conditions = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let Some(members) = element.as_object() else {
            let msg = format!("\"check\" condition {index} must be an object");
            log::error!("{msg}");
            return Err(BuildError::structural(msg));
        };

        if members.len() != 1 {
            let msg = format!(
                "\"check\" condition {index} must have exactly one member, got {}",
                members.len()
            );
            log::error!("{msg}");
            return Err(BuildError::structural(msg));
        }

        let (field, expected) = members.iter().next().expect("one member checked above");
        conditions.push((FieldPath::parse(field), ValueExpr::parse(expected)));
    }

    Ok(Box::new(CheckOp {
        conditions,
        tracer: tracer.clone(),
    }))
}

struct CheckOp {
    conditions: Vec<(FieldPath, ValueExpr)>,
    tracer: TraceSink,
}

impl CheckOp {
    fn holds(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|(path, expr)| {
            let expected = expr.eval(doc);
            match doc.get(path) {
                Some(actual) => *actual == expected,
                None => expected.is_null(),
            }
        })
    }
}

impl Transform for CheckOp {
    fn apply(&self, docs: &mut DocumentSet, input: Vec<DocHandle>) -> Vec<DocHandle> {
        input
            .into_iter()
            .filter(|&handle| {
                let passed = self.holds(docs.get(handle));
                self.tracer.emit(if passed {
                    "check: passed"
                } else {
                    "check: dropped"
                });
                passed
            })
            .collect()
    }

    fn name(&self) -> &str {
        "check"
    }
}
