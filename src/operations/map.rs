//! The `map` operation: field assignment.
//!
//! Config is an object with at least one member, each a
//! `field-path: value-expr` pair. The built transform mutates every input
//! document in place and forwards it, 1:1. Assignments run in member order;
//! when two assignments target the same field the later one wins.

use serde_json::Value;

use super::ValueExpr;
use crate::document::{DocHandle, DocumentSet, FieldPath};
use crate::error::BuildError;
use crate::trace::TraceSink;
use crate::transform::{Lifter, Transform};

/// Operation builder for `map`.
pub fn build(config: &Value, tracer: &TraceSink) -> Result<Lifter, BuildError> {
    let Some(members) = config.as_object() else {
        let msg = "\"map\" configuration must be an object";
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    };

    if members.is_empty() {
        let msg = "\"map\" configuration must not be empty";
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    }

    let assignments = members
        .iter()
        .map(|(field, expr)| (FieldPath::parse(field), ValueExpr::parse(expr)))
        .collect();

    Ok(Box::new(MapOp {
        assignments,
        tracer: tracer.clone(),
    }))
}

struct MapOp {
    assignments: Vec<(FieldPath, ValueExpr)>,
    tracer: TraceSink,
}

impl Transform for MapOp {
    fn apply(&self, docs: &mut DocumentSet, input: Vec<DocHandle>) -> Vec<DocHandle> {
        for &handle in &input {
            for (path, expr) in &self.assignments {
                // Evaluate before mutating so a self-referencing assignment
                // reads the pre-assignment value.
                let value = expr.eval(docs.get(handle));
                docs.get_mut(handle).set(path, value);
                self.tracer.emit(&format!("map: set \"{path}\""));
            }
        }
        input
    }

    fn name(&self) -> &str {
        "map"
    }
}
