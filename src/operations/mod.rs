//! Leaf operation builders consumed through the registry.

pub mod check;
pub mod map;

use serde_json::Value;

use crate::document::{Document, FieldPath};

/// Right-hand side of a map assignment or check condition.
///
/// A string starting with `$` references another field of the same
/// document; anything else is a literal.
#[derive(Debug, Clone)]
pub(crate) enum ValueExpr {
    Literal(Value),
    Reference(FieldPath),
}

impl ValueExpr {
    pub fn parse(value: &Value) -> Self {
        if let Some(path) = value.as_str().and_then(|s| s.strip_prefix('$')) {
            return Self::Reference(FieldPath::parse(path));
        }
        Self::Literal(value.clone())
    }

    /// Evaluate against a document. A dangling reference yields `null`.
    pub fn eval(&self, doc: &Document) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Reference(path) => doc.get(path).cloned().unwrap_or(Value::Null),
        }
    }
}
