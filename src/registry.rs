//! Process-wide builder registry.
//!
//! Stage compilers never call operation or combinator code directly; they
//! resolve builders by name through a [`Registry`]. The registry is
//! populated once at startup ([`Registry::with_defaults`] for the standard
//! set) and treated as immutable during compilation, so compilers only ever
//! hold a shared reference to it.

use std::collections::HashMap;

use serde_json::Value;

use crate::combinators;
use crate::error::BuildError;
use crate::operations;
use crate::trace::TraceSink;
use crate::transform::Lifter;

/// Builds one transform from a leaf configuration node.
pub type OperationBuilderFn = fn(&Value, &TraceSink) -> Result<Lifter, BuildError>;

/// Composes a list of transforms into one.
pub type CombinatorBuilderFn = fn(Vec<Lifter>) -> Lifter;

/// A named builder is exactly one of these two kinds.
#[derive(Debug, Clone, Copy)]
pub enum Builder {
    Operation(OperationBuilderFn),
    Combinator(CombinatorBuilderFn),
}

impl Builder {
    fn kind(&self) -> &'static str {
        match self {
            Self::Operation(_) => "an operation",
            Self::Combinator(_) => "a combinator",
        }
    }
}

/// Name-keyed builder table.
pub struct Registry {
    builders: HashMap<String, Builder>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// The standard builder set: `map`, `check`, `combinator.chain`,
    /// `combinator.broadcast`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("map", Builder::Operation(operations::map::build));
        registry.register("check", Builder::Operation(operations::check::build));
        registry.register("combinator.chain", Builder::Combinator(combinators::chain));
        registry.register(
            "combinator.broadcast",
            Builder::Combinator(combinators::broadcast),
        );
        registry
    }

    /// Register a builder. Registration happens before any compilation;
    /// a later registration under the same name replaces the earlier one.
    pub fn register(&mut self, name: impl Into<String>, builder: Builder) {
        self.builders.insert(name.into(), builder);
    }

    /// Look up a builder by name.
    pub fn lookup(&self, name: &str) -> Result<Builder, BuildError> {
        self.builders.get(name).copied().ok_or_else(|| {
            log::error!("builder lookup failed: \"{name}\" is not registered");
            BuildError::UnknownBuilder(name.to_string())
        })
    }

    /// Look up an operation builder, failing if the name resolves to a
    /// combinator.
    pub fn operation(&self, name: &str) -> Result<OperationBuilderFn, BuildError> {
        match self.lookup(name)? {
            Builder::Operation(f) => Ok(f),
            other => Err(BuildError::BuilderKind {
                name: name.to_string(),
                expected: "an operation",
                actual: other.kind(),
            }),
        }
    }

    /// Look up a combinator builder, failing if the name resolves to an
    /// operation.
    pub fn combinator(&self, name: &str) -> Result<CombinatorBuilderFn, BuildError> {
        match self.lookup(name)? {
            Builder::Combinator(f) => Ok(f),
            other => Err(BuildError::BuilderKind {
                name: name.to_string(),
                expected: "a combinator",
                actual: other.kind(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
