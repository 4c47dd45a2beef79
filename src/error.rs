//! Error types for pipeline construction.
//!
//! Every failure during a build surfaces as a single [`BuildError`] whose
//! source chain, read outward-in, reconstructs the failure path through the
//! configuration tree: stage, element, branch, and finally the structural
//! violation that started it. Nothing is silently recovered; every recursive
//! build call wraps callee failures with its own context via
//! [`BuildContext::build_context`].

use thiserror::Error;

/// Unified error type for pipeline builds.
///
/// # Categories
///
/// - `Structural`: wrong shape or type, wrong member count, empty required
///   collection. Detected locally, before any builder call.
/// - `UnknownBuilder`: registry lookup miss.
/// - `BuilderKind`: a builder was found under the requested name but is the
///   wrong kind (operation vs. combinator).
/// - `Context`: wraps any of the above (or another `Context`) raised while
///   building a sub-element, carrying a description of where.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration has the wrong shape.
    #[error("{0}")]
    Structural(String),

    /// No builder registered under the requested name.
    #[error("no builder registered under \"{0}\"")]
    UnknownBuilder(String),

    /// A builder exists under the name but is the wrong kind.
    #[error("builder \"{name}\" is {actual} builder, expected {expected}")]
    BuilderKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A nested build failed; `source` is the callee's error.
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Create a structural error.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    /// Wrap this error with caller context.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error in the chain.
    pub fn root_cause(&self) -> &BuildError {
        match self {
            Self::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Render the full context chain, outermost first.
    ///
    /// Useful when the error leaves the library boundary and the consumer
    /// flattens it to one line (the CLI does this).
    pub fn render_chain(&self) -> String {
        match self {
            Self::Context { context, source } => {
                format!("{}: {}", context, source.render_chain())
            }
            other => other.to_string(),
        }
    }
}

/// Extension trait adding context wrapping to build results.
pub trait BuildContext<T> {
    /// Wrap any error with the given context, preserving the original as
    /// the source.
    fn build_context<F, S>(self, f: F) -> Result<T, BuildError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> BuildContext<T> for Result<T, BuildError> {
    fn build_context<F, S>(self, f: F) -> Result<T, BuildError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain_renders_outermost_first() {
        let err = BuildError::structural("\"map\" configuration must not be empty")
            .context("failed to build the \"map\" object")
            .context("normalize stage: failed to build element 2");

        let chain = err.render_chain();
        assert_eq!(
            chain,
            "normalize stage: failed to build element 2: \
             failed to build the \"map\" object: \
             \"map\" configuration must not be empty"
        );
    }

    #[test]
    fn test_root_cause_unwraps_contexts() {
        let err = BuildError::UnknownBuilder("mystery".to_string())
            .context("outer")
            .context("outermost");

        match err.root_cause() {
            BuildError::UnknownBuilder(name) => assert_eq!(name, "mystery"),
            other => panic!("unexpected root cause: {other}"),
        }
    }

    #[test]
    fn test_build_context_passes_ok_through() {
        let ok: Result<i32, BuildError> = Ok(7);
        assert_eq!(ok.build_context(|| "never used").unwrap(), 7);
    }

    #[test]
    fn test_source_chain_is_walkable() {
        use std::error::Error;

        let err = BuildError::structural("bad shape").context("while building");
        let source = err.source().expect("context should carry a source");
        assert_eq!(source.to_string(), "bad shape");
    }
}
