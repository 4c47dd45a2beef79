// Export modules for library usage
pub mod cli;
pub mod combinators;
pub mod document;
pub mod error;
pub mod operations;
pub mod registry;
pub mod stages;
pub mod trace;
pub mod transform;

// Re-export commonly used types
pub use crate::document::{DocHandle, Document, DocumentSet, FieldPath};
pub use crate::error::{BuildContext, BuildError};
pub use crate::registry::{Builder, CombinatorBuilderFn, OperationBuilderFn, Registry};
pub use crate::stages::{build_check_stage, build_normalize_stage, compile_asset};
pub use crate::trace::TraceSink;
pub use crate::transform::{FnTransform, Identity, Lifter, Transform};
