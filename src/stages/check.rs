//! The `check` stage compiler.
//!
//! A `check` stage is a bare condition array applied to the whole stream:
//! documents that fail any condition are dropped before later stages run.
//! The condition set builds into one `check` operation wrapped with
//! `combinator.chain`, the same uniform shape every stage compiles to.

use serde_json::Value;

use super::value_kind;
use crate::error::{BuildContext, BuildError};
use crate::registry::Registry;
use crate::trace::TraceSink;
use crate::transform::Lifter;

/// Compile a `check` stage configuration into a filtering transform.
pub fn build_check_stage(
    config: &Value,
    registry: &Registry,
    tracer: &TraceSink,
) -> Result<Lifter, BuildError> {
    let Some(conditions) = config.as_array() else {
        let msg = format!(
            "stage \"check\" expects an array, got {}",
            value_kind(config)
        );
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    };

    if conditions.is_empty() {
        let msg = "stage \"check\" must not be empty";
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    }

    let op = registry
        .operation("check")
        .and_then(|build| build(config, tracer))
        .build_context(|| "stage \"check\": failed to build the condition set")?;

    let chain = registry
        .combinator("combinator.chain")
        .build_context(|| "stage \"check\": failed to compose")?;
    Ok(chain(vec![op]))
}
