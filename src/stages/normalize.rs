//! The `normalize` stage compiler.
//!
//! The stage configuration is an array of entries; each entry is either a
//! plain map (`{"map": {...}}`) or a check-guarded conditional map
//! (`{"check": [...], "map": {...}}`, exactly those two members). Every
//! entry becomes one branch: a `combinator.chain` of its operations, so a
//! plain and a conditional branch have the same shape afterward.
//!
//! All branches observe the same input documents, and a map mutation made
//! by one branch is visible to the rest because documents are mutated in
//! place through the arena. The stage as a whole still emits exactly one
//! output per input: [`NormalizeStage`] runs every branch as a
//! mutation-only pass whose own output is discarded, then forwards each
//! input handle once, in order. A conditional branch whose check fails
//! short-circuits only its own map, since check precedes map inside the
//! branch chain.

use serde_json::Value;

use super::value_kind;
use crate::document::{DocHandle, DocumentSet};
use crate::error::{BuildContext, BuildError};
use crate::registry::Registry;
use crate::trace::TraceSink;
use crate::transform::{Lifter, Transform};

/// Compile a `normalize` stage configuration into a 1:1 transform.
///
/// Fails with a chained [`BuildError`] on any malformed entry; no partial
/// pipeline is ever returned.
pub fn build_normalize_stage(
    config: &Value,
    registry: &Registry,
    tracer: &TraceSink,
) -> Result<Lifter, BuildError> {
    let Some(entries) = config.as_array() else {
        let msg = format!(
            "stage \"normalize\" expects an array, got {}",
            value_kind(config)
        );
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    };

    let mut branches = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(members) = entry.as_object() else {
            let msg = format!(
                "stage \"normalize\": element {index} must be an object, got {}",
                value_kind(entry)
            );
            log::error!("{msg}");
            return Err(BuildError::structural(msg));
        };

        let branch = if members.contains_key("map") {
            if members.contains_key("check") {
                conditional_map_branch(entry, registry, tracer)
            } else {
                map_branch(&entry["map"], registry, tracer)
            }
        } else {
            let msg = format!("stage \"normalize\": element {index} has no \"map\" member");
            log::error!("{msg}");
            Err(BuildError::structural(msg))
        };

        branches.push(branch.build_context(|| {
            format!("stage \"normalize\": failed to build element {index}")
        })?);
    }

    Ok(Box::new(NormalizeStage {
        passes: branches.into_iter().map(MutationPass::new).collect(),
    }))
}

/// Build a plain map branch: `chain([map])`.
fn map_branch(
    config: &Value,
    registry: &Registry,
    tracer: &TraceSink,
) -> Result<Lifter, BuildError> {
    let op = registry
        .operation("map")
        .and_then(|build| build(config, tracer))
        .build_context(|| "failed to build the \"map\" operation")?;

    let chain = registry.combinator("combinator.chain")?;
    Ok(chain(vec![op]))
}

/// Build a check branch: `chain([check])`.
///
/// The configuration must be the condition array itself; shape and
/// emptiness are validated here, before the operation builder runs.
fn check_branch(
    config: &Value,
    registry: &Registry,
    tracer: &TraceSink,
) -> Result<Lifter, BuildError> {
    let Some(conditions) = config.as_array() else {
        let msg = format!(
            "\"check\" must be an array of conditions, got {}",
            value_kind(config)
        );
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    };

    if conditions.is_empty() {
        let msg = "\"check\" must not be empty";
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    }

    let op = registry
        .operation("check")
        .and_then(|build| build(config, tracer))
        .build_context(|| "failed to build the \"check\" operation")?;

    let chain = registry.combinator("combinator.chain")?;
    Ok(chain(vec![op]))
}

/// Build a conditional map branch: `chain([check-branch, map-branch])`.
///
/// The entry must have exactly the two members `check` and `map`; arity is
/// validated before either half is built.
fn conditional_map_branch(
    entry: &Value,
    registry: &Registry,
    tracer: &TraceSink,
) -> Result<Lifter, BuildError> {
    let members = entry.as_object().expect("caller classified this entry");
    if members.len() != 2 {
        let msg = format!(
            "conditional map entry must have exactly two members, \
             \"check\" and \"map\", got {}",
            members.len()
        );
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    }

    let check = check_branch(&entry["check"], registry, tracer)
        .build_context(|| "conditional map: failed to build the \"check\" object")?;
    let map = map_branch(&entry["map"], registry, tracer)
        .build_context(|| "conditional map: failed to build the \"map\" object")?;

    let chain = registry.combinator("combinator.chain")?;
    Ok(chain(vec![check, map]))
}

/// Runs a branch for its mutation side effects only; forwards nothing.
struct MutationPass {
    branch: Lifter,
}

impl MutationPass {
    fn new(branch: Lifter) -> Self {
        Self { branch }
    }

    fn run(&self, docs: &mut DocumentSet, handle: DocHandle) {
        // A branch may emit the handle (all checks passed) or nothing; the
        // stage's own output does not depend on either.
        let _ = self.branch.apply(docs, vec![handle]);
    }
}

/// The compiled stage: 1:1 by construction.
///
/// Each document is fully processed by every branch before it is
/// forwarded, so downstream stages always see the union of all applied
/// mutations.
struct NormalizeStage {
    passes: Vec<MutationPass>,
}

impl Transform for NormalizeStage {
    fn apply(&self, docs: &mut DocumentSet, input: Vec<DocHandle>) -> Vec<DocHandle> {
        for &handle in &input {
            for pass in &self.passes {
                pass.run(docs, handle);
            }
        }
        input
    }

    fn name(&self) -> &str {
        "normalize"
    }
}
