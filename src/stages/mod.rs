//! Stage compilers.
//!
//! A stage is a named, independently built unit of the event pipeline. Each
//! stage compiler walks its slice of the declarative configuration,
//! resolves operation and combinator builders through the [`Registry`], and
//! returns one [`Lifter`]. Compilation is single-threaded, synchronous and
//! side-effect-free on the configuration; execution happens later, when the
//! engine drives documents through the result.

pub mod check;
pub mod normalize;

pub use check::build_check_stage;
pub use normalize::build_normalize_stage;

use serde_json::Value;

use crate::error::{BuildContext, BuildError};
use crate::registry::Registry;
use crate::trace::TraceSink;
use crate::transform::Lifter;

/// Builds one stage from its slice of the asset configuration.
pub type StageBuilderFn = fn(&Value, &Registry, &TraceSink) -> Result<Lifter, BuildError>;

/// Recognized stages, in execution order.
static STAGE_BUILDERS: &[(&str, StageBuilderFn)] = &[
    ("check", build_check_stage),
    ("normalize", build_normalize_stage),
];

/// Compile a whole asset definition into one transform.
///
/// An asset is an object of `stage-name: stage-config` members. Stages are
/// compiled and chained in the fixed order of the stage table (`check`
/// before `normalize`); an asset with no recognized stage compiles to the
/// identity transform.
pub fn compile_asset(
    asset: &Value,
    registry: &Registry,
    tracer: &TraceSink,
) -> Result<Lifter, BuildError> {
    let Some(members) = asset.as_object() else {
        let msg = format!(
            "asset definition must be an object, got {}",
            value_kind(asset)
        );
        log::error!("{msg}");
        return Err(BuildError::structural(msg));
    };

    for name in members.keys() {
        if !STAGE_BUILDERS.iter().any(|(known, _)| *known == name.as_str()) {
            let msg = format!("unknown stage \"{name}\"");
            log::error!("{msg}");
            return Err(BuildError::structural(msg).context("failed to compile asset"));
        }
    }

    let mut stages = Vec::new();
    for (name, builder) in STAGE_BUILDERS {
        if let Some(config) = members.get(*name) {
            let stage = builder(config, registry, tracer)
                .build_context(|| format!("failed to build stage \"{name}\""))?;
            stages.push(stage);
        }
    }

    let chain = registry
        .combinator("combinator.chain")
        .build_context(|| "failed to compose asset stages")?;
    Ok(chain(stages))
}

/// Human-readable kind of a configuration value, for structural errors.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
