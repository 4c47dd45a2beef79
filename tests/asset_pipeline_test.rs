use eventpipe::{compile_asset, Document, DocumentSet, Registry, TraceSink};
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::json;

fn drive(pipeline: &eventpipe::Lifter, input: serde_json::Value) -> Vec<serde_json::Value> {
    let mut docs = DocumentSet::new();
    let handle = docs.insert(Document::from_value(input));
    pipeline
        .apply(&mut docs, vec![handle])
        .into_iter()
        .map(|h| docs.get(h).root().clone())
        .collect()
}

#[test]
fn test_yaml_asset_compiles_and_runs() {
    // Same shape the CLI accepts from a decoder definition file.
    let yaml = indoc! {r#"
        check:
          - source.module: sshd
        normalize:
          - map:
              event.category: authentication
          - check:
              - event.outcome: failure
            map:
              alert: true
    "#};

    let asset: serde_json::Value = serde_yaml::from_str(yaml).unwrap();
    let registry = Registry::with_defaults();
    let pipeline = compile_asset(&asset, &registry, &TraceSink::null()).unwrap();

    // Non-sshd events are dropped by the check stage.
    let out = drive(&pipeline, json!({"source": {"module": "auditd"}}));
    assert!(out.is_empty());

    // An sshd failure gets both the unconditional and conditional mappings.
    let out = drive(
        &pipeline,
        json!({"source": {"module": "sshd"}, "event": {"outcome": "failure"}}),
    );
    assert_eq!(out.len(), 1);
    assert_eq!(
        out[0],
        json!({
            "source": {"module": "sshd"},
            "event": {"category": "authentication", "outcome": "failure"},
            "alert": true,
        })
    );

    // An sshd success is normalized but not flagged.
    let out = drive(
        &pipeline,
        json!({"source": {"module": "sshd"}, "event": {"outcome": "success"}}),
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].get("alert"), None);
}

#[test]
fn test_asset_build_failure_reports_full_path() {
    let yaml = indoc! {r#"
        normalize:
          - check:
              - event.kind: alert
            map: {}
    "#};

    let asset: serde_json::Value = serde_yaml::from_str(yaml).unwrap();
    let registry = Registry::with_defaults();
    let err = compile_asset(&asset, &registry, &TraceSink::null())
        .err()
        .unwrap();

    let chain = err.render_chain();
    assert!(chain.contains("failed to build stage \"normalize\""));
    assert!(chain.contains("failed to build element 0"));
    assert!(chain.contains("conditional map: failed to build the \"map\" object"));
    assert!(chain.contains("\"map\" configuration must not be empty"));
}

#[test]
fn test_trace_lines_flow_from_operations() {
    let (tracer, buffer) = TraceSink::collector();
    let registry = Registry::with_defaults();
    let asset = json!({
        "normalize": [
            {"map": {"tagged": true}},
            {"check": [{"missing": "value"}], "map": {"never": true}},
        ]
    });
    let pipeline = compile_asset(&asset, &registry, &tracer).unwrap();

    let mut docs = DocumentSet::new();
    let handle = docs.insert(Document::new());
    pipeline.apply(&mut docs, vec![handle]);

    let lines = buffer.lock().unwrap().clone();
    assert_eq!(lines, vec!["map: set \"tagged\"", "check: dropped"]);
}

#[test]
fn test_compiled_pipeline_is_reusable() {
    let registry = Registry::with_defaults();
    let asset = json!({"normalize": [{"map": {"n": 1}}]});
    let pipeline = compile_asset(&asset, &registry, &TraceSink::null()).unwrap();

    for _ in 0..3 {
        let out = drive(&pipeline, json!({}));
        assert_eq!(out, vec![json!({"n": 1})]);
    }
}
