//! End-to-end composition pipeline: config → pack → assemble → emit.

use std::fs;
use std::path::PathBuf;

use edge_core::{StackConfig, stack, template};
use tempfile::TempDir;

fn create_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let project = dir.path().to_path_buf();

    let config = StackConfig::scaffold("edge_core");
    fs::write(project.join("edgestack.toml"), config.to_toml_string().unwrap()).unwrap();

    let source = project.join("src");
    fs::create_dir_all(&source).unwrap();
    fs::write(
        source.join("lambda.py"),
        "def handler(event, context):\n    return {'ok': True}\n",
    )
    .unwrap();
    fs::write(source.join("requirements.txt"), "# no dependencies\n").unwrap();

    (dir, project)
}

#[test]
fn synth_pipeline_emits_consistent_template() {
    let (_dir, project) = create_project();

    let config = StackConfig::from_file(&project.join("edgestack.toml")).unwrap();
    let source = project.join(&config.function.source);
    let artifact = edge_pack::pack(&source, config.function.manifest.as_deref()).unwrap();

    let group = stack::assemble(&config, artifact.clone(), "cred-1").unwrap();
    let rendered = template::emit(&group);

    // The alias in the template points at exactly the artifact we packed.
    let function = &rendered["resources"]["function_definition"]["functions"][0];
    assert_eq!(function["alias"]["version"], serde_json::json!(artifact.sha256));
    assert_eq!(function["environment"]["THING_NAME"], "edge_core");

    // Both credential attachments are declared.
    let attachments = rendered["resources"]["attachments"].as_array().unwrap();
    assert_eq!(attachments.len(), 2);
    assert!(attachments.iter().all(|a| a["credential"] == "cred-1"));

    // Both scaffold subscriptions survive, in declaration order.
    let subs = rendered["resources"]["subscription_definition"]["subscriptions"]
        .as_array()
        .unwrap();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0]["topic"], "$aws/things/edge_core/#");
    assert_eq!(subs[1]["topic"], "$aws/things/edge_core/jobs/#");
}

#[test]
fn synth_pipeline_is_deterministic() {
    let (_dir, project) = create_project();
    let config = StackConfig::from_file(&project.join("edgestack.toml")).unwrap();
    let source = project.join(&config.function.source);

    let emit_once = || {
        let artifact = edge_pack::pack(&source, config.function.manifest.as_deref()).unwrap();
        let group = stack::assemble(&config, artifact, "cred-1").unwrap();
        serde_json::to_string(&template::emit(&group)).unwrap()
    };

    assert_eq!(emit_once(), emit_once());
}

#[test]
fn synth_pipeline_rejects_dangling_route() {
    let (_dir, project) = create_project();
    let mut config = StackConfig::from_file(&project.join("edgestack.toml")).unwrap();
    config.subscription[1].target = "metrics".to_string();

    let source = project.join(&config.function.source);
    let artifact = edge_pack::pack(&source, config.function.manifest.as_deref()).unwrap();

    let err = stack::assemble(&config, artifact, "cred-1").unwrap_err();
    assert!(err.to_string().contains("metrics"));
}
