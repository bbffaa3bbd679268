//! Deployment template emission.
//!
//! Renders a composed [`GroupDescriptor`] into the JSON document the
//! Provisioning Backend consumes: a `parameters` section carrying the
//! externally supplied credential reference and a `resources` section with
//! one entry per declared resource. Emission is deterministic for identical
//! descriptors.

use serde_json::{Value, json};
use tracing::info;

use crate::group::GroupDescriptor;
use crate::identity::AttachmentTarget;

/// Render the group descriptor graph as a deployment template.
pub fn emit(group: &GroupDescriptor) -> Value {
    let functions: Vec<Value> = group
        .functions
        .iter()
        .zip(&group.aliases)
        .map(|(f, alias)| {
            json!({
                "id": f.id,
                "artifact": {
                    "path": f.artifact.path,
                    "sha256": f.artifact.sha256,
                    "size_bytes": f.artifact.size_bytes,
                },
                "alias": { "name": alias.name, "version": alias.version },
                "handler": f.handler,
                "memory_mb": f.memory_mb,
                "timeout_secs": f.timeout_secs,
                "pinned": f.pinned,
                "environment": f.env,
            })
        })
        .collect();

    let subscriptions: Vec<Value> = group
        .routing
        .entries()
        .iter()
        .map(|e| json!({ "source": e.source, "topic": e.topic, "target": e.target }))
        .collect();

    let attachments: Vec<Value> = group
        .attachments
        .iter()
        .map(|a| {
            let (kind, name) = match &a.target {
                AttachmentTarget::Thing(name) => ("thing", name),
                AttachmentTarget::Policy(name) => ("policy", name),
            };
            json!({ "credential": a.credential_ref, "target_kind": kind, "target": name })
        })
        .collect();

    let template = json!({
        "parameters": {
            "credentialRef": group.identity.credential_ref,
        },
        "resources": {
            "thing": {
                "name": group.identity.thing_name,
            },
            "policy": {
                "name": group.policy.name,
                "statements": group.policy.statements,
            },
            "attachments": attachments,
            "core": {
                "thing": group.identity.thing_name,
                "credential": group.identity.credential_ref,
                "sync_shadow": group.identity.sync_shadow,
            },
            "function_definition": { "functions": functions },
            "subscription_definition": { "subscriptions": subscriptions },
            "logger_definition": { "loggers": group.loggers },
            "group": {
                "name": group.name,
                "persistent_sessions": group.persistent_sessions,
            },
        },
    });

    info!(group = %group.name, "emitted deployment template");
    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{CodeArtifact, FunctionConfig, FunctionDescriptor};
    use crate::group::{GroupBuilder, GroupDescriptor};
    use crate::identity::Identity;
    use crate::logger::LoggerDescriptor;
    use crate::routing::{Endpoint, RoutingTable};

    fn group() -> GroupDescriptor {
        let (identity, policy, attachments) = Identity::new("edge_core", "cred-1", true);
        let artifact = CodeArtifact {
            path: "dist/bundle".to_string(),
            size_bytes: 64,
            sha256: "deadbeef".to_string(),
        };
        let (f, a) =
            FunctionDescriptor::new("jobs", artifact, FunctionConfig::default()).unwrap();
        GroupBuilder::new("edge_group", identity, policy, attachments)
            .function(f, a)
            .routing(RoutingTable::new().add(
                Endpoint::function("jobs"),
                "$aws/things/edge_core/#",
                Endpoint::Cloud,
            ))
            .logger(LoggerDescriptor::default())
            .persistent_sessions(true)
            .compose()
            .unwrap()
    }

    #[test]
    fn test_all_resources_present() {
        let template = emit(&group());
        let resources = &template["resources"];
        for key in [
            "thing",
            "policy",
            "attachments",
            "core",
            "function_definition",
            "subscription_definition",
            "logger_definition",
            "group",
        ] {
            assert!(!resources[key].is_null(), "missing resource: {key}");
        }
        assert_eq!(template["parameters"]["credentialRef"], "cred-1");
    }

    #[test]
    fn test_alias_bound_to_artifact_version() {
        let template = emit(&group());
        let function = &template["resources"]["function_definition"]["functions"][0];
        assert_eq!(function["alias"]["version"], function["artifact"]["sha256"]);
    }

    #[test]
    fn test_emission_deterministic() {
        let g = group();
        let first = serde_json::to_string(&emit(&g)).unwrap();
        let second = serde_json::to_string(&emit(&g)).unwrap();
        assert_eq!(first, second);
    }
}
