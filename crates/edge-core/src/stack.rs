//! Assemble a full group descriptor from an `edgestack.toml` config, a
//! packaged artifact, and the externally supplied credential reference.
//!
//! This is the one place where the config surface is turned into descriptor
//! values; everything downstream works on descriptors only.

use anyhow::Result;

use crate::config::StackConfig;
use crate::function::{CodeArtifact, FunctionConfig, FunctionDescriptor};
use crate::group::{GroupBuilder, GroupDescriptor};
use crate::identity::Identity;
use crate::logger::{LogLevel, LoggerDescriptor, LoggerTarget};
use crate::routing::{Endpoint, RoutingTable};

/// Build and compose the group. Fails on out-of-range function settings,
/// unknown logger targets or levels, and routing cross-reference violations.
pub fn assemble(
    config: &StackConfig,
    artifact: CodeArtifact,
    credential_ref: &str,
) -> Result<GroupDescriptor> {
    let (identity, policy, attachments) =
        Identity::new(&config.thing.name, credential_ref, config.thing.sync_shadow);

    let function_config = FunctionConfig {
        handler: config.function.handler.clone(),
        memory_mb: config.function.memory_mb.unwrap_or(128),
        timeout_secs: config.function.timeout_secs.unwrap_or(300),
        pinned: config.function.pinned.unwrap_or(true),
        env: config.function.env.clone(),
    };
    let (descriptor, alias) =
        FunctionDescriptor::new(&config.function.id, artifact, function_config)?;

    let routing = config.subscription.iter().fold(RoutingTable::new(), |table, sub| {
        table.add(Endpoint::parse(&sub.source), &sub.topic, Endpoint::parse(&sub.target))
    });

    let mut builder = GroupBuilder::new(&config.group.name, identity, policy, attachments)
        .function(descriptor, alias)
        .routing(routing)
        .persistent_sessions(config.group.persistent_sessions);

    for logger in &config.logger {
        builder = builder.logger(LoggerDescriptor::new(
            LoggerTarget::parse(&logger.target)?,
            LogLevel::parse(logger.level.as_deref().unwrap_or("DEBUG"))?,
            logger.space_mb.unwrap_or(32),
        ));
    }

    Ok(builder.compose()?)
}
