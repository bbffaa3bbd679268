//! Group composition — the terminal, validate-then-emit assembly step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::CompositionError;
use crate::function::{Alias, FunctionDescriptor};
use crate::identity::{Attachments, Identity, PolicyDocument};
use crate::logger::LoggerDescriptor;
use crate::routing::RoutingTable;

/// A deployable unit: one identity, its functions, routing, and loggers.
///
/// Only constructed through [`GroupBuilder::compose`], which enforces the
/// cross-reference invariant between routing entries and the function set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupDescriptor {
    pub name: String,
    pub identity: Identity,
    pub policy: PolicyDocument,
    pub attachments: Attachments,
    pub functions: Vec<FunctionDescriptor>,
    pub aliases: Vec<Alias>,
    pub routing: RoutingTable,
    pub loggers: Vec<LoggerDescriptor>,
    /// Ask the bus for persistent sessions (QoS1 delivery to the group).
    pub persistent_sessions: bool,
}

/// Collects descriptors and composes them into a [`GroupDescriptor`].
#[derive(Debug, Clone)]
pub struct GroupBuilder {
    name: String,
    identity: Identity,
    policy: PolicyDocument,
    attachments: Attachments,
    functions: Vec<FunctionDescriptor>,
    aliases: Vec<Alias>,
    routing: RoutingTable,
    loggers: Vec<LoggerDescriptor>,
    persistent_sessions: bool,
}

impl GroupBuilder {
    pub fn new(
        name: &str,
        identity: Identity,
        policy: PolicyDocument,
        attachments: Attachments,
    ) -> Self {
        Self {
            name: name.to_string(),
            identity,
            policy,
            attachments,
            functions: Vec::new(),
            aliases: Vec::new(),
            routing: RoutingTable::new(),
            loggers: Vec::new(),
            persistent_sessions: false,
        }
    }

    pub fn function(mut self, descriptor: FunctionDescriptor, alias: Alias) -> Self {
        self.functions.push(descriptor);
        self.aliases.push(alias);
        self
    }

    pub fn routing(mut self, table: RoutingTable) -> Self {
        self.routing = table;
        self
    }

    pub fn logger(mut self, logger: LoggerDescriptor) -> Self {
        self.loggers.push(logger);
        self
    }

    pub fn persistent_sessions(mut self, enabled: bool) -> Self {
        self.persistent_sessions = enabled;
        self
    }

    /// Validate cross-references and emit the group descriptor.
    ///
    /// Every function referenced by a routing entry must be in the group's
    /// function set. Violations abort before anything is emitted.
    pub fn compose(self) -> Result<GroupDescriptor, CompositionError> {
        if self.functions.is_empty() {
            return Err(CompositionError::NoFunctions(self.name));
        }

        let known: BTreeSet<&str> =
            self.functions.iter().map(|f| f.id.as_str()).collect();
        for id in self.routing.referenced_functions() {
            if !known.contains(id) {
                return Err(CompositionError::UnknownFunction(id.to_string()));
            }
        }

        debug!(
            group = %self.name,
            functions = self.functions.len(),
            routes = self.routing.entries().len(),
            loggers = self.loggers.len(),
            "composed group descriptor"
        );

        Ok(GroupDescriptor {
            name: self.name,
            identity: self.identity,
            policy: self.policy,
            attachments: self.attachments,
            functions: self.functions,
            aliases: self.aliases,
            routing: self.routing,
            loggers: self.loggers,
            persistent_sessions: self.persistent_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{CodeArtifact, FunctionConfig};
    use crate::logger::{LogLevel, LoggerTarget};
    use crate::routing::Endpoint;

    fn function(id: &str) -> (FunctionDescriptor, Alias) {
        let artifact = CodeArtifact {
            path: "dist/bundle".to_string(),
            size_bytes: 64,
            sha256: "deadbeef".to_string(),
        };
        FunctionDescriptor::new(id, artifact, FunctionConfig::default()).unwrap()
    }

    fn builder() -> GroupBuilder {
        let (identity, policy, attachments) = Identity::new("edge_core", "cred-1", true);
        GroupBuilder::new("edge_group", identity, policy, attachments)
    }

    #[test]
    fn test_compose_happy_path() {
        let (f, a) = function("jobs");
        let table = RoutingTable::new()
            .add(Endpoint::function("jobs"), "$aws/things/edge_core/#", Endpoint::Cloud);
        let group = builder()
            .function(f, a)
            .routing(table)
            .persistent_sessions(true)
            .compose()
            .unwrap();
        assert_eq!(group.functions.len(), 1);
        assert!(group.persistent_sessions);
    }

    #[test]
    fn test_unknown_routed_function_rejected() {
        let (f, a) = function("jobs");
        let table = RoutingTable::new()
            .add(Endpoint::function("metrics"), "a/#", Endpoint::Cloud);
        let err = builder().function(f, a).routing(table).compose().unwrap_err();
        assert_eq!(err, CompositionError::UnknownFunction("metrics".to_string()));
    }

    #[test]
    fn test_empty_function_set_rejected() {
        let err = builder().compose().unwrap_err();
        assert!(matches!(err, CompositionError::NoFunctions(_)));
    }

    #[test]
    fn test_distinct_logger_targets_coexist() {
        let (f, a) = function("jobs");
        let group = builder()
            .function(f, a)
            .logger(LoggerDescriptor::new(LoggerTarget::UserFunction, LogLevel::Debug, 32))
            .logger(LoggerDescriptor::new(LoggerTarget::System, LogLevel::Debug, 32))
            .compose()
            .unwrap();
        assert_eq!(group.loggers.len(), 2);
        assert_ne!(group.loggers[0].target, group.loggers[1].target);
        assert_eq!(group.loggers[0].level, group.loggers[1].level);
        assert_eq!(group.loggers[0].space_mb, group.loggers[1].space_mb);
    }
}
