//! Function descriptors — a packaged artifact plus its runtime metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ConfigurationError, CoreResult};

/// Lowest memory size the Provisioning Backend accepts, in MiB.
pub const MEMORY_MIN_MB: u64 = 16;
/// Highest memory size the Provisioning Backend accepts, in MiB.
pub const MEMORY_MAX_MB: u64 = 3008;
/// Shortest accepted timeout, in seconds.
pub const TIMEOUT_MIN_SECS: u64 = 1;
/// Longest accepted timeout, in seconds.
pub const TIMEOUT_MAX_SECS: u64 = 900;

/// Opaque reference to a packaged code bundle.
///
/// Produced by `edge-pack`; immutable once built. The sha256 digest doubles
/// as the artifact's version identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeArtifact {
    /// Filesystem location of the persisted bundle.
    pub path: String,
    /// Total bundle size in bytes.
    pub size_bytes: u64,
    /// Hex sha256 digest over the bundle tree, in sorted path order.
    pub sha256: String,
}

impl CodeArtifact {
    /// The artifact's version identifier (its content digest).
    pub fn version(&self) -> &str {
        &self.sha256
    }
}

/// Runtime settings for a function descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionConfig {
    /// Entry point, e.g. `lambda.handler`.
    pub handler: String,
    /// Memory limit in MiB.
    pub memory_mb: u64,
    /// Execution timeout in seconds.
    pub timeout_secs: u64,
    /// Keep the function resident between invocations.
    pub pinned: bool,
    /// Environment variables injected at startup. Keys unique.
    pub env: BTreeMap<String, String>,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            handler: "lambda.handler".to_string(),
            memory_mb: 128,
            timeout_secs: 300,
            pinned: true,
            env: BTreeMap::new(),
        }
    }
}

/// An immutable function descriptor bound to one artifact version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDescriptor {
    /// Logical function id, unique within a group.
    pub id: String,
    pub artifact: CodeArtifact,
    pub handler: String,
    pub memory_mb: u64,
    pub timeout_secs: u64,
    pub pinned: bool,
    pub env: BTreeMap<String, String>,
}

/// A stable name bound to a specific artifact version.
///
/// Deployments reference the alias, not raw version ids, so a new artifact
/// only requires re-pointing the alias.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alias {
    pub name: String,
    pub function_id: String,
    /// Artifact version the alias currently points at.
    pub version: String,
}

impl FunctionDescriptor {
    /// Build a descriptor and its `prod` alias from an artifact and config.
    ///
    /// Memory and timeout are range-checked locally so a bad value fails at
    /// composition time rather than inside the Provisioning Backend.
    pub fn new(
        id: &str,
        artifact: CodeArtifact,
        config: FunctionConfig,
    ) -> CoreResult<(FunctionDescriptor, Alias)> {
        if config.handler.trim().is_empty() {
            return Err(ConfigurationError::EmptyHandler(id.to_string()));
        }
        if !(MEMORY_MIN_MB..=MEMORY_MAX_MB).contains(&config.memory_mb) {
            return Err(ConfigurationError::MemoryOutOfRange(config.memory_mb));
        }
        if !(TIMEOUT_MIN_SECS..=TIMEOUT_MAX_SECS).contains(&config.timeout_secs) {
            return Err(ConfigurationError::TimeoutOutOfRange(config.timeout_secs));
        }

        let alias = Alias {
            name: "prod".to_string(),
            function_id: id.to_string(),
            version: artifact.sha256.clone(),
        };
        let descriptor = FunctionDescriptor {
            id: id.to_string(),
            artifact,
            handler: config.handler,
            memory_mb: config.memory_mb,
            timeout_secs: config.timeout_secs,
            pinned: config.pinned,
            env: config.env,
        };
        Ok((descriptor, alias))
    }

    /// The alias for this descriptor's current artifact version.
    pub fn alias(&self) -> Alias {
        Alias {
            name: "prod".to_string(),
            function_id: self.id.clone(),
            version: self.artifact.sha256.clone(),
        }
    }
}
