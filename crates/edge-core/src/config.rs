//! edgestack.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    pub thing: ThingConfig,
    pub function: FunctionSection,
    #[serde(default)]
    pub subscription: Vec<SubscriptionSection>,
    #[serde(default)]
    pub logger: Vec<LoggerSection>,
    pub group: GroupSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThingConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub sync_shadow: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSection {
    pub id: String,
    pub handler: String,
    /// Source directory to package, relative to the config file.
    pub source: String,
    /// Dependency manifest inside the source directory.
    pub manifest: Option<String>,
    pub memory_mb: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub pinned: Option<bool>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSection {
    /// "cloud" or a function id.
    pub source: String,
    pub topic: String,
    /// "cloud" or a function id.
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerSection {
    /// "user" or "system".
    pub target: String,
    pub level: Option<String>,
    pub space_mb: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSection {
    pub name: String,
    #[serde(default)]
    pub persistent_sessions: bool,
}

fn default_true() -> bool {
    true
}

impl StackConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StackConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a stack with one pinned jobs function, cloud round-trip
    /// subscriptions on the thing's namespace, and one local logger per
    /// target.
    pub fn scaffold(thing_name: &str) -> Self {
        let mut env = BTreeMap::new();
        env.insert("THING_NAME".to_string(), thing_name.to_string());

        StackConfig {
            thing: ThingConfig {
                name: thing_name.to_string(),
                sync_shadow: true,
            },
            function: FunctionSection {
                id: "jobs".to_string(),
                handler: "lambda.handler".to_string(),
                source: "src".to_string(),
                manifest: Some("requirements.txt".to_string()),
                memory_mb: Some(128),
                timeout_secs: Some(300),
                pinned: Some(true),
                env,
            },
            subscription: vec![
                SubscriptionSection {
                    source: "jobs".to_string(),
                    topic: format!("$aws/things/{thing_name}/#"),
                    target: "cloud".to_string(),
                },
                SubscriptionSection {
                    source: "cloud".to_string(),
                    topic: format!("$aws/things/{thing_name}/jobs/#"),
                    target: "jobs".to_string(),
                },
            ],
            logger: vec![
                LoggerSection {
                    target: "user".to_string(),
                    level: Some("DEBUG".to_string()),
                    space_mb: Some(32),
                },
                LoggerSection {
                    target: "system".to_string(),
                    level: Some("DEBUG".to_string()),
                    space_mb: Some(32),
                },
            ],
            group: GroupSection {
                name: format!("{thing_name}_group"),
                persistent_sessions: true,
            },
        }
    }
}
