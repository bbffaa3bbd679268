//! Pub/sub routing between functions and the managed message bus.

use serde::{Deserialize, Serialize};

/// One end of a routing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    /// A function descriptor in the same group, by id.
    Function { id: String },
    /// The managed cloud message bus.
    Cloud,
}

impl Endpoint {
    pub fn function(id: &str) -> Self {
        Endpoint::Function { id: id.to_string() }
    }

    /// Parse a config-file endpoint: `"cloud"` is the bus, anything else is
    /// a function id. Unknown ids are caught by the composition step's
    /// cross-reference check, not here.
    pub fn parse(s: &str) -> Self {
        if s == "cloud" {
            Endpoint::Cloud
        } else {
            Endpoint::function(s)
        }
    }
}

/// One directional binding: messages matching `topic` flow source → target.
///
/// Topic patterns may contain wildcard segments (`+`, `#`). No local syntax
/// validation is performed; malformed patterns surface as Provisioning
/// Backend errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutingEntry {
    pub source: Endpoint,
    pub topic: String,
    pub target: Endpoint,
}

/// Ordered sequence of routing entries.
///
/// `add` takes and returns the table by value so declarations chain without
/// shared mutable state. Duplicates are kept; each entry is provisioned as a
/// separate binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoutingTable {
    entries: Vec<RoutingEntry>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, source: Endpoint, topic: &str, target: Endpoint) -> Self {
        self.entries.push(RoutingEntry {
            source,
            topic: topic.to_string(),
            target,
        });
        self
    }

    pub fn entries(&self) -> &[RoutingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Function ids referenced by any entry, for cross-reference checks.
    pub fn referenced_functions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|e| {
            [&e.source, &e.target].into_iter().filter_map(|ep| match ep {
                Endpoint::Function { id } => Some(id.as_str()),
                Endpoint::Cloud => None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_chained_add_preserves_order() {
        let table = RoutingTable::new()
            .add(Endpoint::function("jobs"), "$aws/things/edge_core/#", Endpoint::Cloud)
            .add(Endpoint::Cloud, "$aws/things/edge_core/jobs/#", Endpoint::function("jobs"));
        assert_eq!(table.entries().len(), 2);
        assert_eq!(table.entries()[0].source, Endpoint::function("jobs"));
        assert_eq!(table.entries()[1].source, Endpoint::Cloud);
    }

    #[test]
    fn test_duplicates_kept() {
        let table = RoutingTable::new()
            .add(Endpoint::function("jobs"), "a/b", Endpoint::Cloud)
            .add(Endpoint::function("jobs"), "a/b", Endpoint::Cloud);
        assert_eq!(table.entries().len(), 2);
    }

    #[test]
    fn test_add_order_independent_as_set() {
        let forward = RoutingTable::new()
            .add(Endpoint::function("jobs"), "a/#", Endpoint::Cloud)
            .add(Endpoint::Cloud, "b/#", Endpoint::function("jobs"));
        let reversed = RoutingTable::new()
            .add(Endpoint::Cloud, "b/#", Endpoint::function("jobs"))
            .add(Endpoint::function("jobs"), "a/#", Endpoint::Cloud);

        let a: BTreeSet<_> = forward.entries().iter().cloned().collect();
        let b: BTreeSet<_> = reversed.entries().iter().cloned().collect();
        assert_eq!(a, b);
        assert_ne!(forward.entries(), reversed.entries());
    }

    #[test]
    fn test_referenced_functions() {
        let table = RoutingTable::new()
            .add(Endpoint::function("jobs"), "a/#", Endpoint::Cloud)
            .add(Endpoint::Cloud, "b/#", Endpoint::function("metrics"));
        let refs: BTreeSet<&str> = table.referenced_functions().collect();
        assert_eq!(refs, BTreeSet::from(["jobs", "metrics"]));
    }
}
