//! Reference graph between grammar rules.
//!
//! An edge `C -> A` means some alternative of rule `C` expands into `A`.
//! Used to find rules that can never be expanded.

use std::collections::{BTreeMap, BTreeSet};

use super::RuleAlternative;

/// Directed graph of rule references.
#[derive(Debug, Default)]
pub struct RuleGraph {
    /// Adjacency list: rule -> rules its alternatives reference.
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl RuleGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a set of rules.
    pub fn from_rules<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [RuleAlternative])>,
    {
        let mut graph = Self::new();
        for (name, alternatives) in rules {
            graph.register(name);
            for alternative in alternatives {
                for target in &alternative.argument_types {
                    graph.add_reference(name, target);
                }
            }
        }
        graph
    }

    /// Register a rule even if it references nothing.
    pub fn register(&mut self, rule: &str) {
        self.edges.entry(rule.to_string()).or_default();
    }

    /// Record that `from` expands into `to`.
    pub fn add_reference(&mut self, from: &str, to: &str) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    /// Rules directly referenced by `rule`.
    pub fn references_of(&self, rule: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(rule)
            .into_iter()
            .flatten()
            .map(|s| s.as_str())
    }

    /// Every rule reachable from `start`, including `start` itself.
    pub fn reachable_from(&self, start: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![start.to_string()];

        while let Some(rule) = stack.pop() {
            if !seen.insert(rule.clone()) {
                continue;
            }
            for next in self.references_of(&rule) {
                if !seen.contains(next) {
                    stack.push(next.to_string());
                }
            }
        }

        seen
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph has no rules.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
