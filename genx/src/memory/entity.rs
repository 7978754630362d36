//! The per-persona graph of entities and relations (spec §3 "Memory
//! entity"/"Relation", §4.5 "Graph()").

use std::collections::{HashSet, VecDeque};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::MemoryError;

/// `{label: string, attrs: map}`. Label is a colon-prefixed namespace, e.g.
/// `person:小明`, `topic:恐龙`, or the bare `self`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub label: String,
    pub attrs: Map<String, Value>,
}

/// A directed edge between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub rel_type: String,
}

/// A directed graph of entities, scoped to one persona. Relations are
/// stored as an adjacency list keyed by the source label.
#[derive(Default)]
pub struct Graph {
    entities: DashMap<String, Entity>,
    out_edges: DashMap<String, Vec<Relation>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entity(&self, label: impl Into<String>, attrs: Map<String, Value>) {
        let label = label.into();
        self.entities.insert(label.clone(), Entity { label, attrs });
    }

    /// Preserves existing keys, overwrites the ones provided, adds new ones
    /// (spec §4.5 "`MergeAttrs` preserves existing keys, overwrites provided
    /// ones, adds new ones").
    pub fn merge_attrs(&self, label: &str, updates: Map<String, Value>) -> Result<(), MemoryError> {
        let mut entry = self
            .entities
            .get_mut(label)
            .ok_or_else(|| MemoryError::NotFound(label.to_string()))?;
        for (k, v) in updates {
            entry.attrs.insert(k, v);
        }
        Ok(())
    }

    pub fn get_entity(&self, label: &str) -> Option<Entity> {
        self.entities.get(label).map(|e| e.clone())
    }

    pub fn has_entity(&self, label: &str) -> bool {
        self.entities.contains_key(label)
    }

    /// Adds a directed edge. Both endpoints must already exist (spec §3
    /// invariant: "endpoints must exist, else fail with `ErrNotFound`").
    pub fn add_relation(&self, rel: Relation) -> Result<(), MemoryError> {
        if !self.has_entity(&rel.from) {
            return Err(MemoryError::NotFound(rel.from.clone()));
        }
        if !self.has_entity(&rel.to) {
            return Err(MemoryError::NotFound(rel.to.clone()));
        }
        self.out_edges.entry(rel.from.clone()).or_default().push(rel);
        Ok(())
    }

    /// Breadth-first traversal up to `hops` edges, returning the reachable
    /// set of labels (including every seed), visited-marked to guard
    /// against cycles (spec §4.5, §9 "Graph cycles").
    pub fn expand(&self, seeds: &[String], hops: u32) -> HashSet<String> {
        let mut visited: HashSet<String> = seeds.iter().cloned().collect();
        let mut frontier: VecDeque<(String, u32)> = seeds.iter().map(|s| (s.clone(), 0)).collect();
        while let Some((label, depth)) = frontier.pop_front() {
            if depth >= hops {
                continue;
            }
            if let Some(edges) = self.out_edges.get(&label) {
                for rel in edges.iter() {
                    if visited.insert(rel.to.clone()) {
                        frontier.push_back((rel.to.clone(), depth + 1));
                    }
                }
            }
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn add_relation_requires_both_endpoints() {
        let graph = Graph::new();
        graph.set_entity("self", Map::new());
        let err = graph
            .add_relation(Relation {
                from: "self".into(),
                to: "person:A".into(),
                rel_type: "likes".into(),
            })
            .unwrap_err();
        assert!(matches!(err, MemoryError::NotFound(_)));
    }

    #[test]
    fn merge_attrs_preserves_and_overwrites() {
        let graph = Graph::new();
        graph.set_entity("person:A", attrs(&[("name", "Alice"), ("age", "30")]));
        graph
            .merge_attrs("person:A", attrs(&[("age", "31"), ("city", "NYC")]))
            .unwrap();
        let entity = graph.get_entity("person:A").unwrap();
        assert_eq!(entity.attrs.get("name").unwrap(), "Alice");
        assert_eq!(entity.attrs.get("age").unwrap(), "31");
        assert_eq!(entity.attrs.get("city").unwrap(), "NYC");
    }

    /// Spec §8 scenario 5: `Expand([self], 2) = {self, person:A, topic:T}`.
    #[test]
    fn expand_follows_edges_up_to_hops() {
        let graph = Graph::new();
        for label in ["self", "person:A", "person:B", "topic:T"] {
            graph.set_entity(label, Map::new());
        }
        graph
            .add_relation(Relation {
                from: "self".into(),
                to: "person:A".into(),
                rel_type: "likes".into(),
            })
            .unwrap();
        graph
            .add_relation(Relation {
                from: "person:A".into(),
                to: "topic:T".into(),
                rel_type: "likes".into(),
            })
            .unwrap();
        graph
            .add_relation(Relation {
                from: "person:B".into(),
                to: "topic:T".into(),
                rel_type: "likes".into(),
            })
            .unwrap();

        let result = graph.expand(&["self".to_string()], 2);
        let expected: HashSet<String> = ["self", "person:A", "topic:T"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn expand_respects_hop_limit() {
        let graph = Graph::new();
        for label in ["self", "person:A", "topic:T"] {
            graph.set_entity(label, Map::new());
        }
        graph
            .add_relation(Relation {
                from: "self".into(),
                to: "person:A".into(),
                rel_type: "likes".into(),
            })
            .unwrap();
        graph
            .add_relation(Relation {
                from: "person:A".into(),
                to: "topic:T".into(),
                rel_type: "likes".into(),
            })
            .unwrap();

        let result = graph.expand(&["self".to_string()], 1);
        let expected: HashSet<String> = ["self", "person:A"].iter().map(|s| s.to_string()).collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn expand_handles_cycles() {
        let graph = Graph::new();
        graph.set_entity("a", Map::new());
        graph.set_entity("b", Map::new());
        graph
            .add_relation(Relation {
                from: "a".into(),
                to: "b".into(),
                rel_type: "r".into(),
            })
            .unwrap();
        graph
            .add_relation(Relation {
                from: "b".into(),
                to: "a".into(),
                rel_type: "r".into(),
            })
            .unwrap();
        let result = graph.expand(&["a".to_string()], 5);
        assert_eq!(result.len(), 2);
    }
}
