//! Dependency tracking between cells
//!
//! A producer is a cell whose value another cell reads; a consumer is the
//! cell that reads it. Names are normalized and interned to [`NodeId`]s, and
//! both directions of every edge are stored so either side can be walked
//! without a scan.

use ahash::AHashMap;
use cellflow_core::normalize_name;
use std::collections::BTreeSet;

/// Interned node handle, only meaningful for the registry that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Dense index, usable to size per-node scratch space
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Producer/consumer relation between named nodes
///
/// A node with at least one edge has a (possibly empty) set on both sides;
/// a node whose last edge goes away is dropped from both maps again. Edge
/// sets are ordered by [`NodeId`], so traversals are deterministic.
#[derive(Debug, Default, Clone)]
pub struct DependencyRegistry {
    /// Normalized name → interned id
    ids: AHashMap<String, NodeId>,
    /// Interned id → normalized name
    names: Vec<String>,
    /// Node → nodes that read it (consumers)
    consumers: AHashMap<NodeId, BTreeSet<NodeId>>,
    /// Node → nodes it reads (producers)
    producers: AHashMap<NodeId, BTreeSet<NodeId>>,
    /// Number of edges
    edges: usize,
}

impl DependencyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // === Interning ===

    /// Intern a name, returning its id
    pub fn intern(&mut self, name: &str) -> NodeId {
        let name = normalize_name(name);
        if let Some(&id) = self.ids.get(&name) {
            return id;
        }
        let id = NodeId(self.names.len() as u32);
        self.names.push(name.clone());
        self.ids.insert(name, id);
        id
    }

    /// Id of an already interned name
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.ids.get(&normalize_name(name)).copied()
    }

    /// Normalized name of an id issued by this registry
    pub fn name(&self, id: NodeId) -> &str {
        &self.names[id.index()]
    }

    /// Number of ids issued so far
    pub fn interned_count(&self) -> usize {
        self.names.len()
    }

    // === Name-level queries ===

    /// Whether any node reads `node`
    pub fn has_consumers(&self, node: &str) -> bool {
        self.node_id(node)
            .and_then(|id| self.consumers.get(&id))
            .is_some_and(|set| !set.is_empty())
    }

    /// Whether `node` reads any node
    pub fn has_producers(&self, node: &str) -> bool {
        self.node_id(node)
            .and_then(|id| self.producers.get(&id))
            .is_some_and(|set| !set.is_empty())
    }

    /// Nodes that read `node`; empty for an unknown node
    pub fn consumers_of(&self, node: &str) -> impl Iterator<Item = &str> + '_ {
        self.node_id(node)
            .into_iter()
            .flat_map(move |id| self.consumer_ids(id))
            .map(move |id| self.name(id))
    }

    /// Nodes that `node` reads; empty for an unknown node
    pub fn producers_of(&self, node: &str) -> impl Iterator<Item = &str> + '_ {
        self.node_id(node)
            .into_iter()
            .flat_map(move |id| self.producer_ids(id))
            .map(move |id| self.name(id))
    }

    // === Id-level queries ===

    /// Direct consumers of a node, in id order
    pub fn consumer_ids(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.consumers
            .get(&id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Direct producers of a node, in id order
    pub fn producer_ids(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.producers
            .get(&id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    // === Mutation ===

    /// Record that `consumer` reads `producer`; re-adding an edge is a no-op
    pub fn add_edge(&mut self, producer: &str, consumer: &str) {
        let producer = self.intern(producer);
        let consumer = self.intern(consumer);
        self.add_edge_ids(producer, consumer);
    }

    /// Forget that `consumer` reads `producer`; a missing edge is a no-op
    pub fn remove_edge(&mut self, producer: &str, consumer: &str) {
        if let (Some(producer), Some(consumer)) = (self.node_id(producer), self.node_id(consumer)) {
            self.remove_edge_ids(producer, consumer);
        }
    }

    /// Replace every producer of `node` with exactly `producers`
    pub fn replace_producers_of<I, S>(&mut self, node: &str, producers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let node = self.intern(node);
        let producers: Vec<NodeId> = producers
            .into_iter()
            .map(|name| self.intern(name.as_ref()))
            .collect();
        self.replace_producer_ids(node, producers);
    }

    /// Replace every consumer of `node` with exactly `consumers`
    pub fn replace_consumers_of<I, S>(&mut self, node: &str, consumers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let node = self.intern(node);
        let consumers: Vec<NodeId> = consumers
            .into_iter()
            .map(|name| self.intern(name.as_ref()))
            .collect();

        let old: Vec<NodeId> = self.consumer_ids(node).collect();
        for consumer in old {
            self.remove_edge_ids(node, consumer);
        }
        for consumer in consumers {
            self.add_edge_ids(node, consumer);
        }
    }

    /// Replace every producer of an interned node
    pub fn replace_producer_ids<I>(&mut self, node: NodeId, producers: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        let old: Vec<NodeId> = self.producer_ids(node).collect();
        for producer in old {
            self.remove_edge_ids(producer, node);
        }
        for producer in producers {
            self.add_edge_ids(producer, node);
        }
    }

    /// Add an edge between interned nodes; returns whether it was new
    pub fn add_edge_ids(&mut self, producer: NodeId, consumer: NodeId) -> bool {
        if !self.consumers.entry(producer).or_default().insert(consumer) {
            return false;
        }
        self.producers.entry(consumer).or_default().insert(producer);

        // Both endpoints are recorded on both sides
        self.consumers.entry(consumer).or_default();
        self.producers.entry(producer).or_default();

        self.edges += 1;
        true
    }

    /// Remove an edge between interned nodes; returns whether it existed
    pub fn remove_edge_ids(&mut self, producer: NodeId, consumer: NodeId) -> bool {
        let removed = self
            .consumers
            .get_mut(&producer)
            .is_some_and(|set| set.remove(&consumer));
        if !removed {
            return false;
        }
        if let Some(set) = self.producers.get_mut(&consumer) {
            set.remove(&producer);
        }
        self.edges -= 1;

        self.prune(producer);
        self.prune(consumer);
        true
    }

    /// Drop a node that no longer has edges on either side
    fn prune(&mut self, id: NodeId) {
        let isolated = self.consumers.get(&id).map_or(true, BTreeSet::is_empty)
            && self.producers.get(&id).map_or(true, BTreeSet::is_empty);
        if isolated {
            self.consumers.remove(&id);
            self.producers.remove(&id);
        }
    }

    // === Size ===

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges
    }

    /// Whether there are no edges
    pub fn is_empty(&self) -> bool {
        self.edges == 0
    }

    /// Number of nodes with at least one edge
    pub fn node_count(&self) -> usize {
        self.consumers.len()
    }

    /// Clear the entire registry, including interned names
    pub fn clear(&mut self) {
        self.ids.clear();
        self.names.clear();
        self.consumers.clear();
        self.producers.clear();
        self.edges = 0;
    }
}
