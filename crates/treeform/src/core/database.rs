//! Storage trait for parsed models
//!
//! A model is a set of named entities (nodes) plus the directed
//! relationships between them (edges). Nodes are keyed by name and keep
//! their declaration order; edges keep input order.

/// Storage for a parsed model
pub trait Database: Send + Sync {
    /// Named entity stored by the database
    type Node: Clone + Send + Sync;

    /// Relationship between two named entities
    type Edge: Clone + Send + Sync;

    /// Insert a node, replacing any node with the same name in place
    fn insert_node(&mut self, node: Self::Node);

    /// Append an edge
    fn insert_edge(&mut self, edge: Self::Edge);

    /// Look up a node by name
    fn node(&self, name: &str) -> Option<&Self::Node>;

    /// Nodes in declaration order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Edges in input order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    fn clear(&mut self);

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn contains_node(&self, name: &str) -> bool {
        self.node(name).is_some()
    }

    /// True when neither nodes nor edges are stored
    fn is_empty(&self) -> bool {
        self.node_count() == 0 && self.edge_count() == 0
    }
}
