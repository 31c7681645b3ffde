//! Class model database
//!
//! Stores classes and aggregation edges for a class diagram.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::core::Database;

/// A typed attribute declared on a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A class in the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntity {
    pub name: String,
    pub is_root: bool,
    pub documentation: String,
    pub attributes: Vec<Attribute>,
    /// Names of classes aggregated into this one. Filled in by the
    /// hierarchy builder; order carries no meaning.
    pub children: Vec<String>,
}

impl ClassEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_root: false,
            documentation: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.add_attribute(Attribute::new(name, type_name));
        self
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }
}

/// An aggregation edge: `source` is contained by `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationEdge {
    pub source: String,
    pub target: String,
    pub source_multiplicity: String,
    pub target_multiplicity: String,
}

impl AggregationEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        source_multiplicity: impl Into<String>,
        target_multiplicity: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_multiplicity: source_multiplicity.into(),
            target_multiplicity: target_multiplicity.into(),
        }
    }
}

/// Class model database
///
/// Classes are kept in first-declaration order, which is the iteration
/// order every consumer sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelDatabase {
    classes: IndexMap<String, ClassEntity>,
    aggregations: Vec<AggregationEdge>,
}

impl ModelDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class, replacing any earlier class with the same name in place
    pub fn add_class(&mut self, class: ClassEntity) {
        if let Some(previous) = self.classes.insert(class.name.clone(), class) {
            warn!(class = %previous.name, "Class declared twice, later declaration wins");
        }
    }

    pub fn add_aggregation(&mut self, edge: AggregationEdge) {
        self.aggregations.push(edge);
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassEntity> {
        self.classes.values()
    }

    pub fn aggregations(&self) -> &[AggregationEdge] {
        &self.aggregations
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.get(name)
    }

    pub fn get_class_mut(&mut self, name: &str) -> Option<&mut ClassEntity> {
        self.classes.get_mut(name)
    }

    pub fn contains_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn aggregation_count(&self) -> usize {
        self.aggregations.len()
    }

    /// First class flagged `isRoot`, in declaration order
    pub fn flagged_root(&self) -> Option<&ClassEntity> {
        self.classes.values().find(|c| c.is_root)
    }

    /// child name -> owning class, read from the built `children` lists
    ///
    /// When a hand-built database lists a child twice, the later owner wins.
    pub fn parents(&self) -> HashMap<&str, &ClassEntity> {
        self.classes
            .values()
            .flat_map(|parent| parent.children.iter().map(move |child| (child.as_str(), parent)))
            .collect()
    }

    pub(crate) fn classes_mut(&mut self) -> impl Iterator<Item = &mut ClassEntity> {
        self.classes.values_mut()
    }
}

impl Database for ModelDatabase {
    type Node = ClassEntity;
    type Edge = AggregationEdge;

    fn insert_node(&mut self, node: Self::Node) {
        self.add_class(node);
    }

    fn insert_edge(&mut self, edge: Self::Edge) {
        self.add_aggregation(edge);
    }

    fn node(&self, name: &str) -> Option<&Self::Node> {
        self.get_class(name)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.classes.values()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.aggregations.iter()
    }

    fn clear(&mut self) {
        self.classes.clear();
        self.aggregations.clear();
    }

    fn node_count(&self) -> usize {
        self.classes.len()
    }

    fn edge_count(&self) -> usize {
        self.aggregations.len()
    }
}
