//! Containment hierarchy builder
//!
//! Turns the flat aggregation list into a single-parent containment tree:
//! every class's `children` list is rebuilt from scratch and the
//! (parent, child) multiplicities are collected into a lookup.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info, span, warn, Level};

use super::database::ModelDatabase;
use super::multiplicity::MultiplicityLookup;
use crate::core::ModelError;

/// Builds the containment tree in place on a [`ModelDatabase`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBuilder {
    strict: bool,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// When strict, a class aggregated by two different parents is an error
    /// instead of the later edge winning.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Populate `children` on every class and return the multiplicity lookup
    ///
    /// Safe to call repeatedly: children are reset before being rebuilt.
    pub fn build(&self, database: &mut ModelDatabase) -> Result<MultiplicityLookup, ModelError> {
        let build_span = span!(
            Level::INFO,
            "build_hierarchy",
            class_count = database.class_count(),
            aggregation_count = database.aggregation_count()
        );
        let _enter = build_span.enter();

        let mut parents: IndexMap<String, String> = IndexMap::new();
        let mut lookup = MultiplicityLookup::new();

        for edge in database.aggregations() {
            if !database.contains_class(&edge.source) {
                return Err(ModelError::reference_error(
                    &edge.source,
                    format!("source of aggregation {} -> {}", edge.source, edge.target),
                ));
            }
            if !database.contains_class(&edge.target) {
                return Err(ModelError::reference_error(
                    &edge.target,
                    format!("target of aggregation {} -> {}", edge.source, edge.target),
                ));
            }

            if let Some(previous) = parents.insert(edge.source.clone(), edge.target.clone()) {
                if previous != edge.target {
                    if self.strict {
                        return Err(ModelError::DuplicateParent {
                            class: edge.source.clone(),
                            first: previous,
                            second: edge.target.clone(),
                        });
                    }
                    warn!(
                        class = %edge.source,
                        previous = %previous,
                        parent = %edge.target,
                        "Class aggregated twice, later parent wins"
                    );
                }
            }
            lookup.insert(&edge.target, &edge.source, &edge.source_multiplicity);
        }

        check_acyclic(&parents)?;

        for class in database.classes_mut() {
            class.children.clear();
        }
        for (source, target) in &parents {
            if let Some(parent) = database.get_class_mut(target) {
                parent.children.push(source.clone());
            }
        }

        debug!(
            parent_links = parents.len(),
            multiplicities = lookup.len(),
            "Containment tree built"
        );
        info!("Hierarchy building completed");
        Ok(lookup)
    }
}

/// Walk each parent chain and fail on the first class seen twice
///
/// Chains stop at any class already proven to reach a root, so every class
/// is walked once.
fn check_acyclic(parents: &IndexMap<String, String>) -> Result<(), ModelError> {
    let mut settled: HashSet<&str> = HashSet::new();
    for start in parents.keys() {
        let mut chain = vec![start.as_str()];
        let mut on_chain: HashSet<&str> = HashSet::from([start.as_str()]);
        let mut current = start.as_str();
        while let Some(parent) = parents.get(current) {
            let parent = parent.as_str();
            if settled.contains(parent) {
                break;
            }
            if !on_chain.insert(parent) {
                return Err(ModelError::CyclicHierarchy {
                    class: parent.to_string(),
                });
            }
            chain.push(parent);
            current = parent;
        }
        settled.extend(chain);
    }
    Ok(())
}
