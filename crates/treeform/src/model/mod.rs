//! Class model pipeline
//!
//! Parses aggregation class diagrams, builds the containment tree and
//! renders it as a nested XML config and JSON metadata.

mod config_renderer;
mod database;
mod hierarchy;
mod metadata_renderer;
mod multiplicity;
mod orchestrator;
mod parser;

pub use config_renderer::ConfigRenderer;
pub use database::{AggregationEdge, Attribute, ClassEntity, ModelDatabase};
pub use hierarchy::HierarchyBuilder;
pub use metadata_renderer::{
    MetadataRecord, MetadataRenderer, Parameter, CLASS_PARAMETER_TYPE, ORPHAN_BOUND,
};
pub use multiplicity::{Multiplicity, MultiplicityLookup, RANGE_SEPARATOR};
pub use orchestrator::{BuiltModel, Orchestrator, TransformOutput};
pub use parser::ModelParser;
