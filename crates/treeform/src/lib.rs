//! Treeform - Turn aggregation class diagrams into nested config and metadata
//!
//! A library for reading a UML-like class diagram (classes, attributes and
//! aggregation edges) written in a small XML schema, building its
//! containment tree, and rendering it as:
//!
//! - a nested XML config fragment rooted at the root class, and
//! - a JSON metadata array with one record per class.
//!
//! # Quick Start
//!
//! ```rust
//! use treeform::transform;
//!
//! let input = r#"<Model>
//!     <Class name="BTS" isRoot="true"/>
//!     <Class name="Antenna"><Attribute name="height" type="Integer"/></Class>
//!     <Aggregation source="Antenna" target="BTS"
//!                  sourceMultiplicity="1..10" targetMultiplicity="1"/>
//! </Model>"#;
//!
//! let output = transform(input, None).unwrap();
//! assert!(output.config.contains("<height>Integer</height>"));
//! assert!(output.metadata.contains("\"max\": \"10\""));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use treeform::prelude::*;
//!
//! let input = r#"<Model><Class name="Root" isRoot="true"/></Model>"#;
//!
//! // Parse into a database
//! let parser = ModelParser::new();
//! let mut database = ModelDatabase::new();
//! parser.parse(input, &mut database).unwrap();
//!
//! // Build the containment tree
//! let lookup = HierarchyBuilder::new().build(&mut database).unwrap();
//!
//! // Render both documents
//! let config = ConfigRenderer::new().render(&database).unwrap();
//! let records = MetadataRenderer::new(lookup).render(&database).unwrap();
//! assert_eq!(config, "<Root>\n</Root>");
//! assert!(records[0].is_root);
//! ```

pub mod core;
pub mod model;

pub use crate::core::*;
pub use model::{BuiltModel, TransformOutput};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{Database, ModelError, Parser, Renderer, TransformConfig};
    pub use crate::model::{
        AggregationEdge, Attribute, ClassEntity, ConfigRenderer, HierarchyBuilder,
        MetadataRecord, MetadataRenderer, ModelDatabase, ModelParser, Multiplicity,
        MultiplicityLookup, Orchestrator, Parameter, TransformOutput,
    };
}

/// Transform diagram markup into the config and metadata documents
///
/// # Arguments
/// * `input` - Diagram markup
/// * `root_class` - Root class to use when no class is marked `isRoot`
///
/// # Returns
/// * `Ok(TransformOutput)` - Both rendered documents
/// * `Err` - If any stage fails; no partial output is returned
pub fn transform(input: &str, root_class: Option<&str>) -> anyhow::Result<TransformOutput> {
    let mut config = TransformConfig::default();
    config.root_class = root_class.map(str::to_string);
    transform_with_config(input, &config)
}

/// Transform diagram markup with an explicit configuration
///
/// # Example
/// ```rust
/// use treeform::{transform_with_config, TransformConfig};
///
/// let input = r#"<Model><Class name="A"/></Model>"#;
/// let config = TransformConfig::new().with_root_class("A").with_indent(2);
/// let output = transform_with_config(input, &config).unwrap();
/// assert_eq!(output.config, "<A>\n</A>");
/// ```
pub fn transform_with_config(
    input: &str,
    config: &TransformConfig,
) -> anyhow::Result<TransformOutput> {
    model::Orchestrator::with_config(config.clone()).process(input)
}

/// Parse diagram markup into a database without building the hierarchy
///
/// # Example
/// ```rust
/// use treeform::parse;
///
/// let db = parse(r#"<Model><Class name="A"/><Class name="B"/></Model>"#).unwrap();
/// assert_eq!(db.class_count(), 2);
/// assert!(db.get_class("A").unwrap().children.is_empty());
/// ```
pub fn parse(input: &str) -> anyhow::Result<model::ModelDatabase> {
    Ok(model::ModelParser::new().parse_model(input)?)
}

/// Parse diagram markup and build its containment tree
pub fn build(input: &str, config: &TransformConfig) -> anyhow::Result<BuiltModel> {
    model::Orchestrator::with_config(config.clone()).process_model(input)
}
