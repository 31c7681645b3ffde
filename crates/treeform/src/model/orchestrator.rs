//! Pipeline orchestrator
//!
//! Runs the full transform: Parser → HierarchyBuilder → { ConfigRenderer,
//! MetadataRenderer }. Both documents are rendered in memory; a failure at
//! any stage means neither is returned.

use anyhow::Result;
use tracing::{debug, info, span, Level};

use super::config_renderer::ConfigRenderer;
use super::database::ModelDatabase;
use super::hierarchy::HierarchyBuilder;
use super::metadata_renderer::MetadataRenderer;
use super::multiplicity::MultiplicityLookup;
use super::parser::ModelParser;
use crate::core::TransformConfig;

/// The two documents produced by a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Nested XML config fragment
    pub config: String,
    /// Pretty-printed JSON metadata array
    pub metadata: String,
}

/// A parsed model with its containment tree built
#[derive(Debug, Clone)]
pub struct BuiltModel {
    pub database: ModelDatabase,
    pub lookup: MultiplicityLookup,
}

/// Pipeline orchestrator
pub struct Orchestrator {
    parser: ModelParser,
    config: TransformConfig,
}

impl Orchestrator {
    /// Create an orchestrator with the default configuration
    pub fn new() -> Self {
        Self::with_config(TransformConfig::default())
    }

    pub fn with_config(config: TransformConfig) -> Self {
        Self {
            parser: ModelParser::new(),
            config,
        }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Parse the input and build the containment tree
    pub fn process_model(&self, input: &str) -> Result<BuiltModel> {
        let parse_span = span!(Level::DEBUG, "pipeline_parse");
        let parse_enter = parse_span.enter();
        let mut database = self.parser.parse_model(input)?;
        drop(parse_enter);

        let build_span = span!(Level::DEBUG, "pipeline_build");
        let _build_enter = build_span.enter();
        let lookup = HierarchyBuilder::new()
            .with_strict(self.config.strict)
            .build(&mut database)?;

        Ok(BuiltModel { database, lookup })
    }

    /// Run the full pipeline and return both documents
    pub fn process(&self, input: &str) -> Result<TransformOutput> {
        let process_span = span!(Level::INFO, "transform_model", input_len = input.len());
        let _enter = process_span.enter();

        info!(config = %self.config, "Starting transform pipeline");

        let built = self.process_model(input)?;
        debug!(
            class_count = built.database.class_count(),
            aggregation_count = built.database.aggregation_count(),
            "Model built"
        );
        self.render(built)
    }

    /// Render both documents from a built model
    ///
    /// Neither document is returned unless both render.
    pub fn render(&self, built: BuiltModel) -> Result<TransformOutput> {
        let BuiltModel { database, lookup } = built;

        let config_span = span!(Level::DEBUG, "pipeline_render_config");
        let config_enter = config_span.enter();
        let config = ConfigRenderer::from_config(&self.config).render_document(&database)?;
        drop(config_enter);

        let metadata_span = span!(Level::DEBUG, "pipeline_render_metadata");
        let metadata_enter = metadata_span.enter();
        let metadata = MetadataRenderer::new(lookup)
            .with_strict(self.config.strict)
            .render_document(&database)?;
        drop(metadata_enter);

        info!(
            config_len = config.len(),
            metadata_len = metadata.len(),
            "Pipeline completed successfully"
        );
        Ok(TransformOutput { config, metadata })
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
