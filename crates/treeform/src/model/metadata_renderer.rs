//! Metadata renderer
//!
//! Produces one record per class describing its parameters and, for
//! non-root classes, the occurrence bounds under its owning parent.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, warn, Level};

use super::database::{ClassEntity, ModelDatabase};
use super::multiplicity::{Multiplicity, MultiplicityLookup};
use crate::core::{ModelError, Renderer};

/// Parameter type marker used for child class references
pub const CLASS_PARAMETER_TYPE: &str = "class";

/// Bound used for a non-root class that no parent aggregates
pub const ORPHAN_BOUND: &str = "1";

/// One entry of a record's `parameters` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == CLASS_PARAMETER_TYPE
    }
}

/// Metadata describing a single class
///
/// Field order is the key order of the serialized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub class: String,
    pub documentation: String,
    pub is_root: bool,
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// Metadata renderer
pub struct MetadataRenderer {
    lookup: MultiplicityLookup,
    strict: bool,
}

impl MetadataRenderer {
    pub fn new(lookup: MultiplicityLookup) -> Self {
        Self {
            lookup,
            strict: false,
        }
    }

    /// When strict, a non-root class without a parent is a reference error
    /// instead of defaulting to `1..1`.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build the records in class declaration order
    pub fn records(&self, database: &ModelDatabase) -> Result<Vec<MetadataRecord>, ModelError> {
        let render_span = span!(Level::INFO, "render_metadata", class_count = database.class_count());
        let _enter = render_span.enter();

        let parents = database.parents();
        let records = database
            .classes()
            .map(|class| self.record(&parents, class))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(record_count = records.len(), "Metadata records built");
        info!("Metadata rendering completed");
        Ok(records)
    }

    /// Serialize records as indented JSON
    pub fn to_json(records: &[MetadataRecord]) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Build the records and serialize them in one step
    pub fn render_document(&self, database: &ModelDatabase) -> Result<String, ModelError> {
        Self::to_json(&self.records(database)?)
    }

    fn record(
        &self,
        parents: &HashMap<&str, &ClassEntity>,
        class: &ClassEntity,
    ) -> Result<MetadataRecord, ModelError> {
        let parameters = class
            .attributes
            .iter()
            .map(|a| Parameter::new(&a.name, &a.type_name))
            .chain(
                class
                    .children
                    .iter()
                    .map(|child| Parameter::new(child, CLASS_PARAMETER_TYPE)),
            )
            .collect();

        let (min, max) = if class.is_root {
            (None, None)
        } else {
            let (min, max) = self.bounds(parents, class)?;
            (Some(min), Some(max))
        };

        Ok(MetadataRecord {
            class: class.name.clone(),
            documentation: class.documentation.clone(),
            is_root: class.is_root,
            parameters,
            min,
            max,
        })
    }

    fn bounds(
        &self,
        parents: &HashMap<&str, &ClassEntity>,
        class: &ClassEntity,
    ) -> Result<(String, String), ModelError> {
        let resolved = parents
            .get(class.name.as_str())
            .and_then(|parent| self.lookup.resolve(&parent.name, &class.name));

        match resolved {
            Some(multiplicity) => {
                let (min, max) = multiplicity.bounds();
                Ok((min.to_string(), max.to_string()))
            }
            None if self.strict => Err(ModelError::reference_error(
                &class.name,
                "non-root class has no owning parent",
            )),
            None => {
                warn!(class = %class.name, "Non-root class has no parent, defaulting bounds to 1..1");
                let fallback = Multiplicity::Exact(ORPHAN_BOUND.to_string());
                let (min, max) = fallback.bounds();
                Ok((min.to_string(), max.to_string()))
            }
        }
    }
}

impl Renderer<ModelDatabase> for MetadataRenderer {
    type Output = Vec<MetadataRecord>;

    fn render(&self, database: &ModelDatabase) -> Result<Self::Output> {
        Ok(self.records(database)?)
    }

    fn name(&self) -> &'static str {
        "metadata"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "json"
    }
}
