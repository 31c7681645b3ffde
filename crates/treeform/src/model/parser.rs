//! Class model parser
//!
//! Reads the diagram markup: a root container whose direct children are
//! `Class` and `Aggregation` entities. `Class` entities may nest
//! `Attribute` elements. Anything else at entity level is rejected.

use std::collections::HashMap;

use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info, span, trace, Level};

use super::database::{AggregationEdge, Attribute, ClassEntity, ModelDatabase};
use crate::core::{ModelError, Parser};

const CLASS_TAG: &str = "Class";
const AGGREGATION_TAG: &str = "Aggregation";
const ATTRIBUTE_TAG: &str = "Attribute";

/// Nesting level of the entities inside the root container
const ENTITY_DEPTH: usize = 1;
/// Nesting level of the `Attribute` elements inside a `Class`
const MEMBER_DEPTH: usize = 2;

/// Class model parser
pub struct ModelParser;

impl ModelParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse markup into a fresh database
    ///
    /// Either every entity is read or an error is returned; nothing is kept
    /// from a failed parse.
    pub fn parse_model(&self, input: &str) -> Result<ModelDatabase, ModelError> {
        let parse_span = span!(Level::INFO, "parse_model", input_len = input.len());
        let _enter = parse_span.enter();

        let mut database = ModelDatabase::new();
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut depth = 0usize;
        let mut open_class: Option<ClassEntity> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    self.open_element(e, depth, &mut open_class, &mut database)?;
                    depth += 1;
                }
                Ok(Event::Empty(ref e)) => {
                    self.open_element(e, depth, &mut open_class, &mut database)?;
                    self.close_element(depth, &mut open_class, &mut database);
                }
                Ok(Event::End(_)) => {
                    depth = depth.saturating_sub(1);
                    self.close_element(depth, &mut open_class, &mut database);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ModelError::xml(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
        }

        if depth != 0 {
            return Err(ModelError::xml(format!(
                "unexpected end of input with {depth} unclosed element(s)"
            )));
        }

        debug!(
            class_count = database.class_count(),
            aggregation_count = database.aggregation_count(),
            "Parsed model"
        );
        info!("Parsing completed");
        Ok(database)
    }

    fn open_element(
        &self,
        e: &BytesStart<'_>,
        depth: usize,
        open_class: &mut Option<ClassEntity>,
        database: &mut ModelDatabase,
    ) -> Result<(), ModelError> {
        let name = e.name();
        let tag = std::str::from_utf8(name.as_ref())
            .map_err(|err| ModelError::xml(format!("Invalid tag name: {err}")))?;

        match depth {
            ENTITY_DEPTH => match tag {
                CLASS_TAG => {
                    let class = Self::read_class(e)?;
                    trace!(class = %class.name, is_root = class.is_root, "Parsed class");
                    *open_class = Some(class);
                }
                AGGREGATION_TAG => {
                    let edge = Self::read_aggregation(e)?;
                    trace!(source = %edge.source, target = %edge.target, "Parsed aggregation");
                    database.add_aggregation(edge);
                }
                other => return Err(ModelError::unrecognized_entity(other)),
            },
            MEMBER_DEPTH if tag == ATTRIBUTE_TAG => {
                if let Some(class) = open_class.as_mut() {
                    let mut attrs = collect_attributes(e)?;
                    let name = take_required(&mut attrs, ATTRIBUTE_TAG, "name")?;
                    let type_name = take_required(&mut attrs, ATTRIBUTE_TAG, "type")?;
                    trace!(class = %class.name, attribute = %name, "Parsed attribute");
                    class.add_attribute(Attribute::new(name, type_name));
                }
            }
            // Root container and anything nested deeper is not part of the model
            _ => {}
        }
        Ok(())
    }

    fn close_element(
        &self,
        depth: usize,
        open_class: &mut Option<ClassEntity>,
        database: &mut ModelDatabase,
    ) {
        if depth == ENTITY_DEPTH {
            if let Some(class) = open_class.take() {
                database.add_class(class);
            }
        }
    }

    fn read_class(e: &BytesStart<'_>) -> Result<ClassEntity, ModelError> {
        let mut attrs = collect_attributes(e)?;
        let name = take_required(&mut attrs, CLASS_TAG, "name")?;
        let is_root = attrs
            .remove("isRoot")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let documentation = attrs.remove("documentation").unwrap_or_default();

        Ok(ClassEntity::new(name)
            .with_root(is_root)
            .with_documentation(documentation))
    }

    fn read_aggregation(e: &BytesStart<'_>) -> Result<AggregationEdge, ModelError> {
        let mut attrs = collect_attributes(e)?;
        Ok(AggregationEdge::new(
            take_required(&mut attrs, AGGREGATION_TAG, "source")?,
            take_required(&mut attrs, AGGREGATION_TAG, "target")?,
            take_required(&mut attrs, AGGREGATION_TAG, "sourceMultiplicity")?,
            take_required(&mut attrs, AGGREGATION_TAG, "targetMultiplicity")?,
        ))
    }
}

impl Default for ModelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<ModelDatabase> for ModelParser {
    fn parse(&self, input: &str, database: &mut ModelDatabase) -> Result<()> {
        let parsed = self.parse_model(input)?;
        for class in parsed.classes() {
            database.add_class(class.clone());
        }
        for edge in parsed.aggregations() {
            database.add_aggregation(edge.clone());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "model"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        input.contains("<Class") || input.contains("<Aggregation")
    }
}

/// Unescaped attribute values of an element, keyed by attribute name
fn collect_attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>, ModelError> {
    let mut values = HashMap::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|err| ModelError::xml(format!("Attribute error: {err}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| ModelError::xml(format!("Attribute key error: {err}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| ModelError::xml(format!("Attribute value error: {err}")))?
            .to_string();
        values.insert(key, value);
    }
    Ok(values)
}

fn take_required(
    attrs: &mut HashMap<String, String>,
    entity: &str,
    field: &str,
) -> Result<String, ModelError> {
    attrs
        .remove(field)
        .ok_or_else(|| ModelError::missing_field(entity, field))
}
