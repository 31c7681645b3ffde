//! Config tree renderer
//!
//! Renders the containment tree as nested XML tags starting at the root
//! class. Attributes become leaf tags holding their type name; child classes
//! become nested blocks, visited in ascending name order.

use std::collections::HashSet;

use anyhow::Result;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::{debug, info, span, trace, Level};

use super::database::{ClassEntity, ModelDatabase};
use crate::core::{ModelError, Renderer, TransformConfig, DEFAULT_INDENT};

/// Config tree renderer
pub struct ConfigRenderer {
    root_class: Option<String>,
    indent: usize,
}

impl ConfigRenderer {
    pub fn new() -> Self {
        Self {
            root_class: None,
            indent: DEFAULT_INDENT,
        }
    }

    pub fn from_config(config: &TransformConfig) -> Self {
        Self {
            root_class: config.root_class.clone(),
            indent: config.indent,
        }
    }

    /// Class used as the root when none is flagged `isRoot`
    pub fn with_root_class(mut self, name: impl Into<String>) -> Self {
        self.root_class = Some(name.into());
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// The flagged root if there is one, otherwise the fallback class
    pub fn select_root<'a>(&self, database: &'a ModelDatabase) -> Result<&'a ClassEntity, ModelError> {
        if let Some(root) = database.flagged_root() {
            return Ok(root);
        }
        self.root_class
            .as_deref()
            .and_then(|name| database.get_class(name))
            .ok_or_else(|| ModelError::NoRootFound {
                fallback: self.root_class.clone(),
            })
    }

    /// Render the config document for the selected root
    pub fn render_document(&self, database: &ModelDatabase) -> Result<String, ModelError> {
        let render_span = span!(Level::INFO, "render_config", class_count = database.class_count());
        let _enter = render_span.enter();

        let root = self.select_root(database)?;
        debug!(root = %root.name, flagged = root.is_root, "Root class selected");

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', self.indent);
        self.write_tree(&mut writer, database, root)?;

        let output = String::from_utf8(writer.into_inner())
            .map_err(|e| ModelError::xml(format!("Rendered config is not UTF-8: {e}")))?;
        info!(output_len = output.len(), "Config rendering completed");
        Ok(output)
    }

    /// Depth-first walk with an explicit stack, so tree depth is bounded by
    /// memory rather than the call stack
    fn write_tree<'a>(
        &self,
        writer: &mut Writer<Vec<u8>>,
        database: &'a ModelDatabase,
        root: &'a ClassEntity,
    ) -> Result<(), ModelError> {
        let mut stack = vec![Step::Open(root)];
        let mut ancestors: HashSet<&'a str> = HashSet::new();

        while let Some(step) = stack.pop() {
            let class = match step {
                Step::Open(class) => class,
                Step::Close(class) => {
                    ancestors.remove(class.name.as_str());
                    write_event(writer, Event::End(BytesEnd::new(class.name.as_str())))?;
                    continue;
                }
            };

            if !ancestors.insert(class.name.as_str()) {
                return Err(ModelError::CyclicHierarchy {
                    class: class.name.clone(),
                });
            }
            trace!(class = %class.name, depth = ancestors.len(), "Rendering class");

            write_event(writer, Event::Start(BytesStart::new(class.name.as_str())))?;
            for attribute in &class.attributes {
                write_event(writer, Event::Start(BytesStart::new(attribute.name.as_str())))?;
                write_event(writer, Event::Text(BytesText::new(&attribute.type_name)))?;
                write_event(writer, Event::End(BytesEnd::new(attribute.name.as_str())))?;
            }

            let mut children: Vec<&str> = class.children.iter().map(String::as_str).collect();
            children.sort_unstable();

            stack.push(Step::Close(class));
            // Reversed so the smallest name is popped first
            for child_name in children.into_iter().rev() {
                let child = database.get_class(child_name).ok_or_else(|| {
                    ModelError::reference_error(child_name, format!("child of {}", class.name))
                })?;
                stack.push(Step::Open(child));
            }
        }
        Ok(())
    }
}

/// Pending work for [`ConfigRenderer::write_tree`]
enum Step<'a> {
    Open(&'a ClassEntity),
    Close(&'a ClassEntity),
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ModelError> {
    writer
        .write_event(event)
        .map_err(|e| ModelError::xml(format!("Failed to write config: {e}")))
}

impl Default for ConfigRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<ModelDatabase> for ConfigRenderer {
    type Output = String;

    fn render(&self, database: &ModelDatabase) -> Result<Self::Output> {
        Ok(self.render_document(database)?)
    }

    fn name(&self) -> &'static str {
        "config"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "xml"
    }
}
