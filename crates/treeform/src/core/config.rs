//! Transform configuration
//!
//! Settings that change how the pipeline resolves the root class, lays out
//! the config document and treats questionable input.

use std::fmt;

/// Default number of spaces per nesting level in the config document
pub const DEFAULT_INDENT: usize = 4;

/// Configuration for a single transform run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// Fallback root class used when no class is marked `isRoot`
    pub root_class: Option<String>,
    /// Spaces per nesting level in the config document
    pub indent: usize,
    /// Fail on duplicate parents and orphaned classes instead of
    /// overwriting or defaulting
    pub strict: bool,
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_class(mut self, name: impl Into<String>) -> Self {
        self.root_class = Some(name.into());
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            root_class: None,
            indent: DEFAULT_INDENT,
            strict: false,
        }
    }
}

impl fmt::Display for TransformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "root={} indent={} strict={}",
            self.root_class.as_deref().unwrap_or("<isRoot>"),
            self.indent,
            self.strict
        )
    }
}
