//! Core error types for model processing
//!
//! Every failure the pipeline can report is a [`ModelError`]. None of them are
//! recoverable: a run either produces both documents or neither.

use thiserror::Error;

/// Core error types for model processing
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unrecognized entity: <{kind}> is neither a Class nor an Aggregation")]
    UnrecognizedEntity { kind: String },

    #[error("Missing field: {entity} requires attribute '{field}'")]
    MissingField { entity: String, field: String },

    #[error("Reference error: unknown class '{name}' ({context})")]
    ReferenceError { name: String, context: String },

    #[error("No root found: no class is marked isRoot and fallback {fallback:?} does not name a class")]
    NoRootFound { fallback: Option<String> },

    #[error("Cyclic hierarchy: class '{class}' is its own ancestor")]
    CyclicHierarchy { class: String },

    #[error("Duplicate parent: class '{class}' is aggregated by both '{first}' and '{second}'")]
    DuplicateParent {
        class: String,
        first: String,
        second: String,
    },

    #[error("XML error: {message}")]
    Xml { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ModelError {
    /// Create a new unrecognized entity error
    pub fn unrecognized_entity(kind: impl Into<String>) -> Self {
        Self::UnrecognizedEntity { kind: kind.into() }
    }

    /// Create a new missing field error
    pub fn missing_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Create a new reference error
    pub fn reference_error(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::ReferenceError {
            name: name.into(),
            context: context.into(),
        }
    }

    /// Create a new XML error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Short category name, used for one-line diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnrecognizedEntity { .. } => "UnrecognizedEntity",
            Self::MissingField { .. } => "MissingField",
            Self::ReferenceError { .. } => "ReferenceError",
            Self::NoRootFound { .. } => "NoRootFound",
            Self::CyclicHierarchy { .. } => "CyclicHierarchy",
            Self::DuplicateParent { .. } => "DuplicateParent",
            Self::Xml { .. } => "Xml",
            Self::Serialization { .. } => "Serialization",
            Self::Io { .. } => "Io",
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
