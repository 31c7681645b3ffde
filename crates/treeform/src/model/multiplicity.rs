//! Multiplicity strings and the (parent, child) lookup built from them

use indexmap::IndexMap;
use std::fmt;

/// Separator between the lower and upper bound of a range
pub const RANGE_SEPARATOR: &str = "..";

/// Parsed view of a multiplicity string
///
/// Bounds are kept as strings: unbounded markers like `*` pass through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Multiplicity {
    /// A single exact count, e.g. `1`
    Exact(String),
    /// A `min..max` range, e.g. `0..*`
    Range { min: String, max: String },
}

impl Multiplicity {
    /// Split on the first `..`; anything without one is an exact count
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(RANGE_SEPARATOR) {
            Some((min, max)) => Multiplicity::Range {
                min: min.to_string(),
                max: max.to_string(),
            },
            None => Multiplicity::Exact(raw.to_string()),
        }
    }

    /// `(min, max)`; an exact count is both
    pub fn bounds(&self) -> (&str, &str) {
        match self {
            Multiplicity::Exact(value) => (value, value),
            Multiplicity::Range { min, max } => (min, max),
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Multiplicity::Range { .. })
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Multiplicity::Exact(value) => write!(f, "{}", value),
            Multiplicity::Range { min, max } => write!(f, "{}{}{}", min, RANGE_SEPARATOR, max),
        }
    }
}

/// parent -> child -> the child's source multiplicity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiplicityLookup {
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl MultiplicityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a multiplicity, overwriting any earlier one for the same pair
    pub fn insert(
        &mut self,
        parent: impl Into<String>,
        child: impl Into<String>,
        multiplicity: impl Into<String>,
    ) {
        self.entries
            .entry(parent.into())
            .or_default()
            .insert(child.into(), multiplicity.into());
    }

    pub fn get(&self, parent: &str, child: &str) -> Option<&str> {
        self.entries
            .get(parent)
            .and_then(|children| children.get(child))
            .map(String::as_str)
    }

    pub fn resolve(&self, parent: &str, child: &str) -> Option<Multiplicity> {
        self.get(parent, child).map(Multiplicity::parse)
    }

    /// Children recorded under `parent`, in insertion order
    pub fn children_of(&self, parent: &str) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .get(parent)
            .into_iter()
            .flat_map(|children| children.iter().map(|(c, m)| (c.as_str(), m.as_str())))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
