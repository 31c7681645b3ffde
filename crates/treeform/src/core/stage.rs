//! Pipeline stage traits
//!
//! A transform is a parse into a [`Database`] followed by any number of
//! renders out of it. Stages return `anyhow::Result`; the typed
//! [`ModelError`](super::ModelError) underneath can be recovered with
//! `downcast_ref`.

use anyhow::Result;

use super::Database;

/// Reads markup into a database
///
/// # Example
/// ```
/// use treeform::core::{Database, Parser};
/// use treeform::model::{ModelDatabase, ModelParser};
///
/// let parser = ModelParser::new();
/// let mut db = ModelDatabase::new();
/// parser.parse(r#"<Model><Class name="A"/></Model>"#, &mut db).unwrap();
/// assert_eq!(db.node_count(), 1);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse `input` into `database`
    ///
    /// On error the database must be left as it was.
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Parse into a fresh database
    fn parse_new(&self, input: &str) -> Result<D>
    where
        D: Default,
    {
        let mut database = D::default();
        self.parse(input, &mut database)?;
        Ok(database)
    }

    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// Cheap check that `input` looks like markup this parser reads
    fn can_parse(&self, input: &str) -> bool;
}

/// Produces one output document from a database
pub trait Renderer<D: Database>: Send + Sync {
    /// Rendered document; text or records serialized by the caller
    type Output;

    /// Render `database`; nothing is produced on error
    fn render(&self, database: &D) -> Result<Self::Output>;

    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// Output format name, e.g. `xml` or `json`
    fn format(&self) -> &'static str;
}
