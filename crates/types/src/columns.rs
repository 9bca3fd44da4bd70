// crates/types/src/columns.rs
//! Results-table column configuration.
//!
//! Each product edition builds its own owned [`ColumnSet`] at
//! construction time. Deriving a narrower set goes through
//! [`ColumnSet::without`], which returns a new value — no edition ever
//! mutates a table another edition also reads.

use serde::Serialize;
use thiserror::Error;

/// One column of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Attribute name the column displays (e.g. `"folder_path"`).
    pub name: String,
    /// Default width in pixels.
    pub default_width: u16,
    /// Whether the column is shown initially.
    pub visible: bool,
}

impl Column {
    /// Create a visible column with the given name and default width.
    pub fn new(name: impl Into<String>, default_width: u16) -> Self {
        Self {
            name: name.into(),
            default_width,
            visible: true,
        }
    }

    /// Same, but hidden until the user enables it.
    pub fn hidden(name: impl Into<String>, default_width: u16) -> Self {
        Self {
            visible: false,
            ..Self::new(name, default_width)
        }
    }
}

/// Two columns in one set share a name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate column name: {name}")]
pub struct DuplicateColumnError {
    pub name: String,
}

/// Ordered, owned set of results-table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    /// Build a set from an explicit column list.
    ///
    /// Column names must be unique within the set.
    pub fn new(columns: Vec<Column>) -> Result<Self, DuplicateColumnError> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(DuplicateColumnError {
                    name: col.name.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Column set of the standard (plain files) edition.
    pub fn standard_edition() -> Self {
        Self {
            columns: vec![
                Column::new("name", 200),
                Column::new("folder_path", 180),
                Column::new("size", 60),
                Column::new("extension", 40),
                Column::new("mtime", 120),
                Column::new("percentage", 60),
                Column::new("words", 120),
                Column::new("dupe_count", 80),
            ],
        }
    }

    /// Column set of the music edition, tag columns included.
    pub fn music_edition() -> Self {
        Self {
            columns: vec![
                Column::new("name", 200),
                Column::new("folder_path", 180),
                Column::new("size", 60),
                Column::new("duration", 60),
                Column::new("bitrate", 50),
                Column::new("samplerate", 60),
                Column::new("extension", 40),
                Column::new("mtime", 120),
                Column::new("title", 120),
                Column::new("artist", 120),
                Column::new("album", 120),
                Column::new("genre", 80),
                Column::new("year", 40),
                Column::new("track", 40),
                Column::new("comment", 120),
                Column::new("percentage", 60),
                Column::new("words", 120),
                Column::new("dupe_count", 80),
            ],
        }
    }

    /// New set with the named column removed. The receiver is untouched;
    /// removing an absent name is a no-op.
    pub fn without(&self, name: &str) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .filter(|c| c.name != name)
                .cloned()
                .collect(),
        }
    }

    /// Position of the named column, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}
