use std::fmt;

use serde::{Deserialize, Serialize};

/// Which normal-form violation produced a planned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// 1NF repeated naming group.
    OneNf,
    /// 2NF partial dependency.
    TwoNf,
    /// 3NF declared FD.
    ThreeNfDeclared,
    /// 3NF inferred single-column chain.
    ThreeNfInferred,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::OneNf => write!(f, "1NF"),
            SourceKind::TwoNf => write!(f, "2NF"),
            SourceKind::ThreeNfDeclared => write!(f, "3NF-declared"),
            SourceKind::ThreeNfInferred => write!(f, "3NF-inferred"),
        }
    }
}

/// A foreign key from the original table back to a planned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySpec {
    /// Referencing table (the original).
    pub from_table: String,
    /// Referencing columns.
    pub from_cols: Vec<String>,
    /// Referenced (new) table.
    pub to_table: String,
    /// Referenced columns.
    pub to_cols: Vec<String>,
}

/// One table the plan proposes to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTableSpec {
    /// The violation family that produced this table.
    pub source: SourceKind,
    /// Generated table name.
    pub name: String,
    /// Ordered `(column, sql type)` definitions.
    pub columns: Vec<(String, String)>,
    /// Primary-key columns of the new table.
    pub primary_key: Vec<String>,
    /// Optional FK from the original table to this one.
    pub fk_from_original: Option<ForeignKeySpec>,
    /// Columns that move out of the original table.
    pub moved_columns: Vec<String>,
    /// Human-readable rationale for the reviewer.
    pub rationale: String,
}

impl NewTableSpec {
    /// Column names, without types.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}

/// Decomposition plan for one analyzed table.
///
/// Built once per (table, violation report) pair and consumed immediately
/// by the renderer; it is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationPlan {
    /// The original table.
    pub table: String,
    /// Primary-key columns of the original table, in key order.
    pub primary_key: Vec<String>,
    /// Tables to create.
    pub new_tables: Vec<NewTableSpec>,
    /// Deduplicated union of all moved columns, in discovery order.
    pub drop_candidates: Vec<String>,
    /// Free-text notes for the reviewer.
    pub notes: Vec<String>,
    /// Declared `(column, sql type)` pairs of the original table, used by
    /// the renderer to validate INSERT projections.
    pub original_columns: Vec<(String, String)>,
}

impl NormalizationPlan {
    /// True when no violation produced a new table.
    pub fn is_empty(&self) -> bool {
        self.new_tables.is_empty()
    }

    /// Names of the original table's declared columns.
    pub fn original_column_names(&self) -> impl Iterator<Item = &str> {
        self.original_columns.iter().map(|(name, _)| name.as_str())
    }
}
