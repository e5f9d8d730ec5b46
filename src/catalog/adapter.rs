use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::value::Value;
use crate::error::AnalyzeError;

/// Read-only window into the physical database, as consumed by the analyzer.
///
/// One analysis run acquires everything it needs through this trait and
/// never caches between runs: every call reflects current schema and data.
/// Failures propagate as [`AnalyzeError`] and abort the run.
pub trait CatalogAdapter {
    /// Physical columns of `schema.table` in ordinal order.
    fn columns(&self, schema: &str, table: &str) -> Result<Vec<String>, AnalyzeError>;

    /// Primary-key columns in key order; empty when the table has no PK.
    fn primary_key_columns(&self, schema: &str, table: &str) -> Result<Vec<String>, AnalyzeError>;

    /// Column sets carrying a unique index or constraint, excluding the
    /// primary key.
    fn unique_column_sets(&self, schema: &str, table: &str)
        -> Result<Vec<Vec<String>>, AnalyzeError>;

    /// Up to `limit` rows of the given columns; all rows when `None`.
    fn fetch_sample_rows(
        &self,
        schema: &str,
        table: &str,
        columns: &[String],
        limit: Option<usize>,
    ) -> Result<SampleRows, AnalyzeError>;
}

/// Sampled rows together with their column header.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRows {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl SampleRows {
    /// Wrap a column header and row tuples. Each row is expected to have
    /// one value per header column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Column header, in fetch order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The sampled row tuples.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of sampled rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the sample holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Resolve `name` or fail with [`AnalyzeError::ColumnMissing`].
    pub fn require_column(&self, name: &str) -> Result<usize, AnalyzeError> {
        self.column_index(name).ok_or_else(|| AnalyzeError::ColumnMissing {
            column: name.to_string(),
        })
    }
}

/// One-table catalog snapshot taken at the start of an analysis.
///
/// Owned by the caller for the duration of the run; the detector reads it
/// but never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Physical columns in ordinal order.
    pub columns: Vec<String>,
    /// Primary-key columns in key order.
    pub primary_key: Vec<String>,
    /// Unique column sets, excluding the primary key.
    pub unique_sets: Vec<Vec<String>>,
}

impl CatalogSnapshot {
    /// Read the three catalog facets for `schema.table` in one pass.
    pub fn load(
        adapter: &dyn CatalogAdapter,
        schema: &str,
        table: &str,
    ) -> Result<Self, AnalyzeError> {
        Ok(Self {
            columns: adapter.columns(schema, table)?,
            primary_key: adapter.primary_key_columns(schema, table)?,
            unique_sets: adapter.unique_column_sets(schema, table)?,
        })
    }

    /// Union of the primary key and every unique set: an attribute is prime
    /// iff it participates in some uniqueness guarantee.
    pub fn prime_attributes(&self) -> BTreeSet<String> {
        let mut prime: BTreeSet<String> = self.primary_key.iter().cloned().collect();
        for set in &self.unique_sets {
            prime.extend(set.iter().cloned());
        }
        prime
    }

    /// True when `cols` equals (as a set) the primary key or any unique set.
    pub fn is_superkey(&self, cols: &[String]) -> bool {
        let candidate: BTreeSet<&str> = cols.iter().map(String::as_str).collect();
        let pk: BTreeSet<&str> = self.primary_key.iter().map(String::as_str).collect();
        if !pk.is_empty() && candidate == pk {
            return true;
        }
        self.unique_sets.iter().any(|set| {
            let unique: BTreeSet<&str> = set.iter().map(String::as_str).collect();
            candidate == unique
        })
    }
}
