use std::collections::HashMap;

use crate::catalog::adapter::{CatalogAdapter, SampleRows};
use crate::catalog::value::Value;
use crate::error::AnalyzeError;

/// In-memory [`CatalogAdapter`] backed by explicit table definitions.
///
/// Stands in for the live-database layer: the CLI loads CSV data into it,
/// and the test suites use it to script exact key metadata and row
/// contents. Lookup is by exact `(schema, table)` name.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: HashMap<(String, String), MemoryTable>,
}

impl MemoryCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `table` under `schema.name`, replacing any previous entry.
    pub fn insert(&mut self, schema: &str, name: &str, table: MemoryTable) {
        self.tables
            .insert((schema.to_string(), name.to_string()), table);
    }

    fn table(&self, schema: &str, name: &str) -> Result<&MemoryTable, AnalyzeError> {
        self.tables
            .get(&(schema.to_string(), name.to_string()))
            .ok_or_else(|| AnalyzeError::TableNotFound {
                schema: schema.to_string(),
                table: name.to_string(),
            })
    }
}

impl CatalogAdapter for MemoryCatalog {
    fn columns(&self, schema: &str, table: &str) -> Result<Vec<String>, AnalyzeError> {
        Ok(self.table(schema, table)?.columns.clone())
    }

    fn primary_key_columns(&self, schema: &str, table: &str) -> Result<Vec<String>, AnalyzeError> {
        Ok(self.table(schema, table)?.primary_key.clone())
    }

    fn unique_column_sets(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<Vec<String>>, AnalyzeError> {
        Ok(self.table(schema, table)?.unique_sets.clone())
    }

    fn fetch_sample_rows(
        &self,
        schema: &str,
        table: &str,
        columns: &[String],
        limit: Option<usize>,
    ) -> Result<SampleRows, AnalyzeError> {
        let t = self.table(schema, table)?;
        let mut indices = Vec::with_capacity(columns.len());
        for col in columns {
            let idx = t
                .columns
                .iter()
                .position(|c| c == col)
                .ok_or_else(|| AnalyzeError::ColumnMissing {
                    column: col.clone(),
                })?;
            indices.push(idx);
        }

        let take = limit.unwrap_or(usize::MAX);
        let rows = t
            .rows
            .iter()
            .take(take)
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(SampleRows::new(columns.to_vec(), rows))
    }
}

/// One table held by a [`MemoryCatalog`].
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    columns: Vec<String>,
    primary_key: Vec<String>,
    unique_sets: Vec<Vec<String>>,
    rows: Vec<Vec<Value>>,
}

impl MemoryTable {
    /// Table with the given physical columns and no keys or rows.
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Declare the primary-key columns, in key order.
    #[must_use]
    pub fn with_primary_key(mut self, cols: &[&str]) -> Self {
        self.primary_key = cols.iter().map(ToString::to_string).collect();
        self
    }

    /// Add one unique column set (excluding the primary key).
    #[must_use]
    pub fn with_unique_set(mut self, cols: &[&str]) -> Self {
        self.unique_sets
            .push(cols.iter().map(ToString::to_string).collect());
        self
    }

    /// Append one row; must carry one value per physical column.
    #[must_use]
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
        self
    }

    /// Append a whole block of rows.
    #[must_use]
    pub fn with_rows(mut self, rows: Vec<Vec<Value>>) -> Self {
        for row in rows {
            debug_assert_eq!(row.len(), self.columns.len());
            self.rows.push(row);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Value {
        Value::Int(i)
    }

    fn catalog() -> MemoryCatalog {
        let mut cat = MemoryCatalog::new();
        cat.insert(
            "dbo",
            "t",
            MemoryTable::new(&["a", "b"])
                .with_primary_key(&["a"])
                .with_row(vec![int(1), int(10)])
                .with_row(vec![int(2), int(20)])
                .with_row(vec![int(3), int(30)]),
        );
        cat
    }

    #[test]
    fn missing_table_surfaces_not_found() {
        let cat = catalog();
        let err = cat.columns("dbo", "nope").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::TableNotFound {
                schema: "dbo".to_string(),
                table: "nope".to_string()
            }
        );
    }

    #[test]
    fn sample_rows_honor_projection_and_limit() {
        let cat = catalog();
        let rows = cat
            .fetch_sample_rows("dbo", "t", &["b".to_string()], Some(2))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows()[0], vec![int(10)]);
        assert_eq!(rows.rows()[1], vec![int(20)]);
    }

    #[test]
    fn unknown_projection_column_fails() {
        let cat = catalog();
        let err = cat
            .fetch_sample_rows("dbo", "t", &["zz".to_string()], None)
            .unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::ColumnMissing {
                column: "zz".to_string()
            }
        );
    }
}
