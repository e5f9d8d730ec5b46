use thiserror::Error;

/// Failures surfaced while analyzing a table.
///
/// Catalog and data-access failures abort the current table's analysis
/// without partial results; structure-shape failures indicate input that the
/// upstream validator should have rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    /// The requested table does not exist in the catalog.
    #[error("table '{schema}.{table}' not found in catalog")]
    TableNotFound {
        /// Schema of the missing table.
        schema: String,
        /// Name of the missing table.
        table: String,
    },

    /// A catalog or data query failed.
    #[error("catalog access failed for '{schema}.{table}' during {check}: {message}")]
    Catalog {
        /// Schema of the table under analysis.
        schema: String,
        /// Table under analysis.
        table: String,
        /// Which check issued the failing query.
        check: String,
        /// Underlying failure description.
        message: String,
    },

    /// A requested column is absent from the sampled row set.
    #[error("column '{column}' missing from sampled rows")]
    ColumnMissing {
        /// Name of the missing column.
        column: String,
    },

    /// A declared functional-dependency clause did not parse.
    ///
    /// The external validator is expected to reject these before the
    /// structure builder runs; hitting this error means the precondition
    /// was violated.
    #[error("malformed functional dependency '{clause}' for table '{table}': {reason}")]
    MalformedFd {
        /// Table whose structure row carried the clause.
        table: String,
        /// The offending clause text.
        clause: String,
        /// Why the clause failed to parse.
        reason: String,
    },
}

impl AnalyzeError {
    /// Convenience constructor for catalog access failures.
    pub fn catalog(
        schema: impl Into<String>,
        table: impl Into<String>,
        check: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Catalog {
            schema: schema.into(),
            table: table.into(),
            check: check.into(),
            message: message.into(),
        }
    }
}
