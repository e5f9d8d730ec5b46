use serde::{Deserialize, Serialize};

/// Tunables for one analysis run.
///
/// The FD checks are sample-bounded heuristics: `sample_rows` caps how much
/// data they see, and `min_group_support` optionally demands repeated
/// determinant values before a dependency is accepted. `sample_rows` and
/// `min_group_support` apply uniformly to every check in the run;
/// `fd_check_nulls` is scoped as documented on the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum rows sampled per table; `None` reads the whole table.
    pub sample_rows: Option<usize>,
    /// Infer single-column `A -> B` dependencies for the 3NF check.
    ///
    /// Multi-column inferred determinants are out of scope; only declared
    /// FDs may have composite left-hand sides.
    pub infer_single_col_fds: bool,
    /// Treat a null dependent value as a distinct value during the 2NF
    /// partial-dependency scan.
    ///
    /// When `false` (the default), rows with a null dependent are ignored.
    /// The inferred 3NF check always ignores null dependents regardless of
    /// this setting.
    pub fd_check_nulls: bool,
    /// Minimum determinant-partition size required before the oracle
    /// accepts a dependency. `1` disables the support requirement.
    pub min_group_support: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rows: Some(50_000),
            infer_single_col_fds: true,
            fd_check_nulls: false,
            min_group_support: 1,
        }
    }
}
