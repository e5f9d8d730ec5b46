use serde::{Deserialize, Serialize};

/// A non-atomic sample found by the 1NF scan.
///
/// Only the first offending value per column is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicIssue {
    /// Column holding the value.
    pub column: String,
    /// Display form of the offending value.
    pub sample_value: String,
}

/// A family of attributes repeated by trailing-digit naming
/// (`Phone1`, `Phone2`, ...), suggesting a child table keyed by sequence
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedGroup {
    /// Trimmed, lowercased shared prefix.
    pub base: String,
    /// Member columns, in declared order.
    pub columns: Vec<String>,
}

/// A 2NF violation: a non-key attribute depends on a strict subset of the
/// composite primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDependency {
    /// The determinant subset of the primary key.
    pub subset: Vec<String>,
    /// The dependent non-key attribute.
    pub attribute: String,
    /// Human-readable explanation, e.g. `A+B -> C (partial dependency...)`.
    pub explain: String,
}

/// Whether a transitive dependency came from the declared FDs or from
/// single-column inference over sampled data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FdKind {
    /// Declared in the structure file.
    Declared,
    /// Inferred by the statistical oracle (single-column determinant).
    Inferred,
}

/// A 3NF violation: a non-prime attribute depends on a non-superkey
/// determinant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitiveDependency {
    /// Determinant columns (single column for inferred chains).
    pub determinant: Vec<String>,
    /// The dependent non-prime attribute.
    pub dependent: String,
    /// Display chain, e.g. `ZipCode -> City` or `PK -> A -> B`.
    pub chain: String,
    /// Declared or inferred.
    pub kind: FdKind,
    /// Why this is a violation.
    pub reason: String,
}

/// Everything one analysis run found for a single table.
///
/// Produced fresh per run and never mutated afterward; re-running against
/// unchanged data yields an identical report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    /// Schema of the analyzed table.
    pub schema: String,
    /// Analyzed table name.
    pub table: String,
    /// Declared attributes, in structure-file order.
    pub declared_attributes: Vec<String>,
    /// Physical columns, in ordinal order.
    pub physical_columns: Vec<String>,
    /// Primary-key columns, in key order.
    pub primary_key: Vec<String>,
    /// Unique column sets (excluding the PK).
    pub unique_sets: Vec<Vec<String>>,
    /// Sorted prime attributes (PK union unique sets).
    pub prime_attributes: Vec<String>,
    /// 1NF: first non-atomic sample per offending column.
    pub atomic_issues: Vec<AtomicIssue>,
    /// 1NF: repeated trailing-digit attribute families.
    pub repeated_groups: Vec<RepeatedGroup>,
    /// 2NF: partial dependencies on subsets of a composite key.
    pub partial_dependencies: Vec<PartialDependency>,
    /// 3NF: declared and inferred transitive dependencies.
    pub transitive_dependencies: Vec<TransitiveDependency>,
}

impl ViolationReport {
    /// True when no check produced a finding.
    pub fn is_clean(&self) -> bool {
        self.atomic_issues.is_empty()
            && self.repeated_groups.is_empty()
            && self.partial_dependencies.is_empty()
            && self.transitive_dependencies.is_empty()
    }
}
