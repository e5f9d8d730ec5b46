//! Statistical functional-dependency oracle.
//!
//! Answers whether `LHS -> RHS` plausibly holds over sampled rows. This is
//! a bounded heuristic, not certified FD mining: a determinant group of
//! size 1 trivially "determines" its dependent (false positives on sparse
//! data), and a sample can miss the counterexample (false negatives).
//! Sample size and null handling are controlled by the caller; the optional
//! support threshold is applied uniformly when configured.

use std::collections::{HashMap, HashSet};

use crate::catalog::adapter::SampleRows;
use crate::catalog::value::GroupKey;
use crate::error::AnalyzeError;

/// Sample-backed oracle for functional-dependency questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FdOracle {
    min_group_support: usize,
}

impl FdOracle {
    /// Oracle with no support requirement: any partition counts, including
    /// singletons.
    pub fn new() -> Self {
        Self::default()
    }

    /// Oracle that only accepts a dependency when at least one determinant
    /// partition holds `support` or more rows. `0` and `1` disable the
    /// requirement.
    pub fn with_min_support(support: usize) -> Self {
        Self {
            min_group_support: support,
        }
    }

    /// Does `determinant -> dependent` hold over `rows`?
    ///
    /// Rows with a null determinant value are excluded. With
    /// `ignore_null_rhs`, rows with a null dependent are excluded as well;
    /// otherwise null counts as a distinct dependent value. The dependency
    /// is violated iff some partition sees more than one distinct dependent
    /// value.
    pub fn holds(
        &self,
        determinant: &[String],
        dependent: &str,
        rows: &SampleRows,
        ignore_null_rhs: bool,
    ) -> Result<bool, AnalyzeError> {
        let det_idx: Vec<usize> = determinant
            .iter()
            .map(|c| rows.require_column(c))
            .collect::<Result<_, _>>()?;
        let dep_idx = rows.require_column(dependent)?;

        // partition key -> (distinct dependent values, partition size)
        let mut partitions: HashMap<Vec<GroupKey>, (HashSet<GroupKey>, usize)> = HashMap::new();

        for row in rows.rows() {
            if det_idx.iter().any(|&i| row[i].is_null()) {
                continue;
            }
            let dep = &row[dep_idx];
            if ignore_null_rhs && dep.is_null() {
                continue;
            }

            let key: Vec<GroupKey> = det_idx.iter().map(|&i| row[i].group_key()).collect();
            let entry = partitions.entry(key).or_default();
            entry.0.insert(dep.group_key());
            entry.1 += 1;
            if entry.0.len() > 1 {
                return Ok(false);
            }
        }

        if self.min_group_support > 1 {
            let supported = partitions
                .values()
                .any(|(_, size)| *size >= self.min_group_support);
            if !supported {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True iff no group of identical `cols` values spans more than one
    /// row. Nulls group together, as in SQL `GROUP BY`.
    pub fn is_unique(&self, cols: &[String], rows: &SampleRows) -> Result<bool, AnalyzeError> {
        let idx: Vec<usize> = cols
            .iter()
            .map(|c| rows.require_column(c))
            .collect::<Result<_, _>>()?;

        let mut seen: HashSet<Vec<GroupKey>> = HashSet::new();
        for row in rows.rows() {
            let key: Vec<GroupKey> = idx.iter().map(|&i| row[i].group_key()).collect();
            if !seen.insert(key) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
