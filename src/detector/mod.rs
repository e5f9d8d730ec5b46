//! 1NF/2NF/3NF violation detection for one table.
//!
//! [`analyze`] is state-free: it takes the declared structure, a catalog
//! adapter, the FD oracle, and a config, and returns a fresh
//! [`report::ViolationReport`]. Catalog failures abort the run; no partial
//! reports are produced.

/// Atomicity, naming-group, and subset-enumeration heuristics.
pub mod heuristics;
/// The violation report structure.
pub mod report;

use tracing::debug;

use crate::catalog::adapter::{CatalogAdapter, CatalogSnapshot, SampleRows};
use crate::config::AnalysisConfig;
use crate::detector::heuristics::{is_atomic_value, proper_subsets, repeated_name_groups};
use crate::detector::report::{
    AtomicIssue, FdKind, PartialDependency, RepeatedGroup, TransitiveDependency, ViolationReport,
};
use crate::error::AnalyzeError;
use crate::oracle::FdOracle;
use crate::structure::model::TableStructure;

/// Run every normal-form check for `schema.table`.
///
/// The sample fetched once at the start (bounded by
/// [`AnalysisConfig::sample_rows`]) backs the 1NF atomicity scan and every
/// oracle query; each call re-reads live state, so unchanged data yields an
/// identical report.
pub fn analyze(
    schema: &str,
    table: &str,
    structure: &TableStructure,
    adapter: &dyn CatalogAdapter,
    oracle: &FdOracle,
    config: &AnalysisConfig,
) -> Result<ViolationReport, AnalyzeError> {
    let snapshot = CatalogSnapshot::load(adapter, schema, table)?;
    let prime = snapshot.prime_attributes();

    // Declared attributes that physically exist; everything below works on
    // this intersection, in declared order.
    let cols_to_check: Vec<String> = structure
        .attributes()
        .iter()
        .filter(|a| snapshot.columns.contains(a))
        .cloned()
        .collect();

    let sample = if cols_to_check.is_empty() {
        SampleRows::new(Vec::new(), Vec::new())
    } else {
        adapter.fetch_sample_rows(schema, table, &cols_to_check, config.sample_rows)?
    };
    debug!(
        table,
        declared = structure.attributes().len(),
        checked = cols_to_check.len(),
        sampled = sample.len(),
        "catalog snapshot loaded"
    );

    let mut rep = ViolationReport {
        schema: schema.to_string(),
        table: table.to_string(),
        declared_attributes: structure.attributes().to_vec(),
        physical_columns: snapshot.columns.clone(),
        primary_key: snapshot.primary_key.clone(),
        unique_sets: snapshot.unique_sets.clone(),
        prime_attributes: prime.iter().cloned().collect(),
        atomic_issues: Vec::new(),
        repeated_groups: Vec::new(),
        partial_dependencies: Vec::new(),
        transitive_dependencies: Vec::new(),
    };

    // 1NF: atomicity, first offender per column.
    for col in &cols_to_check {
        let idx = sample.require_column(col)?;
        if let Some(row) = sample.rows().iter().find(|r| !is_atomic_value(&r[idx])) {
            rep.atomic_issues.push(AtomicIssue {
                column: col.clone(),
                sample_value: row[idx].to_string(),
            });
        }
    }

    // 1NF: repeated naming families over the declared attributes.
    rep.repeated_groups = repeated_name_groups(structure.attributes())
        .into_iter()
        .map(|(base, columns)| RepeatedGroup { base, columns })
        .collect();

    // 2NF: only meaningful for composite primary keys.
    if snapshot.primary_key.len() > 1 {
        let non_key: Vec<&String> = cols_to_check
            .iter()
            .filter(|c| !snapshot.primary_key.contains(c))
            .collect();
        for subset in proper_subsets(&snapshot.primary_key) {
            for col in &non_key {
                let holds = oracle.holds(&subset, col, &sample, !config.fd_check_nulls)?;
                if holds {
                    rep.partial_dependencies.push(PartialDependency {
                        explain: format!(
                            "{} -> {col} (partial dependency on the composite key)",
                            subset.join("+")
                        ),
                        subset: subset.clone(),
                        attribute: (*col).clone(),
                    });
                }
            }
        }
    }

    // 3NF (a): declared FDs whose determinant is not a superkey.
    for fd in structure.declared_fds() {
        if snapshot.is_superkey(&fd.lhs) {
            continue;
        }
        for dependent in &fd.rhs {
            if prime.contains(dependent) {
                continue;
            }
            rep.transitive_dependencies.push(TransitiveDependency {
                determinant: fd.lhs.clone(),
                dependent: dependent.clone(),
                chain: format!("{} -> {dependent}", fd.lhs.join("+")),
                kind: FdKind::Declared,
                reason: "declared FD with a non-superkey determinant and non-prime dependent"
                    .to_string(),
            });
        }
    }

    // 3NF (b): inferred single-column chains PK -> a -> b.
    if config.infer_single_col_fds {
        let non_prime: Vec<&String> = cols_to_check
            .iter()
            .filter(|c| !prime.contains(*c))
            .collect();
        for a in &non_prime {
            // A column with all-distinct values is a candidate key, not a
            // transitive determinant.
            if oracle.is_unique(std::slice::from_ref(*a), &sample)? {
                continue;
            }
            for b in &non_prime {
                if a == b {
                    continue;
                }
                if oracle.holds(std::slice::from_ref(*a), b, &sample, true)? {
                    let chain = if snapshot.primary_key.is_empty() {
                        format!("{a} -> {b}")
                    } else {
                        format!("{} -> {a} -> {b}", snapshot.primary_key.join("+"))
                    };
                    rep.transitive_dependencies.push(TransitiveDependency {
                        determinant: vec![(*a).clone()],
                        dependent: (*b).clone(),
                        chain,
                        kind: FdKind::Inferred,
                        reason: "inferred single-column transitive dependency".to_string(),
                    });
                }
            }
        }
    }

    debug!(
        table,
        atomic = rep.atomic_issues.len(),
        groups = rep.repeated_groups.len(),
        partial = rep.partial_dependencies.len(),
        transitive = rep.transitive_dependencies.len(),
        "analysis complete"
    );
    Ok(rep)
}
