//! Decomposition planning.
//!
//! [`build_plan`] is a pure function from a violation report to a
//! [`plan::NormalizationPlan`]: no I/O, no catalog access. Types come from
//! the declared structure, falling back to the default SQL type when a row
//! left its type blank.

/// Plan data model.
pub mod plan;

use std::collections::BTreeSet;

use tracing::debug;

use crate::detector::report::{FdKind, ViolationReport};
use crate::planner::plan::{ForeignKeySpec, NewTableSpec, NormalizationPlan, SourceKind};
use crate::render::ident::safe_object_name;
use crate::structure::model::TableStructure;

/// Name of the ordinal column added to 1NF child tables.
pub const SEQUENCE_COLUMN: &str = "n";

/// Convert a violation report into a decomposition plan for `table`.
pub fn build_plan(
    table: &str,
    structure: &TableStructure,
    report: &ViolationReport,
) -> NormalizationPlan {
    let mut plan = NormalizationPlan {
        table: table.to_string(),
        primary_key: report.primary_key.clone(),
        new_tables: Vec::new(),
        drop_candidates: Vec::new(),
        notes: Vec::new(),
        original_columns: structure
            .attributes()
            .iter()
            .map(|a| (a.clone(), structure.declared_type_or_default(a)))
            .collect(),
    };

    plan_repeated_groups(table, structure, report, &mut plan);
    plan_partial_dependencies(table, structure, report, &mut plan);
    plan_transitive_dependencies(table, structure, report, &mut plan);

    if plan.new_tables.is_empty() {
        plan.notes.push(
            "no violations requiring new tables were detected; the table already satisfies \
             the checked normal forms"
                .to_string(),
        );
    }

    debug!(
        table,
        new_tables = plan.new_tables.len(),
        drop_candidates = plan.drop_candidates.len(),
        "plan built"
    );
    plan
}

/// 1NF repeated naming groups become child tables keyed by the original PK
/// plus a sequence column, with a single value column named after the
/// stripped prefix.
fn plan_repeated_groups(
    table: &str,
    structure: &TableStructure,
    report: &ViolationReport,
    plan: &mut NormalizationPlan,
) {
    for group in &report.repeated_groups {
        let base_clean = safe_object_name(&group.base);
        let name = format!("{table}_{base_clean}");

        let value_column = {
            let trimmed = group.base.trim_end_matches('_');
            if trimmed.is_empty() {
                "value".to_string()
            } else {
                trimmed.to_string()
            }
        };
        // The whole family shares one value column, typed after the first
        // member.
        let value_type = structure.declared_type_or_default(&group.columns[0]);

        let mut columns: Vec<(String, String)> = report
            .primary_key
            .iter()
            .map(|c| (c.clone(), structure.declared_type_or_default(c)))
            .collect();
        columns.push((SEQUENCE_COLUMN.to_string(), "INT".to_string()));
        columns.push((value_column, value_type));

        let mut primary_key = report.primary_key.clone();
        primary_key.push(SEQUENCE_COLUMN.to_string());

        push_drop_candidates(plan, &group.columns);
        plan.new_tables.push(NewTableSpec {
            source: SourceKind::OneNf,
            name,
            columns,
            primary_key,
            fk_from_original: None,
            moved_columns: group.columns.clone(),
            rationale: "repeated name group; loading requires UNPIVOT or per-ordinal inserts"
                .to_string(),
        });
    }
}

/// 2NF violations grouped by determinant subset: one table per subset,
/// keyed by it. No automatic FK back to the original, since the subset is
/// not guaranteed unique there.
fn plan_partial_dependencies(
    table: &str,
    structure: &TableStructure,
    report: &ViolationReport,
    plan: &mut NormalizationPlan,
) {
    let mut groups: Vec<(Vec<String>, Vec<String>)> = Vec::new();
    for pd in &report.partial_dependencies {
        match groups.iter_mut().find(|(subset, _)| *subset == pd.subset) {
            Some((_, attrs)) => attrs.push(pd.attribute.clone()),
            None => groups.push((pd.subset.clone(), vec![pd.attribute.clone()])),
        }
    }

    for (subset, attrs) in groups {
        let name = format!(
            "{table}_{}_det",
            subset
                .iter()
                .map(|s| safe_object_name(s))
                .collect::<Vec<_>>()
                .join("_")
        );
        let dependents = sorted_dedup(&attrs);

        let mut columns: Vec<(String, String)> = subset
            .iter()
            .map(|c| (c.clone(), structure.declared_type_or_default(c)))
            .collect();
        for attr in &dependents {
            columns.push((attr.clone(), structure.declared_type_or_default(attr)));
        }

        push_drop_candidates(plan, &dependents);
        plan.new_tables.push(NewTableSpec {
            source: SourceKind::TwoNf,
            name,
            columns,
            primary_key: subset,
            fk_from_original: None,
            moved_columns: dependents,
            rationale: "partial dependencies on part of the composite key; add a UNIQUE \
                        constraint on the determinant to enable a foreign key"
                .to_string(),
        });
    }
}

/// 3NF violations grouped by determinant: one dimension table per LHS,
/// keyed by it, with an FK from the original table.
fn plan_transitive_dependencies(
    table: &str,
    structure: &TableStructure,
    report: &ViolationReport,
    plan: &mut NormalizationPlan,
) {
    // Grouped by determinant across both kinds, so a determinant reported
    // by declaration and by inference still yields one table. Declared
    // membership wins the label.
    let mut groups: Vec<(Vec<String>, Vec<String>, FdKind)> = Vec::new();
    for td in &report.transitive_dependencies {
        match groups.iter_mut().find(|(det, _, _)| *det == td.determinant) {
            Some((_, deps, kind)) => {
                deps.push(td.dependent.clone());
                if td.kind == FdKind::Declared {
                    *kind = FdKind::Declared;
                }
            }
            None => groups.push((
                td.determinant.clone(),
                vec![td.dependent.clone()],
                td.kind,
            )),
        }
    }

    for (determinant, deps, kind) in groups {
        let name = format!(
            "{table}_{}_dim",
            determinant
                .iter()
                .map(|s| safe_object_name(s))
                .collect::<Vec<_>>()
                .join("_")
        );
        let dependents = sorted_dedup(&deps);

        let mut columns: Vec<(String, String)> = determinant
            .iter()
            .map(|c| (c.clone(), structure.declared_type_or_default(c)))
            .collect();
        for dep in &dependents {
            columns.push((dep.clone(), structure.declared_type_or_default(dep)));
        }

        push_drop_candidates(plan, &dependents);
        plan.new_tables.push(NewTableSpec {
            source: match kind {
                FdKind::Declared => SourceKind::ThreeNfDeclared,
                FdKind::Inferred => SourceKind::ThreeNfInferred,
            },
            name: name.clone(),
            columns,
            primary_key: determinant.clone(),
            fk_from_original: Some(ForeignKeySpec {
                from_table: table.to_string(),
                from_cols: determinant.clone(),
                to_table: name,
                to_cols: determinant,
            }),
            moved_columns: dependents,
            rationale: match kind {
                FdKind::Declared => "declared FD with a non-superkey determinant".to_string(),
                FdKind::Inferred => {
                    "inferred single-column transitive dependency".to_string()
                }
            },
        });
    }
}

fn sorted_dedup(cols: &[String]) -> Vec<String> {
    let set: BTreeSet<&String> = cols.iter().collect();
    set.into_iter().cloned().collect()
}

fn push_drop_candidates(plan: &mut NormalizationPlan, cols: &[String]) {
    for col in cols {
        if !plan.drop_candidates.contains(col) {
            plan.drop_candidates.push(col.clone());
        }
    }
}
