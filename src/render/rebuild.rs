//! Rebuild-style migration script.
//!
//! Snapshots the original table's rows into a backup, drops and recreates
//! the original with only the retained columns, reloads it from the backup,
//! creates and populates each new table from the backup, and finally drops
//! the backup. Intended for simple, reviewable one-shot scripts; there is
//! deliberately no transaction wrapper.

use std::collections::HashSet;
use std::fmt::Write;

use crate::planner::plan::{NewTableSpec, NormalizationPlan, SourceKind};
use crate::render::ident::{qualified, quote_ident, quoted_list, safe_object_name};

pub(crate) fn render(schema: &str, table: &str, plan: &NormalizationPlan) -> String {
    let mut sql = String::new();
    let qorig = qualified(schema, table);
    let backup_name = format!("{table}_backup");
    let qbackup = qualified(schema, &backup_name);
    let drop_set: HashSet<&str> = plan.drop_candidates.iter().map(String::as_str).collect();
    let orig_cols: HashSet<&str> = plan.original_column_names().collect();

    // Retained = declared columns that no violation moved out.
    let retained: Vec<&(String, String)> = plan
        .original_columns
        .iter()
        .filter(|(name, _)| !drop_set.contains(name.as_str()))
        .collect();

    // The PK of the rebuilt table survives only if every key column is
    // retained; moved columns are non-key, so this holds in practice.
    let retained_names: HashSet<&str> = retained.iter().map(|(n, _)| n.as_str()).collect();
    let pk: Vec<&str> = plan
        .primary_key
        .iter()
        .map(String::as_str)
        .filter(|c| retained_names.contains(c))
        .collect();

    writeln!(sql, "-- =====================================================").unwrap();
    writeln!(sql, "-- Rebuild-style normalization for {schema}.{table}").unwrap();
    writeln!(sql, "-- This script DROPS and recreates the original table.").unwrap();
    writeln!(sql, "-- =====================================================").unwrap();
    writeln!(sql).unwrap();

    writeln!(sql, "-- Snapshot the original rows.").unwrap();
    writeln!(sql, "SELECT * INTO {qbackup} FROM {qorig};").unwrap();
    writeln!(sql).unwrap();

    writeln!(sql, "DROP TABLE {qorig};").unwrap();
    writeln!(sql).unwrap();

    writeln!(sql, "-- Recreate the original with retained columns only.").unwrap();
    let mut lines: Vec<String> = retained
        .iter()
        .map(|(col, ty)| {
            let nullability = if pk.contains(&col.as_str()) {
                "NOT NULL"
            } else {
                "NULL"
            };
            format!("    {} {ty} {nullability}", quote_ident(col))
        })
        .collect();
    if !pk.is_empty() {
        lines.push(format!(
            "    ,CONSTRAINT {} PRIMARY KEY ({})",
            safe_object_name(&format!("PK_{table}")),
            quoted_list(pk.iter().copied())
        ));
    }
    writeln!(sql, "CREATE TABLE {qorig} (\n{}\n);", lines.join(",\n")).unwrap();

    let retained_list = quoted_list(retained.iter().map(|(n, _)| n.as_str()));
    writeln!(sql, "INSERT INTO {qorig} ({retained_list})").unwrap();
    writeln!(sql, "SELECT DISTINCT {retained_list}").unwrap();
    writeln!(sql, "FROM {qbackup};").unwrap();
    writeln!(sql).unwrap();

    for nt in &plan.new_tables {
        render_new_table(&mut sql, schema, &qbackup, &orig_cols, nt);
    }

    for fk_stmt in fk_statements(schema, table, &qorig, plan) {
        writeln!(sql, "{fk_stmt}").unwrap();
    }
    if plan.new_tables.iter().any(|nt| nt.fk_from_original.is_some()) {
        writeln!(sql).unwrap();
    }

    for note in &plan.notes {
        writeln!(sql, "-- Note: {note}").unwrap();
    }

    writeln!(sql, "DROP TABLE {qbackup};").unwrap();
    sql
}

fn render_new_table(
    sql: &mut String,
    schema: &str,
    qbackup: &str,
    orig_cols: &HashSet<&str>,
    nt: &NewTableSpec,
) {
    let qnew = qualified(schema, &nt.name);

    writeln!(sql, "-- ---------- {} ----------", nt.source).unwrap();
    if !nt.rationale.is_empty() {
        writeln!(sql, "-- {}", nt.rationale).unwrap();
    }

    let mut lines: Vec<String> = nt
        .columns
        .iter()
        .map(|(col, ty)| {
            let nullability = if nt.primary_key.contains(col) {
                "NOT NULL"
            } else {
                "NULL"
            };
            format!("    {} {ty} {nullability}", quote_ident(col))
        })
        .collect();
    if !nt.primary_key.is_empty() {
        lines.push(format!(
            "    ,CONSTRAINT {} PRIMARY KEY ({})",
            safe_object_name(&format!("PK_{}", nt.name)),
            quoted_list(nt.primary_key.iter().map(String::as_str))
        ));
    }
    writeln!(sql, "CREATE TABLE {qnew} (\n{}\n);", lines.join(",\n")).unwrap();

    if nt.source == SourceKind::OneNf {
        writeln!(
            sql,
            "-- Load for {qnew} requires an UNPIVOT of {} from {qbackup};",
            quoted_list(nt.moved_columns.iter().map(String::as_str))
        )
        .unwrap();
        writeln!(sql, "-- write the row-per-ordinal INSERT by hand.").unwrap();
    } else {
        let missing: Vec<&str> = nt
            .column_names()
            .filter(|c| !orig_cols.contains(c))
            .collect();
        if missing.is_empty() {
            let cols = quoted_list(nt.column_names());
            writeln!(sql, "INSERT INTO {qnew} ({cols})").unwrap();
            writeln!(sql, "SELECT DISTINCT {cols}").unwrap();
            writeln!(sql, "FROM {qbackup};").unwrap();
        } else {
            writeln!(sql, "-- Could not generate an automatic INSERT for {qnew}:").unwrap();
            writeln!(
                sql,
                "-- columns not present in the original table: {}",
                quoted_list(missing)
            )
            .unwrap();
        }
    }
    writeln!(sql).unwrap();
}

fn fk_statements(
    schema: &str,
    table: &str,
    qorig: &str,
    plan: &NormalizationPlan,
) -> Vec<String> {
    plan.new_tables
        .iter()
        .filter_map(|nt| {
            let fk = nt.fk_from_original.as_ref()?;
            let fk_name = safe_object_name(&format!("FK_{table}_{}", nt.name));
            Some(format!(
                "ALTER TABLE {qorig} ADD CONSTRAINT {fk_name} FOREIGN KEY ({}) REFERENCES {} ({});",
                quoted_list(fk.from_cols.iter().map(String::as_str)),
                qualified(schema, &fk.to_table),
                quoted_list(fk.to_cols.iter().map(String::as_str)),
            ))
        })
        .collect()
}
