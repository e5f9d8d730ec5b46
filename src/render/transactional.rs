//! Transactional/incremental migration script.

use std::collections::HashSet;
use std::fmt::Write;

use crate::planner::plan::{NewTableSpec, NormalizationPlan, SourceKind};
use crate::render::ident::{qualified, quote_ident, quoted_list, safe_object_name};

pub(crate) fn render(schema: &str, table: &str, plan: &NormalizationPlan) -> String {
    let mut sql = String::new();
    let qorig = qualified(schema, table);
    let orig_cols: HashSet<&str> = plan.original_column_names().collect();

    writeln!(sql, "-- =====================================================").unwrap();
    writeln!(sql, "-- Proposed normalization for {schema}.{table}").unwrap();
    writeln!(sql, "-- Generated script: review and adjust before running").unwrap();
    writeln!(sql, "-- =====================================================").unwrap();
    writeln!(sql, "BEGIN TRAN;").unwrap();
    writeln!(sql).unwrap();

    for nt in &plan.new_tables {
        render_new_table(&mut sql, schema, table, &qorig, &orig_cols, nt);
    }

    if !plan.drop_candidates.is_empty() {
        writeln!(
            sql,
            "-- Columns that become candidates for removal from the original \
             (already listed per block above):"
        )
        .unwrap();
        writeln!(
            sql,
            "-- {}",
            quoted_list(plan.drop_candidates.iter().map(String::as_str))
        )
        .unwrap();
        writeln!(sql).unwrap();
    }

    for note in &plan.notes {
        writeln!(sql, "-- Note: {note}").unwrap();
    }

    writeln!(sql).unwrap();
    writeln!(sql, "-- If everything checks out:").unwrap();
    writeln!(sql, "-- COMMIT;").unwrap();
    writeln!(sql, "-- Otherwise:").unwrap();
    writeln!(sql, "ROLLBACK;").unwrap();
    sql
}

fn render_new_table(
    sql: &mut String,
    schema: &str,
    table: &str,
    qorig: &str,
    orig_cols: &HashSet<&str>,
    nt: &NewTableSpec,
) {
    let qnew = qualified(schema, &nt.name);
    let new_unquoted = format!("{schema}.{}", nt.name);

    writeln!(sql, "-- ---------- {} ----------", nt.source).unwrap();
    if !nt.rationale.is_empty() {
        writeln!(sql, "-- {}", nt.rationale).unwrap();
    }

    // Existence-checked CREATE TABLE. OBJECT_ID takes the unquoted name.
    writeln!(sql, "IF OBJECT_ID(N'{new_unquoted}', N'U') IS NULL").unwrap();
    writeln!(sql, "BEGIN").unwrap();
    let mut lines: Vec<String> = nt
        .columns
        .iter()
        .map(|(col, ty)| format!("    {} {ty}", quote_ident(col)))
        .collect();
    if !nt.primary_key.is_empty() {
        lines.push(format!(
            "    ,CONSTRAINT {} PRIMARY KEY ({})",
            safe_object_name(&format!("PK_{}", nt.name)),
            quoted_list(nt.primary_key.iter().map(String::as_str))
        ));
    }
    writeln!(sql, "  CREATE TABLE {qnew} (\n{}\n  );", lines.join(",\n")).unwrap();
    writeln!(sql, "END;").unwrap();

    render_insert(sql, qorig, &qnew, orig_cols, nt);

    if let Some(fk) = &nt.fk_from_original {
        let fk_name = safe_object_name(&format!("FK_{table}_{}", nt.name));
        writeln!(
            sql,
            "IF NOT EXISTS (SELECT 1 FROM sys.foreign_keys WHERE name = N'{fk_name}')"
        )
        .unwrap();
        writeln!(sql, "BEGIN").unwrap();
        writeln!(sql, "  ALTER TABLE {qorig}").unwrap();
        writeln!(
            sql,
            "  ADD CONSTRAINT {fk_name} FOREIGN KEY ({})",
            quoted_list(fk.from_cols.iter().map(String::as_str))
        )
        .unwrap();
        writeln!(
            sql,
            "      REFERENCES {qnew} ({});",
            quoted_list(fk.to_cols.iter().map(String::as_str))
        )
        .unwrap();
        writeln!(sql, "END;").unwrap();
    }

    // DROP COLUMN is never auto-executed: suggestions stay commented.
    if !nt.moved_columns.is_empty() {
        writeln!(
            sql,
            "-- Suggestion: drop the moved columns from the original (check dependencies first):"
        )
        .unwrap();
        for col in &nt.moved_columns {
            writeln!(sql, "-- ALTER TABLE {qorig} DROP COLUMN {};", quote_ident(col)).unwrap();
        }
    }

    writeln!(sql).unwrap();
}

fn render_insert(
    sql: &mut String,
    qorig: &str,
    qnew: &str,
    orig_cols: &HashSet<&str>,
    nt: &NewTableSpec,
) {
    if nt.source == SourceKind::OneNf {
        // Turning wide repeated columns into narrow rows needs an UNPIVOT
        // over actual data; render a template instead of guessing.
        writeln!(
            sql,
            "-- INSERT into {qnew}: requires UNPIVOT/CROSS APPLY of columns {}",
            quoted_list(nt.moved_columns.iter().map(String::as_str))
        )
        .unwrap();
        writeln!(sql, "-- Template (adjust names):").unwrap();
        writeln!(
            sql,
            "-- INSERT INTO {qnew} ({})",
            quoted_list(nt.column_names())
        )
        .unwrap();
        let key_cols = quoted_list(nt.primary_key.iter().map(String::as_str));
        writeln!(sql, "-- SELECT {key_cols}, v.n, v.value").unwrap();
        writeln!(sql, "-- FROM {qorig}").unwrap();
        writeln!(sql, "-- CROSS APPLY (").unwrap();
        match nt.moved_columns.first() {
            Some(first) => {
                writeln!(sql, "--   VALUES (1, {})", quote_ident(first)).unwrap();
            }
            None => writeln!(sql, "--   VALUES (1, NULL)").unwrap(),
        }
        for (i, col) in nt.moved_columns.iter().enumerate().skip(1) {
            writeln!(sql, "--        ,({}, {})", i + 1, quote_ident(col)).unwrap();
        }
        writeln!(sql, "-- ) AS v(n, value);").unwrap();
        return;
    }

    let missing: Vec<&str> = nt
        .column_names()
        .filter(|c| !orig_cols.contains(c))
        .collect();
    if missing.is_empty() {
        writeln!(
            sql,
            "INSERT INTO {qnew} ({})",
            quoted_list(nt.column_names())
        )
        .unwrap();
        writeln!(
            sql,
            "SELECT DISTINCT {}",
            quoted_list(nt.column_names())
        )
        .unwrap();
        writeln!(sql, "FROM {qorig};").unwrap();
    } else {
        writeln!(sql, "-- Could not generate an automatic INSERT for {qnew}:").unwrap();
        writeln!(
            sql,
            "-- columns not present in the original table: {}",
            quoted_list(missing)
        )
        .unwrap();
        writeln!(sql, "-- Write the INSERT by hand.").unwrap();
    }
}
