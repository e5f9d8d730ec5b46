//! Merge ordered structure rows into per-table structures.

use std::collections::BTreeMap;

use crate::error::AnalyzeError;
use crate::structure::fd::{parse_fd_clause, split_fd_cell};
use crate::structure::model::{AttributeSpec, TableStructure};

/// Build one [`TableStructure`] per table from ordered structure rows.
///
/// Rows with a blank table or attribute are skipped; attribute order within
/// a table is preserved exactly as first encountered. FD cells are split on
/// `;` and parsed as `LHS->RHS` clauses. The upstream validator is expected
/// to reject malformed clauses; if one reaches this builder anyway, the
/// whole build fails fast with [`AnalyzeError::MalformedFd`].
pub fn build_structures(
    rows: &[AttributeSpec],
) -> Result<BTreeMap<String, TableStructure>, AnalyzeError> {
    let mut structures: BTreeMap<String, TableStructure> = BTreeMap::new();

    for row in rows {
        if row.table.is_empty() || row.attribute.is_empty() {
            continue;
        }

        let structure = structures
            .entry(row.table.clone())
            .or_insert_with(|| TableStructure::new(&row.table));
        structure.push_attribute(row);

        for clause in split_fd_cell(&row.functional_dependency) {
            let fd = parse_fd_clause(clause).map_err(|reason| AnalyzeError::MalformedFd {
                table: row.table.clone(),
                clause: clause.to_string(),
                reason,
            })?;
            structure.push_fd(fd);
        }
    }

    Ok(structures)
}

/// Look up a table structure case-insensitively, the way declared table
/// names are matched against user input.
pub fn lookup<'a>(
    structures: &'a BTreeMap<String, TableStructure>,
    name: &str,
) -> Option<&'a TableStructure> {
    let want = name.trim().to_ascii_lowercase();
    structures
        .values()
        .find(|s| s.name.to_ascii_lowercase() == want)
}
