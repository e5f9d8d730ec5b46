//! Functional-dependency clause parsing.
//!
//! Kept as pure string processing behind a small interface so the parsing
//! rules can be tuned without touching detection or planning logic.

use crate::structure::model::FunctionalDependency;

/// Split an FD cell on `;` into trimmed, non-empty clauses.
pub fn split_fd_cell(cell: &str) -> Vec<&str> {
    cell.split(';')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect()
}

/// Parse one `LHS->RHS` clause where each side is a comma-separated
/// attribute list, e.g. `A,B->C,D`.
pub fn parse_fd_clause(clause: &str) -> Result<FunctionalDependency, String> {
    let Some((lhs_raw, rhs_raw)) = clause.split_once("->") else {
        return Err("missing '->'".to_string());
    };
    let lhs = split_column_list(lhs_raw);
    let rhs = split_column_list(rhs_raw);
    if lhs.is_empty() || rhs.is_empty() {
        return Err("empty LHS or RHS".to_string());
    }
    Ok(FunctionalDependency { lhs, rhs })
}

fn split_column_list(side: &str) -> Vec<String> {
    side.split(',')
        .map(str::trim)
        .filter(|col| !col.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_parses_both_sides() {
        let fd = parse_fd_clause("A, B -> C,D").unwrap();
        assert_eq!(fd.lhs, vec!["A", "B"]);
        assert_eq!(fd.rhs, vec!["C", "D"]);
    }

    #[test]
    fn missing_arrow_is_rejected() {
        assert!(parse_fd_clause("A, B").is_err());
    }

    #[test]
    fn empty_sides_are_rejected() {
        assert!(parse_fd_clause("-> C").is_err());
        assert!(parse_fd_clause("A ->").is_err());
        assert!(parse_fd_clause(", -> ,").is_err());
    }

    #[test]
    fn cell_splits_on_semicolons_only() {
        assert_eq!(
            split_fd_cell("A->B; C,D->E ;"),
            vec!["A->B", "C,D->E"]
        );
    }
}
