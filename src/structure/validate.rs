//! Row-level validation of the declared structure.
//!
//! This is the gate that runs before the analyzer: it rejects malformed
//! rows with line-numbered messages so the rest of the pipeline can assume
//! well-formed input. Line numbers start at 2 (line 1 is the CSV header).

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::structure::fd::{parse_fd_clause, split_fd_cell};
use crate::structure::model::{split_cell_tokens, AttributeSpec};

static RE_VARCHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(VAR)?CHAR\(\s*\d+\s*\)$").unwrap());
static RE_NVARCHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^N(VAR)?CHAR\(\s*\d+\s*\)$").unwrap());
static RE_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(DECIMAL|NUMERIC)\(\s*\d+\s*,\s*\d+\s*\)$").unwrap());
static RE_FK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:FK)\(\s*([A-Za-z0-9_]+)\.([A-Za-z0-9_]+)\s*\)$").unwrap());

const BASIC_TYPES: &[&str] = &[
    "INT",
    "BIGINT",
    "SMALLINT",
    "TINYINT",
    "DATE",
    "DATETIME",
    "DATETIME2",
    "SMALLDATETIME",
    "TIME",
    "FLOAT",
    "REAL",
    "BIT",
    "MONEY",
    "SMALLMONEY",
    "TEXT",
    "NTEXT",
    "UNIQUEIDENTIFIER",
];

/// Capture the `(table, column)` of an `FK(Table.Col)` token.
pub(crate) fn fk_target_captures(token: &str) -> Option<(String, String)> {
    let caps = RE_FK.captures(token)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Outcome of validating declared structure rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Hard failures; the structure must not be analyzed while any exist.
    pub errors: Vec<String>,
    /// Non-fatal findings worth surfacing.
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    /// True when no errors were found (warnings allowed).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a declared SQL type.
///
/// Accepts `CHAR(n)`/`VARCHAR(n)`/`NCHAR(n)`/`NVARCHAR(n)`,
/// `DECIMAL(p,s)`/`NUMERIC(p,s)`, and the fixed basic types.
pub fn validate_type(sql_type: &str) -> Result<(), String> {
    let trimmed = sql_type.trim();
    if trimmed.is_empty() {
        return Err("empty type".to_string());
    }
    if RE_VARCHAR.is_match(trimmed) || RE_NVARCHAR.is_match(trimmed) || RE_DECIMAL.is_match(trimmed)
    {
        return Ok(());
    }

    let upper = trimmed.to_ascii_uppercase();
    let base = upper.split('(').next().unwrap_or("").trim();
    if BASIC_TYPES.contains(&base) {
        return Ok(());
    }
    if matches!(base, "VARCHAR" | "CHAR" | "NVARCHAR" | "NCHAR") {
        return Err(format!("specify a length: use {base}(n), e.g. {base}(100)"));
    }
    if matches!(base, "DECIMAL" | "NUMERIC") {
        return Err(format!(
            "specify precision and scale: use {base}(p,s), e.g. {base}(10,2)"
        ));
    }
    Err(format!("unrecognized type: {trimmed}"))
}

/// Validate a key cell: `;`/`,`-separated combinations of
/// `PK`, `PK(part)`, `FK`, `FK(Table.Col)`, `UNIQUE`, `NK`.
pub fn validate_key_cell(cell: &str) -> Result<(), String> {
    for token in split_cell_tokens(cell) {
        let upper = token.to_ascii_uppercase();
        if matches!(upper.as_str(), "PK" | "PK(PART)" | "NK" | "UNIQUE" | "FK") {
            continue;
        }
        if upper.starts_with("FK(") {
            if fk_target_captures(token).is_some() {
                continue;
            }
            return Err("invalid FK, expected format: FK(Table.Col)".to_string());
        }
        return Err(format!("unsupported key token: {token}"));
    }
    Ok(())
}

/// Validate every structure row, returning line-numbered errors and
/// warnings.
///
/// When `require_fk_target` is set, a bare `FK` token (no declared target)
/// is an error instead of a warning.
pub fn validate_rows(rows: &[AttributeSpec], require_fk_target: bool) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    // (table -> columns) and (table, column) pairs declared anywhere in the
    // structure, for FD and FK target checks. All lowercased.
    let mut table_cols: HashMap<String, HashSet<String>> = HashMap::new();
    for row in rows {
        if row.table.is_empty() || row.attribute.is_empty() {
            continue;
        }
        table_cols
            .entry(row.table.to_ascii_lowercase())
            .or_default()
            .insert(row.attribute.to_ascii_lowercase());
    }

    for (i, row) in rows.iter().enumerate() {
        let line = i + 2;

        if row.table.is_empty() {
            outcome.errors.push(format!("line {line}: 'table' is blank"));
        }
        if row.attribute.is_empty() {
            outcome
                .errors
                .push(format!("line {line}: 'attribute' is blank"));
        }

        let pair = (
            row.table.to_ascii_lowercase(),
            row.attribute.to_ascii_lowercase(),
        );
        if !seen.insert(pair) {
            outcome.errors.push(format!(
                "line {line}: duplicate attribute '{}.{}'",
                row.table, row.attribute
            ));
        }

        if let Err(msg) = validate_type(&row.sql_type) {
            outcome.errors.push(format!(
                "line {line}: invalid type '{}': {msg}",
                row.sql_type
            ));
        }

        match validate_key_cell(&row.key) {
            Err(msg) => {
                outcome
                    .errors
                    .push(format!("line {line}: invalid key '{}': {msg}", row.key));
            }
            Ok(()) => {
                for token in split_cell_tokens(&row.key) {
                    let upper = token.to_ascii_uppercase();
                    if upper == "FK" {
                        if require_fk_target {
                            outcome.errors.push(format!(
                                "line {line}: '{}.{}' declares FK without a target \
                                 (use FK(Table.Col) or disable the requirement)",
                                row.table, row.attribute
                            ));
                        } else {
                            outcome.warnings.push(format!(
                                "line {line}: '{}.{}' declares FK without a target; \
                                 it will be resolved from the live catalog",
                                row.table, row.attribute
                            ));
                        }
                    } else if upper.starts_with("FK(") {
                        if let Some((ref_table, ref_col)) = fk_target_captures(token) {
                            let known = table_cols
                                .get(&ref_table.to_ascii_lowercase())
                                .is_some_and(|cols| cols.contains(&ref_col.to_ascii_lowercase()));
                            if !known {
                                outcome.errors.push(format!(
                                    "line {line}: FK points at an undeclared column: \
                                     {ref_table}.{ref_col}"
                                ));
                            }
                        }
                    }
                }
            }
        }

        validate_fd_cell(row, line, &table_cols, &mut outcome);
    }

    outcome
}

fn validate_fd_cell(
    row: &AttributeSpec,
    line: usize,
    table_cols: &HashMap<String, HashSet<String>>,
    outcome: &mut ValidationOutcome,
) {
    if row.functional_dependency.is_empty() {
        return;
    }

    let empty = HashSet::new();
    let cols_in_table = table_cols
        .get(&row.table.to_ascii_lowercase())
        .unwrap_or(&empty);

    for clause in split_fd_cell(&row.functional_dependency) {
        let fd = match parse_fd_clause(clause) {
            Ok(fd) => fd,
            Err(reason) => {
                outcome.errors.push(format!(
                    "line {line}: invalid functional dependency '{clause}' ({reason}); \
                     expected format: A,B->C,D"
                ));
                continue;
            }
        };

        for col in fd.lhs.iter().chain(fd.rhs.iter()) {
            if !cols_in_table.contains(&col.to_ascii_lowercase()) {
                outcome.errors.push(format!(
                    "line {line}: FD '{clause}' references a column not declared in {}: '{col}'",
                    row.table
                ));
            }
        }

        if fd.rhs.iter().any(|c| c == &row.attribute) {
            outcome.warnings.push(format!(
                "line {line}: FD '{clause}' lists '{}' on its own RHS (check for redundancy)",
                row.attribute
            ));
        }
    }
}
