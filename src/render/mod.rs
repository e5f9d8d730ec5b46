//! Migration-script rendering.
//!
//! Two interchangeable strategies serialize a [`NormalizationPlan`] into
//! SQL text. Neither executes anything: the script is the whole output.
//! Both guarantee that generated `INSERT` statements only project columns
//! present in the original column set; when a new table cannot be sourced
//! that way, an explanatory comment is emitted instead of a broken
//! statement.

/// Identifier quoting helpers.
pub mod ident;
mod rebuild;
mod transactional;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::planner::plan::NormalizationPlan;

/// How the migration script realizes the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderStrategy {
    /// Incremental script wrapped in a transaction: existence-checked
    /// `CREATE`/`ALTER`, `SELECT DISTINCT` loads, commented `DROP COLUMN`
    /// suggestions, rollback by default.
    #[default]
    Transactional,
    /// One-shot rebuild: back up the original, drop and recreate it with
    /// only retained columns, reload everything from the backup, then drop
    /// the backup. No transaction wrapper.
    Rebuild,
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Transactional => write!(f, "transactional"),
            RenderStrategy::Rebuild => write!(f, "rebuild"),
        }
    }
}

impl FromStr for RenderStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transactional" | "incremental" => Ok(RenderStrategy::Transactional),
            "rebuild" => Ok(RenderStrategy::Rebuild),
            _ => Err(format!("invalid render strategy: {s}")),
        }
    }
}

/// Serialize `plan` into migration SQL for `schema.table`.
pub fn render(
    schema: &str,
    table: &str,
    plan: &NormalizationPlan,
    strategy: RenderStrategy,
) -> String {
    match strategy {
        RenderStrategy::Transactional => transactional::render(schema, table, plan),
        RenderStrategy::Rebuild => rebuild::render(schema, table, plan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_known_names() {
        assert_eq!(
            "transactional".parse::<RenderStrategy>(),
            Ok(RenderStrategy::Transactional)
        );
        assert_eq!(
            "Incremental".parse::<RenderStrategy>(),
            Ok(RenderStrategy::Transactional)
        );
        assert_eq!(
            "REBUILD".parse::<RenderStrategy>(),
            Ok(RenderStrategy::Rebuild)
        );
        assert!("merge".parse::<RenderStrategy>().is_err());
    }
}
