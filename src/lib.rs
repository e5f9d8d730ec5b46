//! Analyze relational tables against a declared logical schema and plan
//! 1NF/2NF/3NF decompositions, including the migration SQL to realize them.
#![warn(missing_docs)]

/// Catalog adapter seam: sampled values, the adapter trait, and the
/// in-memory implementation used by tests and the CLI.
pub mod catalog;
/// Analysis tunables (sample size, FD inference, null handling).
pub mod config;
/// 1NF/2NF/3NF violation detection for one table.
pub mod detector;
/// Error taxonomy for catalog access and structure ingestion.
pub mod error;
/// Statistical functional-dependency oracle backing the 2NF/3NF checks.
pub mod oracle;
/// Decomposition planning from a violation report.
pub mod planner;
/// Migration-script rendering (transactional and rebuild strategies).
pub mod render;
/// Declared structure model: rows, per-table structures, validation.
pub mod structure;
