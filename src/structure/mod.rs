//! Declared structure model.
//!
//! The declared schema arrives as ordered CSV-like rows (table, attribute,
//! type, key tokens, optional FD cell). [`builder`] merges them into
//! per-table [`model::TableStructure`] values; [`validate`] is the upstream
//! gate that rejects malformed rows before the rest of the pipeline sees
//! them.

/// Merge ordered rows into per-table structures.
pub mod builder;
/// Functional-dependency clause parsing.
pub mod fd;
/// Typed structure rows and per-table structures.
pub mod model;
/// Row-level validation (types, key tokens, FD clauses).
pub mod validate;
