//! Catalog adapter seam between the analyzer and the physical database.
//!
//! The core never talks to a database directly: it consumes the
//! [`adapter::CatalogAdapter`] trait, which supplies column lists, key
//! metadata, and sampled rows. [`memory::MemoryCatalog`] implements the same
//! interface over in-process data for tests and the CLI.

/// The adapter trait, sampled-row container, and per-table snapshot.
pub mod adapter;
/// In-memory catalog implementation.
pub mod memory;
/// Sampled cell values.
pub mod value;
