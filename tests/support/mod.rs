//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::collections::BTreeMap;

use normalyzer::catalog::memory::{MemoryCatalog, MemoryTable};
use normalyzer::catalog::value::Value;
use normalyzer::config::AnalysisConfig;
use normalyzer::structure::builder::build_structures;
use normalyzer::structure::model::{AttributeSpec, TableStructure};

pub fn row(table: &str, attr: &str, ty: &str, key: &str, fd: &str) -> AttributeSpec {
    AttributeSpec::new(table, attr, ty, key, fd)
}

pub fn int(i: i64) -> Value {
    Value::Int(i)
}

pub fn txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub fn null() -> Value {
    Value::Null
}

pub fn structures(rows: &[AttributeSpec]) -> BTreeMap<String, TableStructure> {
    build_structures(rows).expect("fixture rows must build")
}

pub fn structure(rows: &[AttributeSpec], table: &str) -> TableStructure {
    structures(rows)
        .remove(table)
        .expect("fixture table must exist")
}

/// Order lines with a composite key where `Discount` depends only on
/// `ProductId`.
pub fn orders_rows() -> Vec<AttributeSpec> {
    vec![
        row("Orders", "OrderId", "INT", "PK(part)", ""),
        row("Orders", "ProductId", "INT", "PK(part)", ""),
        row("Orders", "Quantity", "INT", "", ""),
        row("Orders", "Discount", "DECIMAL(4,2)", "", ""),
    ]
}

pub fn orders_catalog() -> MemoryCatalog {
    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "Orders",
        MemoryTable::new(&["OrderId", "ProductId", "Quantity", "Discount"])
            .with_primary_key(&["OrderId", "ProductId"])
            .with_rows(vec![
                vec![int(1), int(10), int(2), txt("0.10")],
                vec![int(1), int(11), int(5), txt("0.20")],
                vec![int(2), int(10), int(1), txt("0.10")],
                vec![int(2), int(11), int(3), txt("0.20")],
                vec![int(3), int(10), int(4), txt("0.10")],
            ]),
    );
    cat
}

/// Customers with an inferable `ZipCode -> City` chain. Names are unique
/// and cities repeat across zip codes, so only the zip code survives as a
/// transitive determinant.
pub fn customers_rows() -> Vec<AttributeSpec> {
    vec![
        row("Customers", "CustomerId", "INT", "PK", ""),
        row("Customers", "Name", "NVARCHAR(100)", "", ""),
        row("Customers", "ZipCode", "INT", "", ""),
        row("Customers", "City", "NVARCHAR(100)", "", ""),
    ]
}

pub fn customers_catalog() -> MemoryCatalog {
    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "Customers",
        MemoryTable::new(&["CustomerId", "Name", "ZipCode", "City"])
            .with_primary_key(&["CustomerId"])
            .with_rows(vec![
                vec![int(1), txt("Ann"), int(10001), txt("New York")],
                vec![int(2), txt("Bob"), int(10001), txt("New York")],
                vec![int(3), txt("Cat"), int(10002), txt("New York")],
                vec![int(4), txt("Dan"), int(94105), txt("San Francisco")],
                vec![int(5), txt("Eve"), int(94105), txt("San Francisco")],
            ]),
    );
    cat
}

/// Config with inference off and no sampling cap, for tests that pin down
/// a single check.
pub fn config_without_inference() -> AnalysisConfig {
    AnalysisConfig {
        sample_rows: None,
        infer_single_col_fds: false,
        ..AnalysisConfig::default()
    }
}
