//! Whole-pipeline runs: validate, build, analyze, plan, render.

mod support;

use normalyzer::catalog::memory::{MemoryCatalog, MemoryTable};
use normalyzer::config::AnalysisConfig;
use normalyzer::detector::analyze;
use normalyzer::detector::report::FdKind;
use normalyzer::oracle::FdOracle;
use normalyzer::planner::build_plan;
use normalyzer::render::{render, RenderStrategy};
use normalyzer::structure::builder::build_structures;
use normalyzer::structure::validate::validate_rows;
use support::{int, orders_catalog, orders_rows, row, txt};

#[test]
fn order_lines_end_up_with_a_product_determinant_table() {
    let rows = orders_rows();
    assert!(validate_rows(&rows, false).is_ok());

    let structures = build_structures(&rows).unwrap();
    let structure = &structures["Orders"];

    let config = AnalysisConfig {
        infer_single_col_fds: false,
        ..AnalysisConfig::default()
    };
    let report = analyze(
        "dbo",
        "Orders",
        structure,
        &orders_catalog(),
        &FdOracle::new(),
        &config,
    )
    .unwrap();
    assert!(!report.is_clean());

    let plan = build_plan("Orders", structure, &report);
    assert_eq!(plan.new_tables[0].name, "Orders_ProductId_det");

    let sql = render("dbo", "Orders", &plan, RenderStrategy::Transactional);
    assert!(sql.contains("INSERT INTO [dbo].[Orders_ProductId_det] ([ProductId], [Discount])"));

    // The report serializes for the JSON artifact and comes back intact.
    let json = serde_json::to_string(&report).unwrap();
    let back: normalyzer::detector::report::ViolationReport =
        serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn declared_dependency_is_trusted_over_contradicting_data() {
    let rows = vec![
        row("Shipments", "Id", "INT", "PK", ""),
        row("Shipments", "ZipCode", "VARCHAR(10)", "", "ZipCode->City"),
        row("Shipments", "City", "NVARCHAR(100)", "", ""),
    ];
    assert!(validate_rows(&rows, false).is_ok());
    let structures = build_structures(&rows).unwrap();
    let structure = &structures["Shipments"];

    // The sampled rows contradict the declaration; declared FDs are not
    // re-checked against data.
    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "Shipments",
        MemoryTable::new(&["Id", "ZipCode", "City"])
            .with_primary_key(&["Id"])
            .with_rows(vec![
                vec![int(1), txt("10001"), txt("New York")],
                vec![int(2), txt("10001"), txt("Albany")],
            ]),
    );

    let config = AnalysisConfig {
        infer_single_col_fds: false,
        ..AnalysisConfig::default()
    };
    let report = analyze(
        "dbo",
        "Shipments",
        structure,
        &cat,
        &FdOracle::new(),
        &config,
    )
    .unwrap();

    assert_eq!(report.transitive_dependencies.len(), 1);
    assert_eq!(report.transitive_dependencies[0].kind, FdKind::Declared);

    let plan = build_plan("Shipments", structure, &report);
    let sql = render("dbo", "Shipments", &plan, RenderStrategy::Transactional);
    assert!(sql.contains("CREATE TABLE [dbo].[Shipments_ZipCode_dim]"));
    assert!(sql.contains("FOREIGN KEY ([ZipCode])"));
}

#[test]
fn clean_table_still_renders_a_reviewable_script() {
    let rows = vec![
        row("Tags", "Id", "INT", "PK", ""),
        row("Tags", "Label", "NVARCHAR(50)", "", ""),
    ];
    let structures = build_structures(&rows).unwrap();
    let structure = &structures["Tags"];

    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "Tags",
        MemoryTable::new(&["Id", "Label"])
            .with_primary_key(&["Id"])
            .with_rows(vec![
                vec![int(1), txt("alpha")],
                vec![int(2), txt("beta")],
            ]),
    );

    let report = analyze(
        "dbo",
        "Tags",
        structure,
        &cat,
        &FdOracle::new(),
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert!(report.is_clean());

    let plan = build_plan("Tags", structure, &report);
    assert!(plan.is_empty());

    let sql = render("dbo", "Tags", &plan, RenderStrategy::Transactional);
    assert!(sql.contains("BEGIN TRAN;"));
    assert!(sql.contains("-- Note: no violations"));
    assert!(sql.trim_end().ends_with("ROLLBACK;"));
}
