//! Violation detection scenarios against the in-memory catalog.

mod support;

use normalyzer::catalog::memory::{MemoryCatalog, MemoryTable};
use normalyzer::config::AnalysisConfig;
use normalyzer::detector::analyze;
use normalyzer::detector::report::FdKind;
use normalyzer::error::AnalyzeError;
use normalyzer::oracle::FdOracle;
use support::{
    config_without_inference, customers_catalog, customers_rows, int, null, orders_catalog,
    orders_rows, row, structure, txt,
};

#[test]
fn partial_dependency_on_part_of_a_composite_key() {
    let structure = structure(&orders_rows(), "Orders");
    let report = analyze(
        "dbo",
        "Orders",
        &structure,
        &orders_catalog(),
        &FdOracle::new(),
        &config_without_inference(),
    )
    .unwrap();

    assert_eq!(report.partial_dependencies.len(), 1);
    let pd = &report.partial_dependencies[0];
    assert_eq!(pd.subset, ["ProductId"]);
    assert_eq!(pd.attribute, "Discount");
    assert!(pd.explain.starts_with("ProductId -> Discount"));
    assert!(report.transitive_dependencies.is_empty());
}

#[test]
fn single_column_primary_key_skips_second_normal_form() {
    // Same dependent data shape, but the key is not composite.
    let rows = vec![
        row("T", "Id", "INT", "PK", ""),
        row("T", "ProductId", "INT", "", ""),
        row("T", "Discount", "NVARCHAR(10)", "", ""),
    ];
    let structure = structure(&rows, "T");

    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "T",
        MemoryTable::new(&["Id", "ProductId", "Discount"])
            .with_primary_key(&["Id"])
            .with_rows(vec![
                vec![int(1), int(10), txt("a")],
                vec![int(2), int(10), txt("a")],
            ]),
    );

    let report = analyze(
        "dbo",
        "T",
        &structure,
        &cat,
        &FdOracle::new(),
        &config_without_inference(),
    )
    .unwrap();
    assert!(report.partial_dependencies.is_empty());
}

#[test]
fn inferred_transitive_chain_names_the_primary_key() {
    let structure = structure(&customers_rows(), "Customers");
    let report = analyze(
        "dbo",
        "Customers",
        &structure,
        &customers_catalog(),
        &FdOracle::new(),
        &AnalysisConfig::default(),
    )
    .unwrap();

    // Names are all distinct, so the candidate-key guard keeps `Name` out
    // of the determinant set; cities repeat across zip codes, so `City`
    // determines nothing.
    assert_eq!(report.transitive_dependencies.len(), 1);
    let td = &report.transitive_dependencies[0];
    assert_eq!(td.determinant, ["ZipCode"]);
    assert_eq!(td.dependent, "City");
    assert_eq!(td.chain, "CustomerId -> ZipCode -> City");
    assert_eq!(td.kind, FdKind::Inferred);
}

#[test]
fn inferred_check_always_ignores_null_dependents() {
    let rows = vec![
        row("T", "Id", "INT", "PK", ""),
        row("T", "ZipCode", "INT", "", ""),
        row("T", "City", "NVARCHAR(100)", "", ""),
    ];
    let structure = structure(&rows, "T");

    // ZipCode -> City holds only because the null City row drops out.
    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "T",
        MemoryTable::new(&["Id", "ZipCode", "City"])
            .with_primary_key(&["Id"])
            .with_rows(vec![
                vec![int(1), int(10001), txt("New York")],
                vec![int(2), int(10001), null()],
                vec![int(3), int(10001), txt("New York")],
                vec![int(4), int(94105), txt("San Francisco")],
                vec![int(5), int(94106), txt("San Francisco")],
            ]),
    );

    // `fd_check_nulls` only widens the 2NF scan; the inferred 3NF path
    // keeps ignoring null dependents.
    let config = AnalysisConfig {
        fd_check_nulls: true,
        ..AnalysisConfig::default()
    };
    let report = analyze("dbo", "T", &structure, &cat, &FdOracle::new(), &config).unwrap();

    assert_eq!(report.transitive_dependencies.len(), 1);
    let td = &report.transitive_dependencies[0];
    assert_eq!(td.determinant, ["ZipCode"]);
    assert_eq!(td.dependent, "City");
    assert_eq!(td.kind, FdKind::Inferred);
}

#[test]
fn declared_fd_with_superkey_determinant_is_exempt() {
    let rows = vec![
        row("T", "A", "INT", "PK", "A->B"),
        row("T", "B", "INT", "UNIQUE", "B->C"),
        row("T", "C", "INT", "", "C->B"),
    ];
    let structure = structure(&rows, "T");

    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "T",
        MemoryTable::new(&["A", "B", "C"])
            .with_primary_key(&["A"])
            .with_unique_set(&["B"])
            .with_rows(vec![
                vec![int(1), int(10), int(100)],
                vec![int(2), int(20), int(100)],
            ]),
    );

    let report = analyze(
        "dbo",
        "T",
        &structure,
        &cat,
        &FdOracle::new(),
        &config_without_inference(),
    )
    .unwrap();

    // A -> B: the determinant is the PK. B -> C: the determinant is a
    // unique set. C -> B: the dependent is prime. Nothing qualifies.
    assert!(report.transitive_dependencies.is_empty());
    assert!(report.is_clean());
}

#[test]
fn atomic_scan_records_the_first_offender_per_column() {
    let rows = vec![
        row("T", "Id", "INT", "PK", ""),
        row("T", "Tags", "NVARCHAR(255)", "", ""),
    ];
    let structure = structure(&rows, "T");

    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "T",
        MemoryTable::new(&["Id", "Tags"])
            .with_primary_key(&["Id"])
            .with_rows(vec![
                vec![int(1), txt("clean")],
                vec![int(2), txt("red,blue")],
                vec![int(3), txt("a;b;c")],
            ]),
    );

    let report = analyze(
        "dbo",
        "T",
        &structure,
        &cat,
        &FdOracle::new(),
        &config_without_inference(),
    )
    .unwrap();

    assert_eq!(report.atomic_issues.len(), 1);
    assert_eq!(report.atomic_issues[0].column, "Tags");
    assert_eq!(report.atomic_issues[0].sample_value, "red,blue");
}

#[test]
fn repeated_naming_families_come_from_the_declaration() {
    let rows = vec![
        row("Clients", "Id", "INT", "PK", ""),
        row("Clients", "Phone1", "VARCHAR(20)", "", ""),
        row("Clients", "Phone2", "VARCHAR(20)", "", ""),
        row("Clients", "Address", "NVARCHAR(255)", "", ""),
    ];
    let structure = structure(&rows, "Clients");

    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "Clients",
        MemoryTable::new(&["Id", "Phone1", "Phone2", "Address"]).with_primary_key(&["Id"]),
    );

    let report = analyze(
        "dbo",
        "Clients",
        &structure,
        &cat,
        &FdOracle::new(),
        &config_without_inference(),
    )
    .unwrap();

    assert_eq!(report.repeated_groups.len(), 1);
    assert_eq!(report.repeated_groups[0].base, "phone");
    assert_eq!(report.repeated_groups[0].columns, ["Phone1", "Phone2"]);
}

#[test]
fn declared_attributes_missing_from_the_catalog_are_ignored() {
    let rows = vec![
        row("T", "Id", "INT", "PK", ""),
        row("T", "Ghost", "INT", "", "Ghost->Id"),
    ];
    let structure = structure(&rows, "T");

    let mut cat = MemoryCatalog::new();
    cat.insert(
        "dbo",
        "T",
        MemoryTable::new(&["Id"])
            .with_primary_key(&["Id"])
            .with_row(vec![int(1)]),
    );

    // The atomic scan and inference only touch the intersection, so the
    // undeclared physical column never reaches the oracle.
    let report = analyze(
        "dbo",
        "T",
        &structure,
        &cat,
        &FdOracle::new(),
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert_eq!(report.declared_attributes, ["Id", "Ghost"]);
    assert_eq!(report.physical_columns, ["Id"]);
    assert!(report.atomic_issues.is_empty());
}

#[test]
fn analysis_is_deterministic_for_unchanged_data() {
    let structure = structure(&customers_rows(), "Customers");
    let cat = customers_catalog();
    let oracle = FdOracle::new();
    let config = AnalysisConfig::default();

    let first = analyze("dbo", "Customers", &structure, &cat, &oracle, &config).unwrap();
    let second = analyze("dbo", "Customers", &structure, &cat, &oracle, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_table_aborts_the_run() {
    let structure = structure(&orders_rows(), "Orders");
    let cat = MemoryCatalog::new();
    let err = analyze(
        "dbo",
        "Orders",
        &structure,
        &cat,
        &FdOracle::new(),
        &AnalysisConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, AnalyzeError::TableNotFound { .. }));
}
