//! FD oracle behavior over multi-column determinants and null handling.

mod support;

use normalyzer::catalog::adapter::SampleRows;
use normalyzer::oracle::FdOracle;
use support::{int, null, txt};

fn sample(columns: &[&str], rows: Vec<Vec<normalyzer::catalog::value::Value>>) -> SampleRows {
    SampleRows::new(columns.iter().map(ToString::to_string).collect(), rows)
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[test]
fn composite_determinant_partitions_by_tuple() {
    // (a, b) -> c holds even though neither column alone determines c.
    let rows = sample(
        &["a", "b", "c"],
        vec![
            vec![int(1), int(1), txt("x")],
            vec![int(1), int(2), txt("y")],
            vec![int(2), int(1), txt("z")],
            vec![int(1), int(1), txt("x")],
        ],
    );
    let oracle = FdOracle::new();
    assert!(oracle.holds(&cols(&["a", "b"]), "c", &rows, true).unwrap());
    assert!(!oracle.holds(&cols(&["a"]), "c", &rows, true).unwrap());
    assert!(!oracle.holds(&cols(&["b"]), "c", &rows, true).unwrap());
}

#[test]
fn partial_null_in_composite_determinant_drops_the_row() {
    // The null-b row would contradict (a, b) -> c if it were kept.
    let rows = sample(
        &["a", "b", "c"],
        vec![
            vec![int(1), int(1), txt("x")],
            vec![int(1), null(), txt("y")],
        ],
    );
    let oracle = FdOracle::new();
    assert!(oracle.holds(&cols(&["a", "b"]), "c", &rows, true).unwrap());
}

#[test]
fn support_threshold_is_satisfied_by_a_single_large_partition() {
    let rows = sample(
        &["a", "b"],
        vec![
            vec![int(1), txt("x")],
            vec![int(1), txt("x")],
            vec![int(1), txt("x")],
            vec![int(2), txt("y")],
        ],
    );
    assert!(FdOracle::with_min_support(3)
        .holds(&cols(&["a"]), "b", &rows, true)
        .unwrap());
    assert!(!FdOracle::with_min_support(4)
        .holds(&cols(&["a"]), "b", &rows, true)
        .unwrap());
}

#[test]
fn uniqueness_groups_nulls_together() {
    let rows = sample(&["a"], vec![vec![null()], vec![null()]]);
    let oracle = FdOracle::new();
    assert!(!oracle.is_unique(&cols(&["a"]), &rows).unwrap());

    let one_null = sample(&["a"], vec![vec![null()], vec![int(1)]]);
    assert!(oracle.is_unique(&cols(&["a"]), &one_null).unwrap());
}

#[test]
fn empty_sample_vacuously_holds() {
    let rows = sample(&["a", "b"], Vec::new());
    let oracle = FdOracle::new();
    assert!(oracle.holds(&cols(&["a"]), "b", &rows, true).unwrap());
    assert!(oracle.is_unique(&cols(&["a"]), &rows).unwrap());
}
