//! Zero pass against the checked-in `Data.c` fixture.

use std::fs;
use std::path::PathBuf;

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use trice_scan::{zero_tree, ScanError, WriteResult};

fn fixture(dir: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("zero")
        .join(dir)
}

#[test]
fn zero_tree_matches_expected_fixture() {
    let tree = assert_fs::TempDir::new().expect("tempdir");
    tree.copy_from(fixture("ori"), &["*.c"]).expect("copy fixture");

    let report = zero_tree(tree.path(), false).expect("zero");

    let act = fs::read(tree.path().join("Data.c")).expect("read act");
    let exp = fs::read(fixture("exp").join("Data.c")).expect("read exp");
    assert_eq!(exp, act);
    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.ids_zeroed, 53);
    assert_eq!(
        report.writes,
        vec![WriteResult::Written { path: tree.path().join("Data.c") }]
    );
    tree.child("Data.c.trice.tmp").assert(predicate::path::missing());
}

#[test]
fn zero_tree_dry_run_writes_nothing() {
    let tree = assert_fs::TempDir::new().expect("tempdir");
    tree.copy_from(fixture("ori"), &["*.c"]).expect("copy fixture");
    let before = fs::read(tree.path().join("Data.c")).expect("read");

    let report = zero_tree(tree.path(), true).expect("zero");

    assert_eq!(report.ids_zeroed, 53);
    assert!(matches!(report.writes[0], WriteResult::WouldWrite { .. }));
    assert_eq!(before, fs::read(tree.path().join("Data.c")).expect("read"));
}

#[test]
fn zero_tree_is_idempotent() {
    let tree = assert_fs::TempDir::new().expect("tempdir");
    tree.copy_from(fixture("exp"), &["*.c"]).expect("copy fixture");

    let report = zero_tree(tree.path(), false).expect("zero");
    assert_eq!(report.ids_zeroed, 0);
    assert!(report.writes.is_empty());
}

#[test]
fn zero_tree_skips_non_source_files() {
    let tree = assert_fs::TempDir::new().expect("tempdir");
    let notes = tree.child("notes.md");
    notes.write_str("TRICE0 (Id(12), \"x\" );").expect("write");

    let report = zero_tree(tree.path(), false).expect("zero");
    assert_eq!(report.files_scanned, 0);
    notes.assert("TRICE0 (Id(12), \"x\" );");
}

#[test]
fn zero_tree_missing_root_errors() {
    let tree = assert_fs::TempDir::new().expect("tempdir");
    let err = zero_tree(&tree.path().join("missing"), false).unwrap_err();
    assert!(matches!(err, ScanError::SourceNotFound { .. }), "got: {err}");
}
