//! Save → load roundtrip tests for the ID list.
//!
//! Each `#[case]` is isolated — own temp dir, no shared state.

use rstest::rstest;
use tempfile::TempDir;
use trice_core::{Item, Registry, TraceId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn item(id: u16, fmt_type: &str, fmt_strg: &str, created: i64, removed: i64) -> Item {
    Item {
        id: TraceId::new(id).expect("non-zero id"),
        fmt_type: fmt_type.to_string(),
        fmt_strg: fmt_strg.to_string(),
        created,
        removed,
    }
}

fn three_active() -> Vec<Item> {
    vec![
        item(123, "TRICE0", "some logstring", 1_600_000_000, 0),
        item(4444, "TRICE32_1", "some other %d logstring", 1_600_000_001, 0),
        item(55, "TRICE8_7", "some more %d %d %d %d %d %d %d logstring", 1_600_000_002, 0),
    ]
}

fn with_removed() -> Vec<Item> {
    vec![
        item(1, "TRICE16_2", "tst:TRICE16 %d %d\n", 10, 20),
        item(65535, "TRICE0", "wrn:A", 30, 0),
    ]
}

fn escapes_and_unicode() -> Vec<Item> {
    vec![
        item(7, "TRICE8_1", r#"quote \" backslash \\ tab \t %%03x"#, 0, 0),
        item(8, "TRICE0", "日本語・한국어・العربية 🚀", 0, 0),
    ]
}

fn duplicates_after_reassignment() -> Vec<Item> {
    vec![
        item(123, "TRICE0", "some logstring", 5, 0),
        item(9876, "TRICE0", "different logstring", 6, 0),
        item(123, "TRICE0", "hand-edited copy", 7, 8),
    ]
}

// ---------------------------------------------------------------------------
// Parameterised roundtrip test
// ---------------------------------------------------------------------------

#[rstest]
#[case("empty", vec![])]
#[case("three_active", three_active())]
#[case("with_removed", with_removed())]
#[case("escapes_and_unicode", escapes_and_unicode())]
#[case("duplicates", duplicates_after_reassignment())]
fn list_roundtrip(#[case] label: &str, #[case] items: Vec<Item>) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("til.json");

    let registry = Registry::from_items(items.clone());
    registry
        .save(&path)
        .unwrap_or_else(|e| panic!("[{label}] save failed: {e}"));
    let back = Registry::load(&path).unwrap_or_else(|e| panic!("[{label}] load failed: {e}"));

    assert_eq!(back.items(), items.as_slice(), "[{label}] items");
    assert_eq!(back, registry, "[{label}] registry");
}

#[test]
fn three_items_reload_field_for_field() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("til.json");
    Registry::from_items(three_active()).save(&path).expect("save");

    let back = Registry::load(&path).expect("load");
    assert_eq!(back.len(), 3);
    for (orig, got) in three_active().iter().zip(back.iter()) {
        assert_eq!(orig.id, got.id);
        assert_eq!(orig.fmt_type, got.fmt_type);
        assert_eq!(orig.fmt_strg, got.fmt_strg);
        assert_eq!(orig.created, got.created);
        assert_eq!(got.removed, 0);
    }
}

#[test]
fn saving_twice_is_byte_identical() {
    let dir = TempDir::new().expect("tempdir");
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    Registry::from_items(with_removed()).save(&a).expect("save a");
    Registry::load(&a).expect("load a").save(&b).expect("save b");
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}
