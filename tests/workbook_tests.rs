use std::fs;
use std::path::PathBuf;
use std::process::Command;

use gridtab::settings::Settings;
use gridtab::source::SourceError;
use gridtab::{GridError, Workbook, render_sheet};
use serial_test::serial;
use tempfile::TempDir;

const INVENTORY_JSON: &str = r#"{
    "sheets": [
        {
            "name": "Inventory",
            "rows": [
                ["Stock", null, null],
                ["Fruit", "Qty", "Price"],
                ["apple", 3, 0.5],
                [null, 4, 1.0]
            ],
            "merged": ["A1:C1", "A3:A4"]
        },
        {
            "name": "Notes",
            "rows": [["ok"]]
        }
    ]
}"#;

const INVENTORY_TABLE: &str = "\
+-------+-----+-------+
| Stock               |
+-------+-----+-------+
| Fruit | Qty | Price |
+-------+-----+-------+
| apple | 3   | 0.5   |
+        -----+-------+
|       | 4   | 1.0   |
+-------+-----+-------+
";

/// Helper to locate a checked-in workbook
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Helper to write a workbook file into a fresh temporary directory
fn write_workbook(name: &str, content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    (tmp, path)
}

/// Helper to point the settings loader at a temporary home
fn setup_test_home() -> TempDir {
    let tmp = TempDir::new().unwrap();
    unsafe {
        std::env::set_var("GRIDTAB_TEST_HOME", tmp.path());
    }
    tmp
}

/// Test: merged ranges in a JSON workbook become colspans and rowspans
#[test]
fn test_render_json_sheet_with_merges() {
    let (_tmp, path) = write_workbook("book.json", INVENTORY_JSON);
    let out = render_sheet(&path, Some("Inventory"), &Settings::default()).unwrap();
    assert_eq!(out, INVENTORY_TABLE);
}

/// Test: the same sheet described in TOML renders identically
#[test]
fn test_render_toml_sheet() {
    let toml = r#"
        [[sheets]]
        name = "Inventory"
        rows = [
            ["Stock"],
            ["Fruit", "Qty", "Price"],
            ["apple", 3, 0.5],
            ["", 4, 1.0],
        ]
        merged = ["A1:C1", "A3:A4"]
    "#;
    let (_tmp, path) = write_workbook("book.toml", toml);
    let out = render_sheet(&path, None, &Settings::default()).unwrap();
    assert_eq!(out, INVENTORY_TABLE);
}

/// Test: without an explicit sheet the configured default is used
#[test]
#[serial]
fn test_default_sheet_from_settings() {
    let home = setup_test_home();
    let settings_dir = home.path().join(".gridtab");
    fs::create_dir_all(&settings_dir).unwrap();
    fs::write(settings_dir.join("settings.toml"), "default_sheet = \"Notes\"\n").unwrap();

    let settings = Settings::load().unwrap();
    let (_tmp, path) = write_workbook("book.json", INVENTORY_JSON);
    let out = render_sheet(&path, None, &settings).unwrap();
    assert_eq!(out, "+----+\n| ok |\n+----+\n");
}

/// Test: empty cells use the configured placeholder
#[test]
fn test_empty_cell_text_setting() {
    let book = r#"{ "sheets": [ { "name": "S", "rows": [["a", null], ["b"]] } ] }"#;
    let (_tmp, path) = write_workbook("book.json", book);
    let settings = Settings {
        empty_cell_text: "-".into(),
        ..Settings::default()
    };
    let out = render_sheet(&path, None, &settings).unwrap();
    assert_eq!(out, "+---+---+\n| a | - |\n+---+---+\n| b | - |\n+---+---+\n");
}

/// Test: unknown sheet names are reported, not silently replaced
#[test]
fn test_unknown_sheet() {
    let (_tmp, path) = write_workbook("book.json", INVENTORY_JSON);
    let err = render_sheet(&path, Some("Missing"), &Settings::default()).unwrap_err();
    assert!(matches!(err, SourceError::SheetNotFound(ref n) if n == "Missing"));
    assert_eq!(err.to_string(), "no sheet named \"Missing\"");
}

/// Test: merges that collide surface as grid errors
#[test]
fn test_overlapping_merges_fail() {
    let book = r#"{ "sheets": [ { "name": "S",
        "rows": [["a", "b"], ["c", "d"]],
        "merged": ["B1:B2", "A2:B2"] } ] }"#;
    let (_tmp, path) = write_workbook("book.json", book);
    let err = render_sheet(&path, None, &Settings::default()).unwrap_err();
    assert!(matches!(
        err,
        SourceError::Grid(GridError::OverlappingSpans { row: 1, column: 1 })
    ));
}

/// Test: merged regions of a real xlsx workbook are drawn like described ones
#[test]
fn test_render_xlsx_sheet_with_merges() {
    let path = fixture("inventory.xlsx");
    let book = Workbook::from_path(&path).unwrap();
    assert_eq!(book.sheet_names().collect::<Vec<_>>(), ["Inventory", "Notes"]);

    let out = render_sheet(&path, Some("Inventory"), &Settings::default()).unwrap();
    assert_eq!(out, INVENTORY_TABLE.replace("1.0", "1.5"));
    let notes = render_sheet(&path, Some("Notes"), &Settings::default()).unwrap();
    assert_eq!(notes, "+----+\n| ok |\n+----+\n");
}

/// Test: a file that is not a zip archive is reported as a broken xlsx
#[test]
fn test_corrupt_xlsx() {
    let (_tmp, path) = write_workbook("book.xlsx", "PK");
    let err = Workbook::from_path(&path).unwrap_err();
    assert!(matches!(err, SourceError::Xlsx(_)), "{err}");
}

/// Test: only spreadsheet, .json and .toml files are understood
#[test]
fn test_unsupported_extension() {
    let (_tmp, path) = write_workbook("book.csv", "a,b\n");
    assert!(matches!(Workbook::from_path(&path), Err(SourceError::UnsupportedFormat(_))));
}

/// Test: an absurdly large merge is refused instead of allocating the rows
#[test]
fn test_merge_beyond_sheet_limits_fails() {
    let book = r#"{ "sheets": [ { "name": "S",
        "rows": [["a"]],
        "merged": ["A1:A99999999999"] } ] }"#;
    let (_tmp, path) = write_workbook("book.json", book);
    let err = render_sheet(&path, None, &Settings::default()).unwrap_err();
    assert!(matches!(err, SourceError::Json(_)));
    assert!(err.to_string().contains("invalid merge range"), "{err}");
}

/// Test: a missing file is an I/O error naming the path
#[test]
fn test_missing_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("absent.json");
    let err = Workbook::from_path(&path).unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

/// Test: the binary renders to stdout and lists sheets
#[test]
#[serial]
fn test_cli_renders_and_lists_sheets() {
    let home = TempDir::new().unwrap();
    let (_tmp, path) = write_workbook("book.json", INVENTORY_JSON);

    let render = Command::new(env!("CARGO_BIN_EXE_gridtab"))
        .env("GRIDTAB_TEST_HOME", home.path())
        .arg(&path)
        .output()
        .unwrap();
    assert!(render.status.success());
    assert_eq!(String::from_utf8(render.stdout).unwrap(), INVENTORY_TABLE);

    let list = Command::new(env!("CARGO_BIN_EXE_gridtab"))
        .env("GRIDTAB_TEST_HOME", home.path())
        .arg(&path)
        .arg("--list-sheets")
        .output()
        .unwrap();
    assert_eq!(String::from_utf8(list.stdout).unwrap(), "Inventory\nNotes\n");

    let missing = Command::new(env!("CARGO_BIN_EXE_gridtab"))
        .env("GRIDTAB_TEST_HOME", home.path())
        .arg(&path)
        .args(["--sheet", "Nope"])
        .output()
        .unwrap();
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("no sheet named"));
}

/// Test: --output writes the table to a file
#[test]
#[serial]
fn test_cli_output_file() {
    let home = TempDir::new().unwrap();
    let (tmp, path) = write_workbook("book.json", INVENTORY_JSON);
    let target = tmp.path().join("out.txt");

    let status = Command::new(env!("CARGO_BIN_EXE_gridtab"))
        .env("GRIDTAB_TEST_HOME", home.path())
        .arg(&path)
        .arg("--output")
        .arg(&target)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read_to_string(&target).unwrap(), INVENTORY_TABLE);
}
