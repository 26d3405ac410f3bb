//! Integration tests over unpacked workbook folders built on disk.
//!
//! Each test lays out `book.xlsx` plus a `book_xml/` sibling in a temporary
//! directory and runs the public extraction API against it.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use xmlsheet::render::{to_json, JsonFormat};
use xmlsheet::{extract, try_extract, Error, ExtractOptions};

const NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// A temporary `book.xlsx` with an optional `book_xml/` folder.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("book.xlsx"), b"PK").unwrap();
        Self { dir }
    }

    /// Fixture with the two-row sample workbook.
    fn sample() -> Self {
        let fixture = Self::new();
        fixture.shared_strings(&["<si><t>Name</t></si>", "<si><t>Age</t></si>"]);
        fixture.sheet(
            1,
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2" t="inlineStr"><v>Alice</v></c><c r="B2"><v>30</v></c></row>"#,
        );
        fixture
    }

    fn source(&self) -> PathBuf {
        self.dir.path().join("book.xlsx")
    }

    fn xml_dir(&self) -> PathBuf {
        let dir = self.dir.path().join("book_xml");
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn shared_strings(&self, items: &[&str]) {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="{}" count="{}" uniqueCount="{}">{}</sst>"#,
            NS,
            items.len(),
            items.len(),
            items.concat()
        );
        self.write("sharedStrings.xml", &xml);
    }

    fn sheet(&self, index: u32, rows: &str) {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{}"><dimension ref="A1:B2"/><sheetData>{}</sheetData></worksheet>"#,
            NS, rows
        );
        self.write(&format!("sheet{}.xml", index), &xml);
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.xml_dir().join(name), content).unwrap();
    }
}

#[test]
fn test_sample_workbook() {
    let fixture = Fixture::sample();

    let result = extract(fixture.source(), 1, 300);
    let data = result.data().expect("sample workbook should extract");

    assert_eq!(data.total_rows(), 2);
    assert_eq!(data.sheet_index, 1);
    assert_eq!(data.file, fixture.source().to_string_lossy());

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value["data"],
        serde_json::json!({
            "1": { "A1": "Name", "B1": "Age" },
            "2": { "A2": "Alice", "B2": "30" }
        })
    );
    assert_eq!(value["success"], serde_json::json!(true));
    assert_eq!(value["total_rows"], serde_json::json!(2));
}

#[test]
fn test_row_cap_of_one() {
    let fixture = Fixture::sample();

    let result = extract(fixture.source(), 1, 1);
    let data = result.data().unwrap();

    assert_eq!(data.total_rows(), 1);
    assert!(data.row(1).is_some());
    assert!(data.row(2).is_none());
}

#[test]
fn test_missing_sheet_names_file() {
    let fixture = Fixture::sample();

    let result = extract(fixture.source(), 5, 300);
    let message = result.error().expect("sheet5 should be missing");

    assert!(message.starts_with("sheet5.xml not found: "));
    assert!(message.contains("book_xml"));
}

#[test]
fn test_missing_source_file() {
    let fixture = Fixture::new();
    let missing = fixture.dir.path().join("other.xlsx");

    let err = try_extract(&missing, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(ref p) if *p == missing));
}

#[test]
fn test_missing_xml_folder_names_directory() {
    let fixture = Fixture::new();

    let result = extract(fixture.source(), 1, 300);
    let message = result.error().unwrap();

    let expected_dir = fixture.dir.path().join("book_xml");
    assert!(message.contains(&expected_dir.display().to_string()));
    assert!(message.starts_with("XML folder not found"));
}

#[test]
fn test_missing_shared_strings() {
    let fixture = Fixture::new();
    fixture.sheet(1, "");

    let err = try_extract(fixture.source(), &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::SharedStringsNotFound(_)));
}

#[test]
fn test_malformed_shared_strings() {
    let fixture = Fixture::new();
    fixture.write("sharedStrings.xml", "<sst><si><t>broken</si></sst>");
    fixture.sheet(1, "");

    let result = extract(fixture.source(), 1, 300);
    let message = result.error().unwrap();
    assert!(message.starts_with("failed to parse sharedStrings.xml: "));
}

#[test]
fn test_malformed_sheet() {
    let fixture = Fixture::sample();
    fixture.write(
        "sheet2.xml",
        &format!(r#"<worksheet xmlns="{}"><sheetData><row r="1"></sheetData>"#, NS),
    );

    let result = extract(fixture.source(), 2, 300);
    let message = result.error().unwrap();
    assert!(message.starts_with("failed to parse sheet2.xml: "));
    assert!(message.len() > "failed to parse sheet2.xml: ".len());
}

#[test]
fn test_error_checks_run_in_order() {
    // Both sharedStrings.xml and the sheet are broken; the shared strings error wins
    let fixture = Fixture::new();
    fixture.write("sharedStrings.xml", "<sst>");
    fixture.write("sheet1.xml", "<worksheet>");

    let err = try_extract(fixture.source(), &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::SharedStringsParse(_)));
}

#[test]
fn test_skipped_shared_string_item_shifts_indices() {
    let fixture = Fixture::new();
    fixture.shared_strings(&[
        "<si><t>zero</t></si>",
        "<si><r><t>rich</t></r></si>",
        "<si><t>two</t></si>",
    ]);
    fixture.sheet(
        1,
        r#"<row r="1"><c r="A1" t="s"><v>1</v></c><c r="B1" t="s"><v>2</v></c></row>"#,
    );

    let result = extract(fixture.source(), 1, 300);
    let row = result.data().unwrap().row(1).unwrap();

    // Index 1 resolves to the third item; index 2 is past the two-entry table
    assert_eq!(row.get("A1"), Some("two"));
    assert_eq!(row.get("B1"), Some("2"));
}

#[test]
fn test_rows_without_values_are_omitted() {
    let fixture = Fixture::new();
    fixture.shared_strings(&[]);
    fixture.sheet(
        1,
        r#"<row r="1"><c r="A1" s="1"/></row>
<row r="2"><c r="A2"><v>kept</v></c></row>
<row r="3" spans="1:2"></row>"#,
    );

    let result = extract(fixture.source(), 1, 300);
    let data = result.data().unwrap();

    assert_eq!(data.total_rows(), 1);
    assert_eq!(data.rows[0].number, 2);
}

#[test]
fn test_output_is_idempotent() {
    let fixture = Fixture::sample();

    let first = to_json(&extract(fixture.source(), 1, 300), JsonFormat::Pretty).unwrap();
    let second = to_json(&extract(fixture.source(), 1, 300), JsonFormat::Pretty).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_non_ascii_output_unescaped() {
    let fixture = Fixture::new();
    fixture.shared_strings(&["<si><t>名前</t></si>"]);
    fixture.sheet(1, r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#);

    let json = to_json(&extract(fixture.source(), 1, 300), JsonFormat::Pretty).unwrap();
    assert!(json.contains("\"A1\": \"名前\""));
    assert!(!json.contains("\\u"));
}

#[test]
fn test_utf16_sheet() {
    let fixture = Fixture::sample();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-16"?><worksheet xmlns="{}"><sheetData><row r="1"><c r="A1"><v>wide</v></c></row></sheetData></worksheet>"#,
        NS
    );
    let mut bytes = vec![0xFF, 0xFE];
    for unit in xml.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(fixture.xml_dir().join("sheet3.xml"), bytes).unwrap();

    let result = extract(fixture.source(), 3, 300);
    let row = result.data().unwrap().row(1).unwrap();
    assert_eq!(row.get("A1"), Some("wide"));
}
