//! Variable file export tests

use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use xlsx2js::core::collect_sheet;
use xlsx2js::excel::Sheet;
use xlsx2js::types::{CellValue, ColumnRecords, CoordinateDict, SheetGrades};
use xlsx2js::writer::{parse_js_var, JsExporter, COMBINED_FILE, INCLUDES_FILE};

fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn sample_dict() -> CoordinateDict {
    let mut dict = CoordinateDict::new();
    dict.insert("E5".to_string(), vec!["Alice".into(), "10".into(), "20".into(), "30".into()]);
    dict.insert("E2".to_string(), vec!["Zoë".into(), "".into(), "7".into(), "".into()]);
    dict.insert("E1".to_string(), vec!["Student".into(), "T1".into(), "T2".into(), "T3".into()]);
    dict
}

fn sheet_grades() -> SheetGrades {
    let text = |s: &str| CellValue::from(s);
    let mut grades = SheetGrades::new();
    for name in ["G1 CA", "G_U_Wk_L", "TEMPLATE_SHEET", "G2"] {
        let sheet = Sheet::new(
            name,
            vec![vec![text("ID"), text("Score")], vec![text("a"), CellValue::Number(1.0)]],
        );
        grades.insert(name.to_string(), collect_sheet(&sheet));
    }
    grades
}

// ═══════════════════════════════════════════════════════════════════════════
// SINGLE VARIABLE EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_writes_variable_and_includes() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("output777");

    let summary = JsExporter::new(&output_dir)
        .export(&sample_dict(), "G1_CA")
        .unwrap();

    assert_eq!(summary.files, vec![output_dir.join("G1_CA.js")]);
    assert_eq!(summary.manifest, output_dir.join(INCLUDES_FILE));

    let content = fs::read_to_string(output_dir.join("G1_CA.js")).unwrap();
    assert!(content.starts_with("var G1_CA = {\n    \"E5\": [\n"));
    assert!(content.ends_with("};"));
    assert!(content.contains("\"Zoë\""), "non-ASCII must not be escaped");

    let includes = fs::read_to_string(output_dir.join(INCLUDES_FILE)).unwrap();
    assert_eq!(includes, "#include \"G1_CA.js\";\nvar G1_CA_DATA = G1_CA;");
}

#[test]
fn test_export_round_trip_preserves_order_and_values() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("out");
    let dict = sample_dict();

    JsExporter::new(&output_dir).export(&dict, "data").unwrap();

    let content = fs::read_to_string(output_dir.join("data.js")).unwrap();
    let (var_name, json) = parse_js_var(&content).unwrap();
    let parsed: CoordinateDict = serde_json::from_str(json).unwrap();

    assert_eq!(var_name, "data");
    assert_eq!(parsed, dict);
    assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["E5", "E2", "E1"]);
}

#[test]
fn test_export_twice_leaves_only_second_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("out");
    let exporter = JsExporter::new(&output_dir);

    exporter.export(&sample_dict(), "first").unwrap();
    fs::write(output_dir.join("stray.txt"), "left behind").unwrap();

    let mut second = CoordinateDict::new();
    second.insert("A1".to_string(), vec!["only".to_string()]);
    exporter.export(&second, "second").unwrap();

    let expected: BTreeSet<String> = ["includes.js", "second.js"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(file_names(&output_dir), expected);

    let includes = fs::read_to_string(output_dir.join(INCLUDES_FILE)).unwrap();
    assert!(!includes.contains("first"));
}

#[test]
fn test_export_empty_mapping() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("out");

    JsExporter::new(&output_dir)
        .export(&CoordinateDict::new(), "empty")
        .unwrap();

    assert_eq!(
        fs::read_to_string(output_dir.join("empty.js")).unwrap(),
        "var empty = {};"
    );
}

#[test]
fn test_export_into_file_path_fails() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = JsExporter::new(&blocker).export(&sample_dict(), "data");
    assert!(matches!(result, Err(xlsx2js::ExportError::Io(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// PER-SHEET EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_sheets_writes_every_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("grades");

    let summary = JsExporter::new(&output_dir)
        .export_sheets(&sheet_grades(), &["G_U_Wk_L", "TEMPLATE_SHEET"])
        .unwrap();

    assert_eq!(summary.files.len(), 4);
    let expected: BTreeSet<String> = [
        "G1_CA.js",
        "G_U_Wk_L.js",
        "TEMPLATE_SHEET.js",
        "G2.js",
        COMBINED_FILE,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(file_names(&output_dir), expected);
}

#[test]
fn test_export_sheets_combined_excludes_named_sheets() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("grades");

    JsExporter::new(&output_dir)
        .export_sheets(&sheet_grades(), &["G_U_Wk_L", "TEMPLATE_SHEET"])
        .unwrap();

    let combined = fs::read_to_string(output_dir.join(COMBINED_FILE)).unwrap();
    assert_eq!(combined, "#include \"G1_CA.js\"\n#include \"G2.js\"");
}

#[test]
fn test_export_sheets_compact_json_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("grades");
    let grades = sheet_grades();

    JsExporter::new(&output_dir)
        .export_sheets(&grades, &[] as &[&str])
        .unwrap();

    let content = fs::read_to_string(output_dir.join("G1_CA.js")).unwrap();
    assert_eq!(
        content,
        r#"var G1_CA = {"id":[{"value":"a","row":2,"column":1}],"score":[{"value":"1","row":2,"column":2}]};"#
    );

    let (_, json) = parse_js_var(&content).unwrap();
    let parsed: ColumnRecords = serde_json::from_str(json).unwrap();
    assert_eq!(&parsed, grades.get("G1 CA").unwrap());
}

#[test]
fn test_export_sheets_keeps_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("grades");
    fs::create_dir_all(&output_dir).unwrap();
    fs::write(output_dir.join("keep.txt"), "x").unwrap();

    JsExporter::new(&output_dir)
        .export_sheets(&sheet_grades(), &[] as &[&str])
        .unwrap();

    assert!(output_dir.join("keep.txt").exists());
}
