use super::*;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn create_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("book.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Scores").unwrap();
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(0, 1, "Score #").unwrap();
    sheet.write_string(1, 0, "Ann").unwrap();
    sheet.write_number(1, 1, 91.5).unwrap();
    workbook.save(&path).unwrap();
    path
}

// =========================================================================
// parse_span Tests
// =========================================================================

#[test]
fn test_parse_span_numbers() {
    assert_eq!(parse_span("2:10").unwrap(), 2..=10);
    assert_eq!(parse_span("4").unwrap(), 4..=4);
}

#[test]
fn test_parse_span_letters() {
    assert_eq!(parse_span("E:I").unwrap(), 5..=9);
    assert_eq!(parse_span("aa").unwrap(), 27..=27);
    assert_eq!(parse_span("C:12").unwrap(), 3..=12);
}

#[test]
fn test_parse_span_invalid() {
    assert!(parse_span("0:3").is_err());
    assert!(parse_span("A1:B2").is_err());
    assert!(parse_span(":").is_err());
}

// =========================================================================
// format_cell Tests
// =========================================================================

#[test]
fn test_format_cell_text_line_breaks() {
    assert_eq!(format_cell(&CellValue::from("a\nb")), "a⏎b");
}

// =========================================================================
// Command Tests
// =========================================================================

#[test]
fn test_sheets_command() {
    let temp_dir = TempDir::new().unwrap();
    assert!(sheets(create_workbook(temp_dir.path())).is_ok());
}

#[test]
fn test_show_command_unknown_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let result = show(
        create_workbook(temp_dir.path()),
        "Missing".to_string(),
        None,
        None,
    );
    assert!(matches!(result, Err(ExportError::SheetNotFound(_))));
}

#[test]
fn test_dict_command_writes_files() {
    let temp_dir = TempDir::new().unwrap();
    let workbook = create_workbook(temp_dir.path());
    let output_dir = temp_dir.path().join("out");

    dict(
        workbook,
        "Scores".to_string(),
        ColumnRef::new(1),
        vec![ColumnRef::new(2)],
        output_dir.clone(),
        "scores".to_string(),
        true,
    )
    .unwrap();

    let content = fs::read_to_string(output_dir.join("scores.js")).unwrap();
    assert!(content.contains("\"A2\": [\n        \"Ann\",\n        \"91.5\"\n    ]"));
    assert!(output_dir.join("includes.js").exists());
}

#[test]
fn test_dict_command_rejects_bad_var_name() {
    let temp_dir = TempDir::new().unwrap();
    let result = dict(
        create_workbook(temp_dir.path()),
        "Scores".to_string(),
        ColumnRef::new(1),
        Vec::new(),
        temp_dir.path().join("out"),
        "my-scores".to_string(),
        false,
    );
    assert!(matches!(result, Err(ExportError::InvalidName(_))));
}

#[test]
fn test_grades_command_sanitizes_headers() {
    let temp_dir = TempDir::new().unwrap();
    let workbook = create_workbook(temp_dir.path());
    let output_dir = temp_dir.path().join("grades");

    grades(workbook, output_dir.clone(), Vec::new(), true).unwrap();

    let content = fs::read_to_string(output_dir.join("Scores.js")).unwrap();
    assert!(content.starts_with("var Scores = {\"name\":["));
    assert!(content.contains("\"score_num\":[{\"value\":\"91.5\",\"row\":2,\"column\":2}]"));
    assert_eq!(
        fs::read_to_string(output_dir.join("combined.js")).unwrap(),
        "#include \"Scores.js\""
    );
}

#[test]
fn test_run_command_missing_plan() {
    assert!(matches!(
        run(PathBuf::from("/nonexistent/plan.yaml"), false),
        Err(ExportError::Io(_))
    ));
}

#[test]
fn test_inspect_command_rejects_scalar() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("n.js");
    fs::write(&file, "var n = 3;").unwrap();
    assert!(matches!(inspect(file), Err(ExportError::InvalidFormat(_))));
}
