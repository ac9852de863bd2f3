use tarifa::domain::{FileInfo, ProcessingOptions};
use tarifa::infrastructure::text_processing::{flatten_sheet, SpreadsheetProcessor};

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn csv_file(content: &str) -> FileInfo {
    FileInfo::new("materials.csv", "text/csv", content.as_bytes().to_vec())
}

#[test]
fn given_rows_with_headers_when_flattening_then_labels_every_cell() {
    let sheet = rows(&[
        &["item", "quantidade"],
        &["cimento", "10"],
        &["areia", "5"],
    ]);

    let result = flatten_sheet("Materiais", &sheet, true, 100);

    assert!(result.contains("=== SHEET: Materiais ==="));
    assert!(result.contains("COLUMNS: item | quantidade"));
    assert!(result.contains("ROW 1: item: cimento | quantidade: 10"));
    assert!(result.contains("ROW 2: item: areia | quantidade: 5"));
}

#[test]
fn given_max_rows_when_flattening_then_row_count_is_bounded() {
    let sheet = rows(&[
        &["item"],
        &["um"],
        &["dois"],
        &["tres"],
    ]);

    let result = flatten_sheet("Plan1", &sheet, true, 2);

    assert!(result.contains("ROW 1:"));
    assert!(result.contains("ROW 2:"));
    assert!(!result.contains("ROW 3:"));
}

#[test]
fn given_headers_disabled_when_flattening_then_renders_raw_rows() {
    let sheet = rows(&[&["a", "b"], &["c", "d"]]);

    let result = flatten_sheet("Plan1", &sheet, false, 100);

    assert!(!result.contains("COLUMNS:"));
    assert!(result.contains("ROW 1: a | b"));
    assert!(result.contains("ROW 2: c | d"));
}

#[test]
fn given_short_rows_when_flattening_with_headers_then_missing_cells_are_empty() {
    let sheet = rows(&[&["item", "preco"], &["cimento"]]);

    let result = flatten_sheet("Plan1", &sheet, true, 100);

    assert!(result.contains("ROW 1: item: cimento | preco: "));
}

#[test]
fn given_empty_sheet_when_flattening_then_marks_it_empty() {
    let result = flatten_sheet("Vazia", &[], true, 100);

    assert!(result.contains("=== SHEET: Vazia ==="));
    assert!(result.contains("(empty sheet)"));
}

#[tokio::test]
async fn given_csv_file_when_processing_then_succeeds_with_full_confidence() {
    let processor = SpreadsheetProcessor::new();
    let file = csv_file("item,quantidade\ncimento,10\nareia,5\n");

    let result = processor
        .process_spreadsheet(&file, &ProcessingOptions::default())
        .await;

    assert!(result.success);
    assert_eq!(result.metadata.confidence, Some(100.0));
    assert!(result.text.contains("COLUMNS: item | quantidade"));
    assert!(result.text.contains("ROW 1: item: cimento | quantidade: 10"));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn given_max_rows_option_when_processing_csv_then_bounds_output() {
    let processor = SpreadsheetProcessor::new();
    let file = csv_file("item\na\nb\nc\nd\n");
    let options = ProcessingOptions {
        max_rows: Some(2),
        ..Default::default()
    };

    let result = processor.process_spreadsheet(&file, &options).await;

    assert!(result.success);
    assert!(result.text.contains("ROW 2:"));
    assert!(!result.text.contains("ROW 3:"));
}

#[tokio::test]
async fn given_missing_sheet_selection_when_processing_then_skips_without_failing() {
    let processor = SpreadsheetProcessor::new();
    let file = csv_file("item\ncimento\n");
    let options = ProcessingOptions {
        sheet_names: Some(vec!["Inexistente".to_string()]),
        ..Default::default()
    };

    let result = processor.process_spreadsheet(&file, &options).await;

    assert!(result.success);
    assert!(result.text.is_empty());
}

#[test]
fn given_csv_mime_when_listing_sheets_then_returns_single_sheet() {
    let names = SpreadsheetProcessor::sheet_names(b"a,b\n1,2\n", "text/csv");

    assert_eq!(names, vec!["Sheet1".to_string()]);
}

#[test]
fn given_csv_when_inspecting_then_reports_dimensions() {
    let info = SpreadsheetProcessor::spreadsheet_info(b"a,b\n1,2\n3,4\n", "text/csv").unwrap();

    assert_eq!(info.sheet_count, 1);
    assert_eq!(info.sheet_names, vec!["Sheet1".to_string()]);
    let sheet = &info.sheets["Sheet1"];
    assert_eq!(sheet.row_count, 3);
    assert_eq!(sheet.column_count, 2);
}

#[test]
fn given_invalid_workbook_bytes_when_inspecting_then_returns_none() {
    let info = SpreadsheetProcessor::spreadsheet_info(
        b"not a workbook at all",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    );

    assert!(info.is_none());
}
