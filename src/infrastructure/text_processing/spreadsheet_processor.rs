use std::collections::BTreeMap;
use std::io::Cursor;
use std::time::Instant;

use async_trait::async_trait;
use calamine::{Data, Reader, Xls, Xlsx};
use serde::Serialize;

use crate::application::ports::{ExtractionError, FormatProcessor};
use crate::domain::{
    FileInfo, ProcessingMetadata, ProcessingOptions, ProcessingResult, ProcessorKind,
    SpreadsheetOptions, SupportedFileType,
};

use super::text_cleaner::clean_extracted_text;

/// Spreadsheet parsing is deterministic, never heuristic.
const SPREADSHEET_CONFIDENCE: f32 = 100.0;

type SheetRows = Vec<Vec<String>>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetInfo {
    pub sheet_count: usize,
    pub sheet_names: Vec<String>,
    pub sheets: BTreeMap<String, SheetInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    pub row_count: usize,
    pub column_count: usize,
}

/// Flattens workbooks (and CSV as a single-sheet workbook) into the
/// self-describing `column: value` text form the model consumes.
#[derive(Default)]
pub struct SpreadsheetProcessor;

impl SpreadsheetProcessor {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        skip(self, file, options),
        fields(filename = %file.original_name, size = file.size)
    )]
    pub async fn process_spreadsheet(
        &self,
        file: &FileInfo,
        options: &ProcessingOptions,
    ) -> ProcessingResult {
        let started = Instant::now();
        let opts = SpreadsheetOptions::resolve(options);
        let mut metadata = ProcessingMetadata::for_file(file, opts.language.as_str());

        let data = file.buffer.clone();
        let mime_type = file.mime_type.clone();
        let loaded = tokio::time::timeout(
            opts.timeout,
            tokio::task::spawn_blocking(move || load_workbook(&data, &mime_type)),
        )
        .await
        .map_err(|_| ExtractionError::Timeout(opts.timeout.as_millis()))
        .and_then(|joined| {
            joined.map_err(|e| ExtractionError::Failed(format!("task join error: {e}")))
        })
        .and_then(|inner| inner);

        let sheets = match loaded {
            Ok(sheets) => sheets,
            Err(error) => {
                metadata.processing_time_ms = started.elapsed().as_millis() as u64;
                return ProcessingResult::failed(error, metadata);
            }
        };

        let blocks: Vec<String> = match &opts.sheet_names {
            Some(wanted) => wanted
                .iter()
                .filter_map(|name| match sheets.iter().find(|(n, _)| n == name) {
                    Some((n, rows)) => {
                        Some(flatten_sheet(n, rows, opts.include_headers, opts.max_rows))
                    }
                    None => {
                        tracing::warn!(sheet = %name, "sheet not found in workbook, skipping");
                        None
                    }
                })
                .collect(),
            None => sheets
                .iter()
                .map(|(n, rows)| flatten_sheet(n, rows, opts.include_headers, opts.max_rows))
                .collect(),
        };

        let mut text = blocks.join("\n\n").trim().to_string();
        if !opts.preserve_formatting {
            text = clean_extracted_text(&text);
        }

        metadata.processing_time_ms = started.elapsed().as_millis() as u64;
        metadata.confidence = Some(SPREADSHEET_CONFIDENCE);
        ProcessingResult::succeeded(text, metadata)
    }

    pub fn sheet_names(data: &[u8], mime_type: &str) -> Vec<String> {
        if SupportedFileType::from_mime(mime_type) == Some(SupportedFileType::Csv) {
            return vec!["Sheet1".to_string()];
        }

        match load_workbook(data, mime_type) {
            Ok(sheets) => sheets.into_iter().map(|(name, _)| name).collect(),
            Err(error) => {
                tracing::warn!(%error, "failed to read sheet names");
                Vec::new()
            }
        }
    }

    pub fn spreadsheet_info(data: &[u8], mime_type: &str) -> Option<SpreadsheetInfo> {
        let sheets = match load_workbook(data, mime_type) {
            Ok(sheets) => sheets,
            Err(error) => {
                tracing::warn!(%error, "failed to read spreadsheet info");
                return None;
            }
        };

        let mut info = BTreeMap::new();
        let mut names = Vec::with_capacity(sheets.len());
        for (name, rows) in &sheets {
            names.push(name.clone());
            info.insert(
                name.clone(),
                SheetInfo {
                    row_count: rows.len(),
                    column_count: rows.iter().map(Vec::len).max().unwrap_or(0),
                },
            );
        }

        Some(SpreadsheetInfo {
            sheet_count: sheets.len(),
            sheet_names: names,
            sheets: info,
        })
    }
}

#[async_trait]
impl FormatProcessor for SpreadsheetProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Spreadsheet
    }

    async fn process(&self, file: &FileInfo, options: &ProcessingOptions) -> ProcessingResult {
        self.process_spreadsheet(file, options).await
    }
}

/// Render one sheet as a text block. With headers the first row labels every
/// cell (`column: value`), which gives the model per-cell context a raw
/// tabular dump would not.
pub fn flatten_sheet(
    name: &str,
    rows: &[Vec<String>],
    include_headers: bool,
    max_rows: usize,
) -> String {
    let mut out = format!("=== SHEET: {name} ===\n");

    if rows.is_empty() {
        out.push_str("(empty sheet)\n");
        return out;
    }

    if include_headers {
        let headers = &rows[0];
        out.push_str(&format!("COLUMNS: {}\n\n", headers.join(" | ")));

        for (index, row) in rows[1..].iter().take(max_rows).enumerate() {
            let rendered: Vec<String> = headers
                .iter()
                .enumerate()
                .map(|(column, header)| {
                    let value = row.get(column).map(String::as_str).unwrap_or("");
                    format!("{header}: {value}")
                })
                .collect();
            out.push_str(&format!("ROW {}: {}\n", index + 1, rendered.join(" | ")));
        }
    } else {
        for (index, row) in rows.iter().take(max_rows).enumerate() {
            out.push_str(&format!("ROW {}: {}\n", index + 1, row.join(" | ")));
        }
    }

    out
}

fn load_workbook(data: &[u8], mime_type: &str) -> Result<Vec<(String, SheetRows)>, ExtractionError> {
    match SupportedFileType::from_mime(mime_type) {
        Some(SupportedFileType::Csv) => load_csv(data),
        Some(SupportedFileType::Xlsx) => {
            let mut workbook = Xlsx::new(Cursor::new(data))
                .map_err(|e| ExtractionError::Failed(format!("failed to open XLSX: {e}")))?;
            Ok(read_sheets(&mut workbook))
        }
        Some(SupportedFileType::Xls) => {
            let mut workbook = Xls::new(Cursor::new(data))
                .map_err(|e| ExtractionError::Failed(format!("failed to open XLS: {e}")))?;
            Ok(read_sheets(&mut workbook))
        }
        _ => Err(ExtractionError::Failed(format!(
            "not a spreadsheet mime type: {mime_type}"
        ))),
    }
}

fn read_sheets<RS, R>(workbook: &mut R) -> Vec<(String, SheetRows)>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
{
    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());

    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let rows: SheetRows = range
                    .rows()
                    .map(|row| row.iter().map(cell_to_string).collect())
                    .collect();
                sheets.push((name, rows));
            }
            Err(_) => {
                tracing::warn!(sheet = %name, "failed to read sheet range, skipping");
            }
        }
    }

    sheets
}

fn load_csv(data: &[u8]) -> Result<Vec<(String, SheetRows)>, ExtractionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows: SheetRows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ExtractionError::Failed(format!("CSV parse error: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(vec![("Sheet1".to_string(), rows)])
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
