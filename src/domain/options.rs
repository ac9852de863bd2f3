use serde::Deserialize;
use std::time::Duration;

/// Per-call overrides accepted by every processor. Unset keys fall back to
/// the processor's own defaults; nothing here is persisted or read from the
/// environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessingOptions {
    pub language: Option<String>,
    pub preserve_formatting: Option<bool>,
    pub timeout_ms: Option<u64>,
    /// Page segmentation mode forwarded to the OCR engine.
    pub psm: Option<u8>,
    /// OCR engine mode.
    pub oem: Option<u8>,
    pub max_pages: Option<usize>,
    pub include_metadata: Option<bool>,
    pub sheet_names: Option<Vec<String>>,
    pub include_headers: Option<bool>,
    pub max_rows: Option<usize>,
}

pub(crate) const DEFAULT_LANGUAGE: &str = "por";

/// Resolved OCR configuration.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    pub language: String,
    pub preserve_formatting: bool,
    pub timeout: Duration,
    pub psm: Option<u8>,
    pub oem: Option<u8>,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            preserve_formatting: true,
            timeout: Duration::from_secs(60),
            psm: None,
            oem: None,
        }
    }
}

impl OcrOptions {
    pub fn resolve(options: &ProcessingOptions) -> Self {
        let defaults = Self::default();
        Self {
            language: options.language.clone().unwrap_or(defaults.language),
            preserve_formatting: options
                .preserve_formatting
                .unwrap_or(defaults.preserve_formatting),
            timeout: options
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            psm: options.psm,
            oem: options.oem,
        }
    }
}

/// Resolved PDF extraction configuration.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub language: String,
    pub preserve_formatting: bool,
    pub timeout: Duration,
    pub max_pages: usize,
    pub include_metadata: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            preserve_formatting: true,
            timeout: Duration::from_secs(120),
            max_pages: 100,
            include_metadata: true,
        }
    }
}

impl PdfOptions {
    pub fn resolve(options: &ProcessingOptions) -> Self {
        let defaults = Self::default();
        Self {
            language: options.language.clone().unwrap_or(defaults.language),
            preserve_formatting: options
                .preserve_formatting
                .unwrap_or(defaults.preserve_formatting),
            timeout: options
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            max_pages: options.max_pages.unwrap_or(defaults.max_pages),
            include_metadata: options.include_metadata.unwrap_or(defaults.include_metadata),
        }
    }
}

/// Resolved spreadsheet flattening configuration.
#[derive(Debug, Clone)]
pub struct SpreadsheetOptions {
    pub language: String,
    pub preserve_formatting: bool,
    pub timeout: Duration,
    pub sheet_names: Option<Vec<String>>,
    pub include_headers: bool,
    pub max_rows: usize,
}

impl Default for SpreadsheetOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            preserve_formatting: true,
            timeout: Duration::from_secs(60),
            sheet_names: None,
            include_headers: true,
            max_rows: 10_000,
        }
    }
}

impl SpreadsheetOptions {
    pub fn resolve(options: &ProcessingOptions) -> Self {
        let defaults = Self::default();
        Self {
            language: options.language.clone().unwrap_or(defaults.language),
            preserve_formatting: options
                .preserve_formatting
                .unwrap_or(defaults.preserve_formatting),
            timeout: options
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            sheet_names: options.sheet_names.clone(),
            include_headers: options.include_headers.unwrap_or(defaults.include_headers),
            max_rows: options.max_rows.unwrap_or(defaults.max_rows),
        }
    }
}
