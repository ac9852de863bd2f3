use std::path::PathBuf;

/// Raw upload as handed over by the upload handler. Never mutated by the
/// processing pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub buffer: Vec<u8>,
    pub path: Option<PathBuf>,
}

impl FileInfo {
    pub fn new(original_name: impl Into<String>, mime_type: impl Into<String>, buffer: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            size: buffer.len() as u64,
            buffer,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFileType {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    Bmp,
    Xlsx,
    Xls,
    Csv,
}

impl SupportedFileType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/tiff" => Some(Self::Tiff),
            "image/bmp" => Some(Self::Bmp),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some(Self::Xlsx),
            "application/vnd.ms-excel" => Some(Self::Xls),
            "text/csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::Bmp => "image/bmp",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xls => "application/vnd.ms-excel",
            Self::Csv => "text/csv",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tiff" | "tif" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn processor_kind(&self) -> ProcessorKind {
        match self {
            Self::Pdf => ProcessorKind::Pdf,
            Self::Jpeg | Self::Png | Self::Tiff | Self::Bmp => ProcessorKind::Ocr,
            Self::Xlsx | Self::Xls | Self::Csv => ProcessorKind::Spreadsheet,
        }
    }
}

/// Extraction strategy selected for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorKind {
    Ocr,
    Pdf,
    Spreadsheet,
}

impl std::fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ocr => write!(f, "ocr"),
            Self::Pdf => write!(f, "pdf"),
            Self::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}
