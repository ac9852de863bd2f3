use crate::domain::{FileInfo, ProcessorKind, SupportedFileType};

/// Hard ceiling enforced before any extraction work, guarding the OCR and
/// PDF stages against unbounded memory and CPU use.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

const SUPPORTED_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "tiff", "tif", "bmp", "xlsx", "xls", "csv",
];

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("file too large: {size} bytes (maximum {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },
    #[error("file format not recognized: {0}")]
    UnrecognizedFormat(String),
}

pub struct FileTypeDetector;

impl FileTypeDetector {
    pub fn is_supported(mime_type: &str) -> bool {
        SupportedFileType::from_mime(mime_type).is_some()
    }

    /// Resolve a file's type from its name and, when available, its leading
    /// bytes. A matching binary signature wins over a disagreeing extension.
    pub fn detect_mime_type(
        file_name: &str,
        buffer: Option<&[u8]>,
    ) -> Result<SupportedFileType, DetectionError> {
        if let Some(buffer) = buffer {
            if let Some(sniffed) = Self::sniff_signature(buffer) {
                return Ok(sniffed);
            }
        }

        file_extension(file_name)
            .and_then(SupportedFileType::from_extension)
            .ok_or_else(|| DetectionError::UnrecognizedFormat(file_name.to_string()))
    }

    /// Match the buffer's leading bytes against the fixed signature table.
    fn sniff_signature(buffer: &[u8]) -> Option<SupportedFileType> {
        if buffer.starts_with(b"%PDF") {
            return Some(SupportedFileType::Pdf);
        }
        if buffer.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(SupportedFileType::Jpeg);
        }
        if buffer.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(SupportedFileType::Png);
        }
        // TIFF, little- and big-endian markers.
        if buffer.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || buffer.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(SupportedFileType::Tiff);
        }
        if buffer.starts_with(b"BM") {
            return Some(SupportedFileType::Bmp);
        }
        // XLSX is a ZIP container.
        if buffer.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(SupportedFileType::Xlsx);
        }
        // Legacy XLS OLE compound document.
        if buffer.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]) {
            return Some(SupportedFileType::Xls);
        }
        None
    }

    pub fn validate_file(file: &FileInfo) -> Result<(), DetectionError> {
        if file.size > MAX_FILE_SIZE {
            return Err(DetectionError::FileTooLarge {
                size: file.size,
                max: MAX_FILE_SIZE,
            });
        }

        if !Self::is_supported(&file.mime_type) {
            return Err(DetectionError::UnsupportedFileType(file.mime_type.clone()));
        }

        match file_extension(&file.original_name) {
            Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => Ok(()),
            _ => Err(DetectionError::UnsupportedFileType(format!(
                "extension of {}",
                file.original_name
            ))),
        }
    }

    pub fn processor_for(mime_type: &str) -> Result<ProcessorKind, DetectionError> {
        SupportedFileType::from_mime(mime_type)
            .map(|t| t.processor_kind())
            .ok_or_else(|| DetectionError::UnsupportedFileType(mime_type.to_string()))
    }
}

fn file_extension(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}
