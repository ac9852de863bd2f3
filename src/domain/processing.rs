use serde::Serialize;

use super::FileInfo;

/// Outcome of processing a single file. Failures are carried in-band: a
/// failed result has `success == false`, empty text and a descriptive
/// `error`, never a panic or an `Err` at the orchestrator boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub success: bool,
    pub text: String,
    pub metadata: ProcessingMetadata,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMetadata {
    pub file_type: String,
    pub file_name: String,
    pub file_size: u64,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    pub language: String,
}

impl ProcessingMetadata {
    pub fn for_file(file: &FileInfo, language: impl Into<String>) -> Self {
        Self {
            file_type: file.mime_type.clone(),
            file_name: file.original_name.clone(),
            file_size: file.size,
            processing_time_ms: 0,
            confidence: None,
            page_count: None,
            language: language.into(),
        }
    }
}

impl ProcessingResult {
    pub fn succeeded(text: String, metadata: ProcessingMetadata) -> Self {
        Self {
            success: true,
            text,
            metadata,
            error: None,
        }
    }

    pub fn failed(error: impl std::fmt::Display, metadata: ProcessingMetadata) -> Self {
        Self {
            success: false,
            text: String::new(),
            metadata,
            error: Some(error.to_string()),
        }
    }
}
