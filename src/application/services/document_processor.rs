use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::ports::FormatProcessor;
use crate::domain::{
    FileInfo, ProcessingMetadata, ProcessingOptions, ProcessingResult, ProcessorKind,
};
use crate::infrastructure::detection::{DetectionError, FileTypeDetector};
use crate::infrastructure::text_processing::{
    OcrProcessor, PdfMetadata, PdfProcessor, SpreadsheetInfo, SpreadsheetProcessor,
    TextPreprocessor,
};

/// Per-type file overview returned by [`DocumentProcessor::get_file_info`]
/// without running an extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileDetails {
    Pdf(PdfMetadata),
    Spreadsheet(SpreadsheetInfo),
    Basic {
        kind: String,
        mime_type: String,
        size: u64,
        name: String,
    },
}

/// Single entry point for document extraction. This is the error
/// containment boundary: `process_document` returns a `ProcessingResult`
/// unconditionally, so callers never handle extraction exceptions.
pub struct DocumentProcessor {
    processors: HashMap<ProcessorKind, Arc<dyn FormatProcessor>>,
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor {
    pub fn new() -> Self {
        let processors: Vec<(ProcessorKind, Arc<dyn FormatProcessor>)> = vec![
            (ProcessorKind::Ocr, Arc::new(OcrProcessor::new())),
            (ProcessorKind::Pdf, Arc::new(PdfProcessor::new())),
            (ProcessorKind::Spreadsheet, Arc::new(SpreadsheetProcessor::new())),
        ];
        Self::with_processors(processors)
    }

    /// Build an orchestrator over an explicit processor set. Tests swap in
    /// stub processors through this.
    pub fn with_processors(
        processors: Vec<(ProcessorKind, Arc<dyn FormatProcessor>)>,
    ) -> Self {
        Self {
            processors: processors.into_iter().collect(),
        }
    }

    #[tracing::instrument(
        skip(self, file, options),
        fields(filename = %file.original_name, mime = %file.mime_type, size = file.size)
    )]
    pub async fn process_document(
        &self,
        file: &FileInfo,
        options: &ProcessingOptions,
    ) -> ProcessingResult {
        if let Err(error) = FileTypeDetector::validate_file(file) {
            return Self::contained_failure(file, options, error);
        }

        let kind = match FileTypeDetector::processor_for(&file.mime_type) {
            Ok(kind) => kind,
            Err(error) => return Self::contained_failure(file, options, error),
        };

        let processor = match self.processors.get(&kind) {
            Some(processor) => Arc::clone(processor),
            None => {
                return Self::contained_failure(
                    file,
                    options,
                    format!("no processor registered for {kind}"),
                )
            }
        };

        let mut result = processor.process(file, options).await;

        if result.success && !result.text.is_empty() {
            result.text = TextPreprocessor::format_for_llm(&result.text);
        }

        result
    }

    /// Independent, order-preserving fan-out: one result per input file, in
    /// input order, regardless of completion order.
    pub async fn process_multiple_documents(
        &self,
        files: &[FileInfo],
        options: &ProcessingOptions,
    ) -> Vec<ProcessingResult> {
        futures::future::join_all(
            files
                .iter()
                .map(|file| self.process_document(file, options)),
        )
        .await
    }

    pub fn is_file_type_supported(mime_type: &str) -> bool {
        FileTypeDetector::is_supported(mime_type)
    }

    /// Inspect a file without extracting it.
    pub fn get_file_info(file: &FileInfo) -> Result<FileDetails, DetectionError> {
        FileTypeDetector::validate_file(file)?;
        let kind = FileTypeDetector::processor_for(&file.mime_type)?;

        let details = match kind {
            ProcessorKind::Pdf => PdfProcessor::extract_metadata(&file.buffer)
                .map(FileDetails::Pdf)
                .unwrap_or_else(|| Self::basic_details(file, kind)),
            ProcessorKind::Spreadsheet => {
                SpreadsheetProcessor::spreadsheet_info(&file.buffer, &file.mime_type)
                    .map(FileDetails::Spreadsheet)
                    .unwrap_or_else(|| Self::basic_details(file, kind))
            }
            ProcessorKind::Ocr => Self::basic_details(file, kind),
        };

        Ok(details)
    }

    /// Extract only the ranked keywords of a document. Empty when the
    /// document could not be processed.
    pub async fn extract_keywords(
        &self,
        file: &FileInfo,
        max_keywords: usize,
        options: &ProcessingOptions,
    ) -> Vec<String> {
        let result = self.process_document(file, options).await;
        if !result.success || result.text.is_empty() {
            return Vec::new();
        }
        TextPreprocessor::extract_keywords(&result.text, max_keywords)
    }

    /// Extractive summary of a document. Empty when the document could not
    /// be processed.
    pub async fn summarize_document(
        &self,
        file: &FileInfo,
        max_sentences: usize,
        options: &ProcessingOptions,
    ) -> String {
        let result = self.process_document(file, options).await;
        if !result.success || result.text.is_empty() {
            return String::new();
        }
        TextPreprocessor::summarize_text(&result.text, max_sentences)
    }

    /// Similarity of two documents' extracted text, in [0, 1]. Zero when
    /// either side failed to process.
    pub async fn compare_documents(
        &self,
        first: &FileInfo,
        second: &FileInfo,
        options: &ProcessingOptions,
    ) -> f64 {
        let (result_a, result_b) = tokio::join!(
            self.process_document(first, options),
            self.process_document(second, options)
        );

        if !result_a.success || !result_b.success || result_a.text.is_empty() || result_b.text.is_empty()
        {
            return 0.0;
        }

        TextPreprocessor::calculate_similarity(&result_a.text, &result_b.text)
    }

    fn basic_details(file: &FileInfo, kind: ProcessorKind) -> FileDetails {
        FileDetails::Basic {
            kind: kind.to_string(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            name: file.original_name.clone(),
        }
    }

    /// Failures caught before a processor ran carry zero processing time.
    fn contained_failure(
        file: &FileInfo,
        options: &ProcessingOptions,
        error: impl std::fmt::Display,
    ) -> ProcessingResult {
        let language = options
            .language
            .clone()
            .unwrap_or_else(|| crate::domain::DEFAULT_LANGUAGE.to_string());
        let metadata = ProcessingMetadata::for_file(file, language);
        tracing::warn!(filename = %file.original_name, %error, "document rejected before extraction");
        ProcessingResult::failed(error, metadata)
    }
}
