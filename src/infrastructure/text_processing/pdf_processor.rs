use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::{ExtractionError, FormatProcessor};
use crate::domain::{FileInfo, PdfOptions, ProcessingMetadata, ProcessingOptions, ProcessingResult, ProcessorKind};

use super::ocr_processor::OcrProcessor;
use super::pdf_rasterizer::rasterize_pages;
use super::text_cleaner::clean_extracted_text;

/// Below this average character count per page a PDF is treated as scanned.
/// Tuned empirically; revisit against a labeled corpus before trusting it
/// as ground truth.
pub const SCANNED_CHARS_PER_PAGE: usize = 50;

/// Confidence assigned when the embedded text layer is kept as-is.
const NATIVE_TEXT_CONFIDENCE: f32 = 100.0;
/// Confidence when OCR fallback produced text but reported no score.
const FALLBACK_DEFAULT_CONFIDENCE: f32 = 85.0;
/// Confidence when a scanned classification could not be improved by OCR.
const DEGRADED_CONFIDENCE: f32 = 25.0;

#[derive(Debug, Clone, Serialize)]
pub struct PdfMetadata {
    pub pages: usize,
    pub version: String,
    pub info: BTreeMap<String, String>,
}

struct NativeExtraction {
    text: String,
    page_count: usize,
}

/// Embedded-text extraction with an OCR fallback for scanned documents.
#[derive(Default)]
pub struct PdfProcessor {
    ocr: OcrProcessor,
}

impl PdfProcessor {
    pub fn new() -> Self {
        Self {
            ocr: OcrProcessor::new(),
        }
    }

    #[tracing::instrument(
        skip(self, file, options),
        fields(filename = %file.original_name, size = file.size)
    )]
    pub async fn process_pdf(
        &self,
        file: &FileInfo,
        options: &ProcessingOptions,
    ) -> ProcessingResult {
        let started = Instant::now();
        let opts = PdfOptions::resolve(options);
        let mut metadata = ProcessingMetadata::for_file(file, opts.language.as_str());

        let data = file.buffer.clone();
        let max_pages = opts.max_pages;
        let native = tokio::time::timeout(
            opts.timeout,
            tokio::task::spawn_blocking(move || extract_native_text(&data, max_pages)),
        )
        .await
        .map_err(|_| ExtractionError::Timeout(opts.timeout.as_millis()))
        .and_then(|joined| {
            joined.map_err(|e| ExtractionError::Failed(format!("task join error: {e}")))
        })
        .and_then(|inner| inner);

        let native = match native {
            Ok(native) => native,
            Err(error) => {
                metadata.processing_time_ms = started.elapsed().as_millis() as u64;
                return ProcessingResult::failed(error, metadata);
            }
        };

        let mut text = native.text;
        let mut confidence = NATIVE_TEXT_CONFIDENCE;

        if is_probably_scanned(&text, native.page_count) {
            tracing::info!(
                page_count = native.page_count,
                native_chars = text.trim().len(),
                "PDF looks scanned, attempting OCR fallback"
            );

            match self.ocr_fallback(&file.buffer, &opts).await {
                // Longer output is the proxy for a more complete extraction;
                // a shorter OCR result never displaces the native text.
                Ok((fallback_text, fallback_confidence))
                    if fallback_text.len() > text.len() =>
                {
                    text = fallback_text;
                    confidence = fallback_confidence.unwrap_or(FALLBACK_DEFAULT_CONFIDENCE);
                }
                Ok(_) => {
                    tracing::warn!("OCR fallback did not improve on native extraction");
                    confidence = DEGRADED_CONFIDENCE;
                }
                Err(error) => {
                    tracing::warn!(%error, "OCR fallback failed, keeping native extraction");
                    confidence = DEGRADED_CONFIDENCE;
                }
            }
        }

        if !opts.preserve_formatting {
            text = clean_extracted_text(&text);
        }

        if opts.include_metadata {
            if let Some(doc_info) = Self::extract_metadata(&file.buffer) {
                tracing::debug!(version = %doc_info.version, pages = doc_info.pages, "PDF document info");
            }
        }

        metadata.processing_time_ms = started.elapsed().as_millis() as u64;
        metadata.confidence = Some(confidence);
        metadata.page_count = Some(native.page_count);
        ProcessingResult::succeeded(text, metadata)
    }

    async fn ocr_fallback(
        &self,
        data: &[u8],
        opts: &PdfOptions,
    ) -> Result<(String, Option<f32>), ExtractionError> {
        let data_owned = data.to_vec();
        let max_pages = opts.max_pages;

        let png_buffers = tokio::task::spawn_blocking(move || {
            std::panic::catch_unwind(|| rasterize_pages(&data_owned, max_pages)).unwrap_or_else(
                |_| {
                    Err(ExtractionError::Failed(
                        "OOM or panic during PDF rasterization".to_string(),
                    ))
                },
            )
        })
        .await
        .map_err(|e| ExtractionError::Failed(format!("task join error: {e}")))??;

        if png_buffers.is_empty() {
            return Err(ExtractionError::Failed(
                "PDF rasterization produced no pages".to_string(),
            ));
        }

        let ocr_opts = crate::domain::OcrOptions {
            language: opts.language.clone(),
            preserve_formatting: true,
            timeout: opts.timeout,
            psm: None,
            oem: None,
        };

        let mut page_texts: Vec<String> = Vec::with_capacity(png_buffers.len());
        let mut confidence_sum = 0.0f32;
        let mut confidence_count = 0usize;

        for (index, png_bytes) in png_buffers.iter().enumerate() {
            let (page_text, page_confidence) =
                self.ocr.recognize_image(png_bytes, &ocr_opts).await.map_err(|e| {
                    ExtractionError::Failed(format!("OCR of page {index} failed: {e}"))
                })?;

            if !page_text.trim().is_empty() {
                page_texts.push(page_text);
            }
            if let Some(conf) = page_confidence {
                confidence_sum += conf;
                confidence_count += 1;
            }
        }

        let confidence =
            (confidence_count > 0).then(|| confidence_sum / confidence_count as f32);
        Ok((page_texts.join("\n\n"), confidence))
    }

    /// Container-level metadata: page count, PDF version and the trailer
    /// Info dictionary. `None` when the container cannot be parsed.
    pub fn extract_metadata(data: &[u8]) -> Option<PdfMetadata> {
        let doc = lopdf::Document::load_mem(data).ok()?;
        let pages = doc.get_pages().len();
        let version = doc.version.clone();

        let mut info = BTreeMap::new();
        if let Ok(lopdf::Object::Reference(id)) = doc.trailer.get(b"Info") {
            if let Ok(dict) = doc.get_dictionary(*id) {
                for (key, value) in dict.iter() {
                    if let lopdf::Object::String(bytes, _) = value {
                        info.insert(
                            String::from_utf8_lossy(key).to_string(),
                            String::from_utf8_lossy(bytes).to_string(),
                        );
                    }
                }
            }
        }

        Some(PdfMetadata {
            pages,
            version,
            info,
        })
    }
}

#[async_trait]
impl FormatProcessor for PdfProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Pdf
    }

    async fn process(&self, file: &FileInfo, options: &ProcessingOptions) -> ProcessingResult {
        self.process_pdf(file, options).await
    }
}

fn extract_native_text(data: &[u8], max_pages: usize) -> Result<NativeExtraction, ExtractionError> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| ExtractionError::Failed(format!("failed to parse PDF: {e}")))?;

    let pages = doc.get_pages();
    let page_count = pages.len();

    let mut page_texts: Vec<String> = Vec::with_capacity(page_count.min(max_pages));
    for (&page_number, _) in pages.iter().take(max_pages) {
        let text = doc.extract_text(&[page_number]).unwrap_or_default();
        page_texts.push(text);
    }

    Ok(NativeExtraction {
        text: page_texts.join("\n\n").trim().to_string(),
        page_count,
    })
}

/// Character-density heuristic for the scanned classification.
pub fn is_probably_scanned(text: &str, page_count: usize) -> bool {
    if page_count == 0 {
        return true;
    }
    text.trim().len() / page_count < SCANNED_CHARS_PER_PAGE
}
