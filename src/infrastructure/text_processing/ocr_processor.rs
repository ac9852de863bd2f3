use std::io::{Cursor, Write};
use std::time::Instant;

use async_trait::async_trait;
use image::imageops::FilterType;
use image::GrayImage;

use crate::application::ports::{ExtractionError, FormatProcessor};
use crate::domain::{FileInfo, OcrOptions, ProcessingMetadata, ProcessingOptions, ProcessingResult, ProcessorKind};

use super::text_cleaner::clean_extracted_text;

const MAX_IMAGE_HEIGHT: u32 = 2000;
const SHARPEN_SIGMA: f32 = 1.0;
const SHARPEN_THRESHOLD: i32 = 4;

const SUPPORTED_LANGUAGES: &[&str] = &["por", "eng", "spa", "fra", "deu", "ita"];

/// Raster-image extraction backed by the external Tesseract engine. The
/// image is normalized first to raise recognition accuracy; normalization
/// failure is non-fatal and recognition proceeds on the original bytes.
#[derive(Default)]
pub struct OcrProcessor;

impl OcrProcessor {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        skip(self, file, options),
        fields(filename = %file.original_name, size = file.size)
    )]
    pub async fn process_image(
        &self,
        file: &FileInfo,
        options: &ProcessingOptions,
    ) -> ProcessingResult {
        let started = Instant::now();
        let opts = OcrOptions::resolve(options);
        let mut metadata = ProcessingMetadata::for_file(file, opts.language.as_str());

        match self.recognize_image(&file.buffer, &opts).await {
            Ok((text, confidence)) => {
                let text = if opts.preserve_formatting {
                    text
                } else {
                    clean_extracted_text(&text)
                };
                metadata.processing_time_ms = started.elapsed().as_millis() as u64;
                metadata.confidence = Some(confidence.unwrap_or(0.0));
                tracing::info!(
                    confidence = metadata.confidence,
                    chars = text.len(),
                    "image recognition complete"
                );
                ProcessingResult::succeeded(text, metadata)
            }
            Err(error) => {
                metadata.processing_time_ms = started.elapsed().as_millis() as u64;
                metadata.confidence = Some(0.0);
                ProcessingResult::failed(error, metadata)
            }
        }
    }

    /// Single recognition attempt, bounded by the configured timeout.
    /// Returns the recognized text and the engine's mean word confidence.
    pub(crate) async fn recognize_image(
        &self,
        bytes: &[u8],
        opts: &OcrOptions,
    ) -> Result<(String, Option<f32>), ExtractionError> {
        let owned = bytes.to_vec();
        let normalized = tokio::task::spawn_blocking(move || normalize_image(&owned))
            .await
            .map_err(|e| ExtractionError::Failed(format!("task join error: {e}")))?;

        let image_bytes = match normalized {
            Ok(prepared) => prepared,
            Err(error) => {
                tracing::warn!(%error, "image normalization failed, recognizing original bytes");
                bytes.to_vec()
            }
        };

        let mut temp_file = tempfile::NamedTempFile::new()
            .map_err(|e| ExtractionError::Failed(format!("failed to create temp file: {e}")))?;
        temp_file
            .write_all(&image_bytes)
            .map_err(|e| ExtractionError::Failed(format!("failed to write temp file: {e}")))?;

        let mut command = tokio::process::Command::new("tesseract");
        command
            .arg(temp_file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&opts.language);
        if let Some(psm) = opts.psm {
            command.arg("--psm").arg(psm.to_string());
        }
        if let Some(oem) = opts.oem {
            command.arg("--oem").arg(oem.to_string());
        }
        command.arg("tsv");

        let output = tokio::time::timeout(opts.timeout, command.output())
            .await
            .map_err(|_| ExtractionError::Timeout(opts.timeout.as_millis()))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractionError::EngineUnavailable(
                        "tesseract binary not found on PATH".to_string(),
                    )
                } else {
                    ExtractionError::Failed(format!("failed to run tesseract: {e}"))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Failed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        Ok(parse_tsv_output(&tsv))
    }

    pub fn supported_languages() -> &'static [&'static str] {
        SUPPORTED_LANGUAGES
    }

    pub async fn is_language_available(language: &str) -> bool {
        let output = tokio::process::Command::new("tesseract")
            .arg("--list-langs")
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
                .lines()
                .skip(1)
                .any(|line| line.trim() == language),
            _ => false,
        }
    }
}

#[async_trait]
impl FormatProcessor for OcrProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Ocr
    }

    async fn process(&self, file: &FileInfo, options: &ProcessingOptions) -> ProcessingResult {
        self.process_image(file, options).await
    }
}

/// Tesseract TSV output: one row per element, level 5 rows are words with a
/// per-word confidence in column 11 and the text in column 12. Words are
/// re-joined into lines; the mean of non-negative confidences becomes the
/// extraction confidence.
pub fn parse_tsv_output(tsv: &str) -> (String, Option<f32>) {
    let mut text = String::new();
    let mut confidence_sum = 0.0f32;
    let mut confidence_count = 0usize;
    let mut current_line: Option<(u32, u32, u32, u32)> = None;

    for row in tsv.lines().skip(1) {
        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() < 12 || columns[0] != "5" {
            continue;
        }

        let word = columns[11].trim();
        if word.is_empty() {
            continue;
        }

        let line_key = (
            columns[1].parse().unwrap_or(0),
            columns[2].parse().unwrap_or(0),
            columns[3].parse().unwrap_or(0),
            columns[4].parse().unwrap_or(0),
        );

        match current_line {
            Some(previous) if previous != line_key => text.push('\n'),
            Some(_) => text.push(' '),
            None => {}
        }
        text.push_str(word);
        current_line = Some(line_key);

        if let Ok(conf) = columns[10].parse::<f32>() {
            if conf >= 0.0 {
                confidence_sum += conf;
                confidence_count += 1;
            }
        }
    }

    let confidence =
        (confidence_count > 0).then(|| confidence_sum / confidence_count as f32);
    (text, confidence)
}

fn normalize_image(bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ExtractionError::Failed(format!("image decode failed: {e}")))?;

    let img = if img.height() > MAX_IMAGE_HEIGHT {
        img.resize(img.width(), MAX_IMAGE_HEIGHT, FilterType::Lanczos3)
    } else {
        img
    };

    let mut gray = img.to_luma8();
    stretch_contrast(&mut gray);
    let sharpened = image::imageops::unsharpen(&gray, SHARPEN_SIGMA, SHARPEN_THRESHOLD);

    let mut encoded = Vec::new();
    image::DynamicImage::ImageLuma8(sharpened)
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
        .map_err(|e| ExtractionError::Failed(format!("PNG encode failed: {e}")))?;

    Ok(encoded)
}

/// Min-max contrast stretch over the full dynamic range.
fn stretch_contrast(img: &mut GrayImage) {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for pixel in img.pixels() {
        min = min.min(pixel[0]);
        max = max.max(pixel[0]);
    }

    if max <= min {
        return;
    }

    let range = (max - min) as f32;
    for pixel in img.pixels_mut() {
        pixel[0] = (((pixel[0] - min) as f32 / range) * 255.0) as u8;
    }
}
