use async_trait::async_trait;

use crate::domain::{FileInfo, ProcessingOptions, ProcessingResult, ProcessorKind};

/// One extraction strategy (OCR, PDF, spreadsheet). Implementations never
/// propagate errors to callers: every failure is folded into a failed
/// [`ProcessingResult`].
#[async_trait]
pub trait FormatProcessor: Send + Sync {
    fn kind(&self) -> ProcessorKind;

    async fn process(&self, file: &FileInfo, options: &ProcessingOptions) -> ProcessingResult;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction failed: {0}")]
    Failed(String),
    #[error("extraction timed out after {0} ms")]
    Timeout(u128),
    #[error("recognition engine unavailable: {0}")]
    EngineUnavailable(String),
}
