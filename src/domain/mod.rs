mod budget;
mod file;
mod options;
mod processing;

pub use budget::{BudgetGenerationOptions, BudgetItem, BudgetResponse, LlmConfig, ProviderKind};
pub use file::{FileInfo, ProcessorKind, SupportedFileType};
pub use options::{OcrOptions, PdfOptions, ProcessingOptions, SpreadsheetOptions};
pub(crate) use options::DEFAULT_LANGUAGE;
pub use processing::{ProcessingMetadata, ProcessingResult};
