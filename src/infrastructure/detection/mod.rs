mod file_type_detector;

pub use file_type_detector::{DetectionError, FileTypeDetector, MAX_FILE_SIZE};
