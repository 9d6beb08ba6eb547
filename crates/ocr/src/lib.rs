pub mod classify;
pub mod extract;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod scratch;
pub mod types;

pub use classify::{FilterConfig, FilterConfigError, KeywordClassifier, LineClassifier};
pub use extract::ProductExtractor;
pub use pipeline::{PipelineError, ReceiptPipeline};
pub use preprocess::{prepare_for_ocr_from_bytes, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use scratch::ScratchImage;
pub use types::{LineKind, ReceiptScan};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
