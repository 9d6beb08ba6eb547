use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::extract::ProductExtractor;
use crate::preprocess::{self, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};
use crate::scratch::ScratchImage;
use crate::types::ReceiptScan;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("Receipt worker did not finish: {0}")]
    Worker(String),
}

impl PipelineError {
    /// The underlying failure message, without the pipeline-stage prefixes.
    pub fn detail(&self) -> String {
        match self {
            PipelineError::Io(e) => e.to_string(),
            PipelineError::Preprocess(PreprocessError::Load(e)) => e.to_string(),
            PipelineError::Preprocess(PreprocessError::Encode(msg)) => msg.clone(),
            PipelineError::Ocr(OcrError::ImageDecode(msg) | OcrError::Engine(msg)) => msg.clone(),
            PipelineError::Ocr(e @ OcrError::NotAvailable) => e.to_string(),
            PipelineError::Worker(msg) => msg.clone(),
        }
    }
}

/// Orchestrates: scratch file → preprocess → OCR → product extraction.
pub struct ReceiptPipeline<R: OcrBackend> {
    recognizer: R,
    extractor: ProductExtractor,
    scratch_dir: PathBuf,
    preprocess: bool,
}

impl<R: OcrBackend> ReceiptPipeline<R> {
    pub fn new(recognizer: R, extractor: ProductExtractor, scratch_dir: PathBuf) -> Self {
        Self { recognizer, extractor, scratch_dir, preprocess: true }
    }

    /// Toggle grayscale/contrast normalization before OCR (on by default).
    pub fn with_preprocessing(mut self, enabled: bool) -> Self {
        self.preprocess = enabled;
        self
    }

    /// Process raw upload bytes. Blocks for the duration of the OCR call.
    pub fn process_bytes(&self, data: &[u8], ext: &str) -> Result<ReceiptScan, PipelineError> {
        // 1. Park the upload on disk; removed when `scratch` drops.
        let mut scratch = ScratchImage::create_in(&self.scratch_dir, ext, data)?;

        // 2. Normalize for OCR.
        if self.preprocess {
            let png = preprocess::prepare_for_ocr_from_bytes(data)?;
            scratch.overwrite(&png)?;
        }

        // 3. Run OCR.
        let ocr_text = self.recognizer.recognize_file(scratch.path())?;

        // 4. Keep the lines that look like products.
        if tracing::enabled!(tracing::Level::DEBUG) {
            for (line, kind) in self.extractor.classify_lines(&ocr_text) {
                if !line.is_empty() {
                    tracing::debug!(%kind, line, "classified receipt line");
                }
            }
        }
        let products = self.extractor.extract(&ocr_text);

        Ok(ReceiptScan { ocr_text, products })
    }
}

impl<R: OcrBackend + 'static> ReceiptPipeline<R> {
    /// Run [`Self::process_bytes`] on the blocking pool.
    ///
    /// The work is not cancelled if the caller stops waiting for it.
    pub async fn process_upload(
        self: Arc<Self>,
        data: Vec<u8>,
        ext: String,
    ) -> Result<ReceiptScan, PipelineError> {
        tokio::task::spawn_blocking(move || self.process_bytes(&data, &ext))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
