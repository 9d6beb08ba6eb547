//! HTTP front end for the receipt scanner.

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use reloop_ocr::{
    FilterConfigError, KeywordClassifier, OcrBackend, ProductExtractor, ReceiptPipeline,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, LogFormat, OcrConfig, ServerConfig};
pub use error::ApiError;

pub type SharedPipeline = Arc<ReceiptPipeline<Box<dyn OcrBackend>>>;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: SharedPipeline,
}

impl AppState {
    pub fn new(pipeline: ReceiptPipeline<Box<dyn OcrBackend>>) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, FilterConfigError> {
        let classifier = KeywordClassifier::new(&config.filter)?;
        let pipeline = ReceiptPipeline::new(
            recognizer(&config.ocr),
            ProductExtractor::new(classifier),
            config.receipts_dir.clone(),
        )
        .with_preprocessing(config.ocr.preprocess);
        Ok(Self::new(pipeline))
    }
}

#[cfg(feature = "tesseract")]
fn recognizer(ocr: &OcrConfig) -> Box<dyn OcrBackend> {
    tracing::info!(lang = %ocr.lang, "using Tesseract OCR backend");
    Box::new(reloop_ocr::TesseractRecognizer::new(ocr.data_path.clone(), &ocr.lang))
}

#[cfg(not(feature = "tesseract"))]
fn recognizer(_ocr: &OcrConfig) -> Box<dyn OcrBackend> {
    tracing::warn!("built without the `tesseract` feature; receipt uploads will fail");
    Box::new(reloop_ocr::UnavailableRecognizer)
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/analyze/receipt", post(routes::upload_receipt))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
