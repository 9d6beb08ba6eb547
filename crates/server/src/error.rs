use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reloop_ocr::PipelineError;
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced to HTTP clients as `{"error": ..., "details": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("Invalid multipart body: {message}")]
    Multipart { status: StatusCode, message: String },
    #[error("OCR failed: {0}")]
    Extraction(#[from] PipelineError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::Multipart { status, .. } => *status,
            ApiError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::MissingFile => ErrorBody { error: "No file uploaded", details: None },
            ApiError::Multipart { message, .. } => {
                ErrorBody { error: "Invalid multipart body", details: Some(message.clone()) }
            }
            ApiError::Extraction(e) => ErrorBody { error: "OCR failed", details: Some(e.detail()) },
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Multipart { status: e.status(), message: e.body_text() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reloop_ocr::OcrError;

    #[test]
    fn missing_file_is_bad_request_without_details() {
        let e = ApiError::MissingFile;
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        let json = serde_json::to_value(e.body()).unwrap();
        assert_eq!(json, serde_json::json!({"error": "No file uploaded"}));
    }

    #[test]
    fn extraction_is_500_with_underlying_message() {
        let e = ApiError::from(PipelineError::Ocr(OcrError::Engine("leptonica exploded".into())));
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = e.body();
        assert_eq!(body.error, "OCR failed");
        assert_eq!(body.details.as_deref(), Some("leptonica exploded"));
    }

    #[test]
    fn multipart_keeps_its_status() {
        let e = ApiError::Multipart {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".into(),
        };
        assert_eq!(e.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(e.body().details.as_deref(), Some("length limit exceeded"));
    }
}
