use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Multipart field carrying the receipt image.
pub const RECEIPT_FIELD: &str = "receipt";

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

struct Upload {
    data: Vec<u8>,
    ext: String,
}

/// `POST /analyze/receipt`
#[tracing::instrument(skip_all, fields(upload_id = %Uuid::new_v4()))]
pub async fn upload_receipt(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProductsResponse>, ApiError> {
    // A request that is not multipart at all carries no file either.
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::MissingFile);
    };
    let upload = read_receipt_field(&mut multipart).await?.ok_or(ApiError::MissingFile)?;
    info!(bytes = upload.data.len(), ext = %upload.ext, "receipt received");

    let scan = state
        .pipeline
        .clone()
        .process_upload(upload.data, upload.ext)
        .await
        .map_err(|e| {
            warn!(error = %e, "receipt extraction failed");
            ApiError::from(e)
        })?;

    info!(products = scan.products.len(), "receipt extracted");
    Ok(Json(ProductsResponse { products: scan.products }))
}

/// First file part named `receipt`. Plain text parts never count as an upload,
/// even under that name. A zero-byte file is still an upload and fails in OCR.
async fn read_receipt_field(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RECEIPT_FIELD) || field.file_name().is_none() {
            continue;
        }
        let ext = upload_extension(field.file_name(), field.content_type());
        let data = field.bytes().await?;
        return Ok(Some(Upload { data: data.to_vec(), ext }));
    }
    Ok(None)
}

/// Extension from the client file name, falling back to the declared MIME type.
fn upload_extension(file_name: Option<&str>, content_type: Option<&str>) -> String {
    if let Some(ext) = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
    {
        return ext.to_lowercase();
    }
    match content_type {
        Some("image/jpeg") => "jpg",
        Some("image/png") => "png",
        Some("image/webp") => "webp",
        Some("image/tiff") => "tiff",
        Some("image/bmp") => "bmp",
        Some("image/gif") => "gif",
        _ => "bin",
    }
    .to_string()
}
