//! Document upload and management endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::config::{extension_of, UploadConfig};
use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::DocumentMetadata;

/// POST /upload - Upload and index one file (multipart field `file`)
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentMetadata>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::validation("Uploaded file has no filename"))?;
        let content_type = field.content_type().unwrap_or("").to_string();

        // Reject by extension before reading the body
        validate_upload(&state.config().upload, &filename, 0)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::validation(format!("Failed to read file: {}", e)))?;
        validate_upload(&state.config().upload, &filename, data.len())?;

        tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());
        let metadata = state
            .processor()
            .process_document(&filename, &content_type, &data)
            .await;
        return Ok(Json(metadata));
    }

    Err(Error::validation("Missing multipart field 'file'"))
}

/// Check extension and size limits for an upload
pub fn validate_upload(config: &UploadConfig, filename: &str, size: usize) -> Result<()> {
    if !config.is_allowed(filename) {
        let ext = extension_of(filename).unwrap_or_default();
        return Err(Error::validation(format!(
            "File type {} not supported. Allowed types: {}",
            if ext.is_empty() { "(none)" } else { ext.as_str() },
            config.allowed_extensions.join(", ")
        )));
    }

    if size > config.max_file_size {
        return Err(Error::validation(format!(
            "File too large. Maximum size: {:.1}MB",
            config.max_file_size as f64 / (1024.0 * 1024.0)
        )));
    }

    Ok(())
}

/// GET /documents - List indexed documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<DocumentMetadata>>> {
    let documents = state.processor().list_documents().await?;
    Ok(Json(documents))
}

/// DELETE /documents/:filename - Delete a document and all its chunks
pub async fn delete_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>> {
    let removed = state.processor().delete_document(&filename).await?;

    Ok(Json(json!({
        "message": format!("Document '{}' deleted successfully", filename),
        "chunks_removed": removed,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload() {
        let config = UploadConfig::default();
        assert!(validate_upload(&config, "manual.pdf", 1024).is_ok());
        assert!(validate_upload(&config, "sheet.XLSX", config.max_file_size).is_ok());

        let err = validate_upload(&config, "deck.pptx", 10).unwrap_err();
        assert!(err.to_string().starts_with("File type .pptx not supported"));

        let err = validate_upload(&config, "big.txt", config.max_file_size + 1).unwrap_err();
        assert_eq!(err.to_string(), "File too large. Maximum size: 10.0MB");
    }
}
