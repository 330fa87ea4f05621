use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Extracts plain text from PDF bytes.
///
/// Parsing is CPU-bound and `pdf-extract` can panic on malformed input,
/// so it runs on the blocking pool; a panic surfaces as a `JoinError`.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Extraction(format!("extraction task failed: {e}")))?
        .map_err(|e| AppError::Extraction(e.to_string()))?;

    debug!("Extracted {} characters of résumé text", text.len());
    Ok(text)
}
