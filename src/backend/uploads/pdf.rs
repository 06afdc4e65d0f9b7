//! PDF inspection
//!
//! Only the page count is extracted. Parsing runs on the blocking pool, and
//! a document lopdf cannot read is recorded with zero pages instead of
//! failing the upload.

use std::path::{Path, PathBuf};

/// MIME type accepted for uploads
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Whether a declared content type is a PDF (parameters ignored)
pub fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Count pages of a PDF on disk, returning 0 when it cannot be parsed
pub async fn count_pages(path: &Path) -> i64 {
    let path: PathBuf = path.to_path_buf();
    let path_display = path.display().to_string();
    let result = tokio::task::spawn_blocking(move || {
        lopdf::Document::load(&path).map(|doc| doc.get_pages().len() as i64)
    })
    .await;

    match result {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            tracing::warn!("Could not parse PDF {} for page count: {}", path_display, e);
            0
        }
        Err(e) => {
            tracing::warn!("Page count task failed for {}: {}", path_display, e);
            0
        }
    }
}
