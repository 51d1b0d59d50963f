//! Bulletin text extraction.

use std::path::Path;

use crate::error::{MonitorError, Result};

/// Extract the text of a downloaded bulletin.
///
/// Parsing is CPU-bound, so it runs on the blocking pool. A missing or
/// malformed file surfaces as [`MonitorError::Parse`]; the caller decides
/// whether that aborts anything.
pub async fn extract_text(path: &Path) -> Result<String> {
    let owned = path.to_owned();

    tokio::task::spawn_blocking(move || pdf_extract::extract_text(&owned))
        .await
        .map_err(|e| MonitorError::Parse(format!("extraction task failed: {e}")))?
        .map_err(|e| MonitorError::Parse(format!("unreadable PDF {}: {e}", path.display())))
}
