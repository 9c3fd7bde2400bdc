//! Upload directory management.
//!
//! Files are written as `<token>_<sanitized name>` directly under the
//! configured upload directory.

use std::path::{Path, PathBuf};

use tokenprint_core::error::CoreError;
use tokenprint_core::upload::stored_file_name;

/// Write an uploaded document to `upload_dir`, returning its path.
pub async fn save_upload(
    upload_dir: &Path,
    token: &str,
    filename: &str,
    data: &[u8],
) -> Result<PathBuf, CoreError> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| CoreError::Storage(format!("Failed to create upload dir: {e}")))?;

    let path = upload_dir.join(stored_file_name(token, filename));
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| CoreError::Storage(format!("Failed to write {}: {e}", path.display())))?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "Stored upload");
    Ok(path)
}

/// Remove a stored upload whose job row could not be created.
///
/// Failures are logged, not returned: the caller is already reporting an error.
pub async fn discard_upload(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove orphaned upload");
    }
}
