//! Upload validation and stored file naming.

use crate::error::CoreError;

/// Default maximum upload size (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// File extensions accepted for printing.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Content types accepted when the client declares one.
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "application/octet-stream",
];

/// Fallback used when sanitising strips every character of a filename.
const FALLBACK_FILENAME: &str = "upload";

/// Lowercased extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Validate an uploaded document before anything touches the disk.
pub fn validate_upload(
    filename: &str,
    content_type: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<(), CoreError> {
    if filename.trim().is_empty() {
        return Err(CoreError::Validation("No file selected".into()));
    }

    let ext = extension_of(filename).ok_or_else(|| {
        CoreError::Validation(format!("File '{filename}' has no extension"))
    })?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported file type '.{ext}'. Supported: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    if let Some(content_type) = content_type {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&essence.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unsupported content type '{essence}'"
            )));
        }
    }

    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "File exceeds the maximum size of {max_bytes} bytes"
        )));
    }

    Ok(())
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Directory components are dropped and every character outside
/// `[A-Za-z0-9._-]` is replaced with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Name under which an upload is stored inside the upload directory.
pub fn stored_file_name(token: &str, filename: &str) -> String {
    format!("{token}_{}", sanitize_filename(filename))
}
