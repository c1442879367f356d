use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::debug;

/// Stored name for the reference resume that defines the required skills.
pub const MODEL_RESUME_FILE: &str = "model_resume.pdf";

/// A file part of the multipart form, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied name; folder uploads include the relative sub-path.
    pub file_name: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn is_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
    }
}

/// Normalises a client file name into a path relative to the upload directory.
///
/// Backslashes count as separators. Empty, `.` and `..` components and
/// drive prefixes (`C:`) are dropped, so the result never leaves the upload
/// directory. Returns `None` when nothing usable is left.
pub fn sanitize_relative_path(file_name: &str) -> Option<PathBuf> {
    let normalized = file_name.replace('\\', "/");
    let parts: Vec<&str> = normalized
        .split('/')
        .filter(|part| !matches!(*part, "" | "." | ".."))
        .filter(|part| !part.ends_with(':'))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.iter().collect())
    }
}

/// Writes an upload below `upload_dir`, creating sub-folders as needed.
pub async fn save_upload(upload_dir: &Path, relative: &Path, data: &[u8]) -> Result<PathBuf> {
    let target = upload_dir.join(relative);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create upload folder {}", parent.display()))?;
    }
    tokio::fs::write(&target, data)
        .await
        .with_context(|| format!("Failed to store upload {}", target.display()))?;

    debug!("Stored {} bytes at {}", data.len(), target.display());
    Ok(target)
}
