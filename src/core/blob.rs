//! Attachment blob storage
//!
//! Attachment bytes live under `.mrt/attachments/<report-id>/`, outside the
//! SQLite store. Blobs are written before the report transaction commits, so
//! a failed commit can leave an orphaned file behind; that is tolerated and
//! never auto-cleaned.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::RecordId;

/// A staged attachment blob, ready to be recorded in the store
#[derive(Debug, Clone)]
pub struct StagedAttachment {
    /// Original filename
    pub filename: String,
    /// Stored path, relative to the attachment store root
    pub stored_path: PathBuf,
    /// Content type guessed from the extension
    pub content_type: Option<String>,
    /// Size in bytes
    pub size: u64,
    /// SHA-256 of the content
    pub sha256: String,
}

/// Errors from blob operations
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("attachment file not found: {0}")]
    Missing(PathBuf),

    #[error("attachment has no usable filename: {0}")]
    BadFilename(PathBuf),

    #[error("failed to store attachment {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Filesystem-backed attachment storage rooted at `.mrt/attachments/`
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    /// Open the store at the given root directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the store root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy a source file into the blob directory for the given report
    pub fn stage(
        &self,
        report_id: &RecordId,
        source: &Path,
    ) -> Result<StagedAttachment, AttachmentError> {
        if !source.is_file() {
            return Err(AttachmentError::Missing(source.to_path_buf()));
        }

        let filename = source
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| AttachmentError::BadFilename(source.to_path_buf()))?;

        let content = fs::read(source).map_err(|source_err| AttachmentError::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&content);
        let sha256 = format!("{:x}", hasher.finalize());

        let relative = Path::new(&report_id.to_string()).join(&filename);
        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source_err| AttachmentError::Io {
                path: target.clone(),
                source: source_err,
            })?;
        }
        fs::write(&target, &content).map_err(|source_err| AttachmentError::Io {
            path: target.clone(),
            source: source_err,
        })?;

        Ok(StagedAttachment {
            content_type: content_type_for(&filename).map(String::from),
            size: content.len() as u64,
            sha256,
            filename,
            stored_path: relative,
        })
    }

    /// Total bytes stored, for the status dashboard
    pub fn total_size(&self) -> u64 {
        walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum()
    }
}

/// Guess a content type from the filename extension
fn content_type_for(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "pdf" => Some("application/pdf"),
        "txt" | "log" => Some("text/plain"),
        "csv" => Some("text/csv"),
        "doc" => Some("application/msword"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => None,
    }
}
