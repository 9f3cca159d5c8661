//! Maintenance report and attachment records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::identity::RecordId;

/// A filed maintenance report
///
/// Exactly one report exists per work order; filing it is what transitions
/// the order to Completed. There is no edit path after creation.
/// `report_data` holds the structured document payload exactly as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceReport {
    /// Unique identifier
    pub id: RecordId,

    /// Owning work order
    pub work_order: RecordId,

    /// Equipment at the time of filing (denormalized from the work order)
    pub equipment: RecordId,

    /// Author
    pub craftsman: RecordId,

    /// Report timestamp
    pub report_date: DateTime<Utc>,

    /// Structured document payload
    pub report_data: serde_json::Value,

    /// Free-text comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// Row creation timestamp
    pub created_at: DateTime<Utc>,

    /// Row update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A file attached to a maintenance report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportAttachment {
    /// Unique identifier
    pub id: RecordId,

    /// Owning report
    pub report: RecordId,

    /// Original filename
    pub filename: String,

    /// Stored blob path, relative to the attachment store root
    pub file_path: PathBuf,

    /// Content type guessed from the extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,

    /// Size in bytes
    pub file_size: u64,

    /// SHA-256 of the stored content
    pub file_hash: String,

    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}
