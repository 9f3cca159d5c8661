//! Maintenance report persistence
//!
//! Filing a report is one SQLite transaction: insert the report row, insert
//! any attachment rows, and complete the owning work order. The UNIQUE
//! constraint on `maintenance_reports.work_order_id` rejects a second report
//! even under concurrent submission; there is no read-then-check. Attachment
//! bytes are copied into the blob directory before the transaction, so a
//! failed commit can orphan a file (tolerated, never auto-cleaned).

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Local, Utc};
use rusqlite::{params, OptionalExtension};

use crate::core::identity::{RecordId, RecordPrefix};
use crate::entities::{MaintenanceReport, ReportAttachment, WorkOrderStatus};
use crate::report::Document;

use super::{parse_datetime, Store, StoreError};

/// Inputs for filing a report
pub struct NewReport<'a> {
    pub work_order: &'a RecordId,
    pub equipment: &'a RecordId,
    pub craftsman: &'a RecordId,
    pub document: &'a Document,
    pub comments: Option<&'a str>,
    /// Source paths of files to attach
    pub attachments: &'a [PathBuf],
}

impl Store {
    /// File a maintenance report and complete its work order
    pub fn create_report(&mut self, new: NewReport<'_>) -> Result<MaintenanceReport, StoreError> {
        let work_order = self.get_work_order(new.work_order)?;

        let report_id = RecordId::new(RecordPrefix::Rpt);
        let now = Utc::now();
        let payload = serde_json::to_value(new.document)?;
        let payload_text = serde_json::to_string(&payload)?;

        // Blob writes happen outside the transaction
        let mut staged = Vec::with_capacity(new.attachments.len());
        for source in new.attachments {
            staged.push(self.attachments.stage(&report_id, source)?);
        }

        let tx = self.conn.transaction()?;

        tx.execute(
            r#"INSERT INTO maintenance_reports (
                id, work_order_id, equipment_id, craftsman_id, report_date,
                report_data, comments, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                report_id.to_string(),
                new.work_order.to_string(),
                new.equipment.to_string(),
                new.craftsman.to_string(),
                now.to_rfc3339(),
                payload_text,
                new.comments,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(inner, _)
                if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::DuplicateReport {
                    work_order: new.work_order.to_string(),
                }
            }
            other => StoreError::Sqlite(other),
        })?;

        for attachment in &staged {
            tx.execute(
                r#"INSERT INTO report_attachments (
                    id, report_id, filename, file_path, file_type, file_size,
                    file_hash, uploaded_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
                params![
                    RecordId::new(RecordPrefix::Att).to_string(),
                    report_id.to_string(),
                    attachment.filename,
                    attachment.stored_path.to_string_lossy(),
                    attachment.content_type,
                    attachment.size as i64,
                    attachment.sha256,
                    now.to_rfc3339(),
                ],
            )?;
        }

        // Complete the work order; an already-completed order keeps its date
        if work_order.status != WorkOrderStatus::Completed {
            tx.execute(
                "UPDATE work_orders SET status = ?1, completed_date = ?2 WHERE id = ?3",
                params![
                    WorkOrderStatus::Completed.to_string(),
                    Local::now().date_naive().to_string(),
                    new.work_order.to_string(),
                ],
            )?;
        }

        tx.commit()?;

        Ok(MaintenanceReport {
            id: report_id,
            work_order: new.work_order.clone(),
            equipment: new.equipment.clone(),
            craftsman: new.craftsman.clone(),
            report_date: now,
            report_data: payload,
            comments: new.comments.map(String::from),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a report by ID
    pub fn get_report(&self, id: &RecordId) -> Result<MaintenanceReport, StoreError> {
        self.conn
            .query_row(
                r#"SELECT id, work_order_id, equipment_id, craftsman_id, report_date,
                          report_data, comments, created_at, updated_at
                   FROM maintenance_reports WHERE id = ?1"#,
                params![id.to_string()],
                ReportRow::from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                kind: "report",
                id: id.to_string(),
            })?
            .into_report()
    }

    /// Get the report filed against a work order, if any
    pub fn get_report_for_work_order(
        &self,
        work_order: &RecordId,
    ) -> Result<Option<MaintenanceReport>, StoreError> {
        self.conn
            .query_row(
                r#"SELECT id, work_order_id, equipment_id, craftsman_id, report_date,
                          report_data, comments, created_at, updated_at
                   FROM maintenance_reports WHERE work_order_id = ?1"#,
                params![work_order.to_string()],
                ReportRow::from_row,
            )
            .optional()?
            .map(ReportRow::into_report)
            .transpose()
    }

    /// List all reports, oldest first
    pub fn list_reports(&self) -> Result<Vec<MaintenanceReport>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, work_order_id, equipment_id, craftsman_id, report_date,
                      report_data, comments, created_at, updated_at
               FROM maintenance_reports ORDER BY created_at"#,
        )?;
        let rows = stmt.query_map([], ReportRow::from_row)?;

        let mut reports = Vec::new();
        for row in rows {
            reports.push(row?.into_report()?);
        }
        Ok(reports)
    }

    /// List the attachments of a report, oldest first
    pub fn list_attachments(
        &self,
        report: &RecordId,
    ) -> Result<Vec<ReportAttachment>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, report_id, filename, file_path, file_type, file_size,
                      file_hash, uploaded_at
               FROM report_attachments WHERE report_id = ?1 ORDER BY uploaded_at"#,
        )?;
        let rows = stmt.query_map(params![report.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut attachments = Vec::new();
        for row in rows {
            let row = row?;
            attachments.push(ReportAttachment {
                id: RecordId::from_str(&row.0)?,
                report: RecordId::from_str(&row.1)?,
                filename: row.2,
                file_path: PathBuf::from(row.3),
                file_type: row.4,
                file_size: row.5 as u64,
                file_hash: row.6,
                uploaded_at: parse_datetime("uploaded_at", &row.7)?,
            });
        }
        Ok(attachments)
    }
}

struct ReportRow {
    id: String,
    work_order_id: String,
    equipment_id: String,
    craftsman_id: String,
    report_date: String,
    report_data: String,
    comments: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ReportRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            work_order_id: row.get(1)?,
            equipment_id: row.get(2)?,
            craftsman_id: row.get(3)?,
            report_date: row.get(4)?,
            report_data: row.get(5)?,
            comments: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_report(self) -> Result<MaintenanceReport, StoreError> {
        Ok(MaintenanceReport {
            id: RecordId::from_str(&self.id)?,
            work_order: RecordId::from_str(&self.work_order_id)?,
            equipment: RecordId::from_str(&self.equipment_id)?,
            craftsman: RecordId::from_str(&self.craftsman_id)?,
            report_date: parse_datetime("report_date", &self.report_date)?,
            report_data: serde_json::from_str(&self.report_data)?,
            comments: self.comments,
            created_at: parse_datetime("created_at", &self.created_at)?,
            updated_at: parse_datetime("updated_at", &self.updated_at)?,
        })
    }
}
