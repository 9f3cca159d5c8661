//! SQLite-backed relational store
//!
//! The store is the system of record for equipment, craftsmen, work orders,
//! maintenance reports, and attachment rows. Report payloads are stored as
//! opaque JSON in the `report_data` column; everything else is ordinary
//! columns. Attachment bytes live next to the database in the blob directory
//! (see [`crate::core::blob`]).

mod reports;
mod schema;
#[cfg(test)]
mod tests;

pub use reports::NewReport;

use std::fs;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::core::blob::{AttachmentError, AttachmentStore};
use crate::core::identity::{IdParseError, RecordId};
use crate::core::project::Project;
use crate::entities::{Craftsman, Equipment, WorkOrder, WorkOrderStatus};

/// Current schema version; opening a store written by a different version is
/// refused rather than migrated
const SCHEMA_VERSION: i32 = 1;

/// Count of records sharing a group value (status, category, ...)
#[derive(Debug, Clone, serde::Serialize)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("work order {work_order} already has a maintenance report")]
    DuplicateReport { work_order: String },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: WorkOrderStatus,
        to: WorkOrderStatus,
    },

    #[error("unsupported store schema version {found} (expected {expected})")]
    SchemaVersion { found: i32, expected: i32 },

    #[error("corrupt value in column {column}: '{value}'")]
    Corrupt { column: &'static str, value: String },

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("report payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Id(#[from] IdParseError),

    #[error("storage failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The relational store backed by SQLite
pub struct Store {
    conn: Connection,
    attachments: AttachmentStore,
}

impl Store {
    /// Open or create the store for a project
    pub fn open(project: &Project) -> Result<Self, StoreError> {
        let store_path = project.store_path();
        if let Some(parent) = store_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let needs_init = !store_path.exists();
        let conn = Connection::open(&store_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        let mut store = Self {
            conn,
            attachments: AttachmentStore::new(project.attachments_dir()),
        };

        if needs_init {
            store.init_schema()?;
        } else {
            let found: i32 = store
                .conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                })
                .unwrap_or(0);
            if found != SCHEMA_VERSION {
                return Err(StoreError::SchemaVersion {
                    found,
                    expected: SCHEMA_VERSION,
                });
            }
        }

        Ok(store)
    }

    /// The attachment blob store
    pub fn attachments(&self) -> &AttachmentStore {
        &self.attachments
    }

    // =========================================================================
    // Equipment
    // =========================================================================

    /// Insert an equipment record
    pub fn insert_equipment(&self, equipment: &Equipment) -> Result<(), StoreError> {
        self.conn.execute(
            r#"INSERT INTO equipment (
                id, name, manufacturer, model, serial_number, location,
                installation_date, status, category, custom_fields, created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
            params![
                equipment.id.to_string(),
                equipment.name,
                equipment.manufacturer,
                equipment.model,
                equipment.serial_number,
                equipment.location,
                equipment.installation_date.map(|d| d.to_string()),
                equipment.status,
                equipment.category,
                serde_json::to_string(&equipment.custom_fields)?,
                equipment.created.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get an equipment record by ID
    pub fn get_equipment(&self, id: &RecordId) -> Result<Equipment, StoreError> {
        self.conn
            .query_row(
                r#"SELECT id, name, manufacturer, model, serial_number, location,
                          installation_date, status, category, custom_fields, created
                   FROM equipment WHERE id = ?1"#,
                params![id.to_string()],
                EquipmentRow::from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                kind: "equipment",
                id: id.to_string(),
            })?
            .into_equipment()
    }

    /// List all equipment, oldest first
    pub fn list_equipment(&self) -> Result<Vec<Equipment>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, name, manufacturer, model, serial_number, location,
                      installation_date, status, category, custom_fields, created
               FROM equipment ORDER BY created"#,
        )?;
        let rows = stmt.query_map([], EquipmentRow::from_row)?;

        let mut equipment = Vec::new();
        for row in rows {
            equipment.push(row?.into_equipment()?);
        }
        Ok(equipment)
    }

    /// Persist an explicitly saved category tag (partial update)
    pub fn set_equipment_category(
        &self,
        id: &RecordId,
        category: &str,
    ) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE equipment SET category = ?1 WHERE id = ?2",
            params![category, id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "equipment",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Craftsmen
    // =========================================================================

    /// Insert a craftsman record
    pub fn insert_craftsman(&self, craftsman: &Craftsman) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO craftsmen (id, name, trade, created) VALUES (?1, ?2, ?3, ?4)",
            params![
                craftsman.id.to_string(),
                craftsman.name,
                craftsman.trade,
                craftsman.created.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a craftsman by ID
    pub fn get_craftsman(&self, id: &RecordId) -> Result<Craftsman, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, trade, created FROM craftsmen WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                kind: "craftsman",
                id: id.to_string(),
            })?;

        Ok(Craftsman {
            id: RecordId::from_str(&row.0)?,
            name: row.1,
            trade: row.2,
            created: parse_datetime("created", &row.3)?,
        })
    }

    /// List all craftsmen, oldest first
    pub fn list_craftsmen(&self) -> Result<Vec<Craftsman>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, trade, created FROM craftsmen ORDER BY created")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut craftsmen = Vec::new();
        for row in rows {
            let row = row?;
            craftsmen.push(Craftsman {
                id: RecordId::from_str(&row.0)?,
                name: row.1,
                trade: row.2,
                created: parse_datetime("created", &row.3)?,
            });
        }
        Ok(craftsmen)
    }

    // =========================================================================
    // Work orders
    // =========================================================================

    /// Insert a work order
    pub fn insert_work_order(&self, work_order: &WorkOrder) -> Result<(), StoreError> {
        self.conn.execute(
            r#"INSERT INTO work_orders (
                id, title, description, equipment_id, craftsman_id, priority,
                status, created, due_date, completed_date, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
            params![
                work_order.id.to_string(),
                work_order.title,
                work_order.description,
                work_order.equipment.as_ref().map(|id| id.to_string()),
                work_order.craftsman.as_ref().map(|id| id.to_string()),
                work_order.priority.to_string(),
                work_order.status.to_string(),
                work_order.created.to_rfc3339(),
                work_order.due_date.map(|d| d.to_string()),
                work_order.completed_date.map(|d| d.to_string()),
                work_order.notes,
            ],
        )?;
        Ok(())
    }

    /// Get a work order by ID
    pub fn get_work_order(&self, id: &RecordId) -> Result<WorkOrder, StoreError> {
        self.conn
            .query_row(
                r#"SELECT id, title, description, equipment_id, craftsman_id, priority,
                          status, created, due_date, completed_date, notes
                   FROM work_orders WHERE id = ?1"#,
                params![id.to_string()],
                WorkOrderRow::from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                kind: "work order",
                id: id.to_string(),
            })?
            .into_work_order()
    }

    /// List work orders, oldest first, optionally filtered by status
    pub fn list_work_orders(
        &self,
        status: Option<WorkOrderStatus>,
    ) -> Result<Vec<WorkOrder>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, title, description, equipment_id, craftsman_id, priority,
                      status, created, due_date, completed_date, notes
               FROM work_orders
               WHERE (?1 IS NULL OR status = ?1)
               ORDER BY created"#,
        )?;
        let rows = stmt.query_map(
            params![status.map(|s| s.to_string())],
            WorkOrderRow::from_row,
        )?;

        let mut work_orders = Vec::new();
        for row in rows {
            work_orders.push(row?.into_work_order()?);
        }
        Ok(work_orders)
    }

    /// Transition a work order to a new status
    ///
    /// Validates the transition, then updates only `status` and (when moving
    /// to Completed) `completed_date`. A regression away from Completed keeps
    /// the old completion date; re-completing overwrites it.
    pub fn update_work_order_status(
        &self,
        id: &RecordId,
        new_status: WorkOrderStatus,
    ) -> Result<WorkOrder, StoreError> {
        let work_order = self.get_work_order(id)?;

        if !work_order.status.can_transition_to(new_status) {
            return Err(StoreError::InvalidTransition {
                from: work_order.status,
                to: new_status,
            });
        }

        if new_status == WorkOrderStatus::Completed {
            self.conn.execute(
                "UPDATE work_orders SET status = ?1, completed_date = ?2 WHERE id = ?3",
                params![
                    new_status.to_string(),
                    Local::now().date_naive().to_string(),
                    id.to_string()
                ],
            )?;
        } else {
            self.conn.execute(
                "UPDATE work_orders SET status = ?1 WHERE id = ?2",
                params![new_status.to_string(), id.to_string()],
            )?;
        }

        self.get_work_order(id)
    }

    // =========================================================================
    // Aggregates for the status dashboard
    // =========================================================================

    /// Count rows in a table
    fn count_table(&self, table: &str) -> usize {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get::<_, i64>(0)
            })
            .unwrap_or(0) as usize
    }

    /// Total equipment records
    pub fn count_equipment(&self) -> usize {
        self.count_table("equipment")
    }

    /// Total craftsman records
    pub fn count_craftsmen(&self) -> usize {
        self.count_table("craftsmen")
    }

    /// Total maintenance reports
    pub fn count_reports(&self) -> usize {
        self.count_table("maintenance_reports")
    }

    /// Total attachment rows
    pub fn count_attachments(&self) -> usize {
        self.count_table("report_attachments")
    }

    /// Work order counts grouped by status
    pub fn work_order_counts_by_status(&self) -> Vec<GroupCount> {
        let mut stmt = match self.conn.prepare(
            "SELECT status, COUNT(*) as cnt FROM work_orders GROUP BY status ORDER BY cnt DESC",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let rows = match stmt.query_map([], |row| {
            Ok(GroupCount {
                group: row.get(0)?,
                count: row.get::<_, i64>(1)? as usize,
            })
        }) {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        rows.filter_map(|r| r.ok()).collect()
    }

    /// Open or in-progress work orders past their due date
    pub fn count_overdue_work_orders(&self) -> usize {
        self.conn
            .query_row(
                r#"SELECT COUNT(*) FROM work_orders
                   WHERE due_date IS NOT NULL
                     AND due_date < ?1
                     AND status NOT IN ('completed', 'cancelled')"#,
                params![Local::now().date_naive().to_string()],
                |row| row.get::<_, i64>(0),
            )
            .unwrap_or(0) as usize
    }
}

// Row helpers

struct EquipmentRow {
    id: String,
    name: String,
    manufacturer: Option<String>,
    model: Option<String>,
    serial_number: Option<String>,
    location: Option<String>,
    installation_date: Option<String>,
    status: Option<String>,
    category: Option<String>,
    custom_fields: String,
    created: String,
}

impl EquipmentRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            manufacturer: row.get(2)?,
            model: row.get(3)?,
            serial_number: row.get(4)?,
            location: row.get(5)?,
            installation_date: row.get(6)?,
            status: row.get(7)?,
            category: row.get(8)?,
            custom_fields: row.get(9)?,
            created: row.get(10)?,
        })
    }

    fn into_equipment(self) -> Result<Equipment, StoreError> {
        Ok(Equipment {
            id: RecordId::from_str(&self.id)?,
            name: self.name,
            manufacturer: self.manufacturer,
            model: self.model,
            serial_number: self.serial_number,
            location: self.location,
            installation_date: self
                .installation_date
                .map(|d| parse_date("installation_date", &d))
                .transpose()?,
            status: self.status,
            category: self.category,
            custom_fields: serde_json::from_str(&self.custom_fields)?,
            created: parse_datetime("created", &self.created)?,
        })
    }
}

struct WorkOrderRow {
    id: String,
    title: String,
    description: Option<String>,
    equipment_id: Option<String>,
    craftsman_id: Option<String>,
    priority: String,
    status: String,
    created: String,
    due_date: Option<String>,
    completed_date: Option<String>,
    notes: Option<String>,
}

impl WorkOrderRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            equipment_id: row.get(3)?,
            craftsman_id: row.get(4)?,
            priority: row.get(5)?,
            status: row.get(6)?,
            created: row.get(7)?,
            due_date: row.get(8)?,
            completed_date: row.get(9)?,
            notes: row.get(10)?,
        })
    }

    fn into_work_order(self) -> Result<WorkOrder, StoreError> {
        Ok(WorkOrder {
            id: RecordId::from_str(&self.id)?,
            title: self.title,
            description: self.description,
            equipment: self
                .equipment_id
                .map(|id| RecordId::from_str(&id))
                .transpose()?,
            craftsman: self
                .craftsman_id
                .map(|id| RecordId::from_str(&id))
                .transpose()?,
            priority: self.priority.parse().map_err(|_| StoreError::Corrupt {
                column: "priority",
                value: self.priority.clone(),
            })?,
            status: self.status.parse().map_err(|_| StoreError::Corrupt {
                column: "status",
                value: self.status.clone(),
            })?,
            created: parse_datetime("created", &self.created)?,
            due_date: self
                .due_date
                .map(|d| parse_date("due_date", &d))
                .transpose()?,
            completed_date: self
                .completed_date
                .map(|d| parse_date("completed_date", &d))
                .transpose()?,
            notes: self.notes,
        })
    }
}

/// Parse an RFC 3339 timestamp column
fn parse_datetime(column: &'static str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt {
            column,
            value: value.to_string(),
        })
}

/// Parse a YYYY-MM-DD date column
fn parse_date(column: &'static str, value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| StoreError::Corrupt {
        column,
        value: value.to_string(),
    })
}
