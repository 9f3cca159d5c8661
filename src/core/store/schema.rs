//! Database schema initialization

use rusqlite::params;

use super::{Store, StoreError, SCHEMA_VERSION};

impl Store {
    /// Initialize database schema
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Equipment registry
            CREATE TABLE IF NOT EXISTS equipment (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                manufacturer TEXT,
                model TEXT,
                serial_number TEXT,
                location TEXT,
                installation_date TEXT,
                status TEXT,
                category TEXT,
                custom_fields TEXT NOT NULL DEFAULT '{}',
                created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_equipment_category ON equipment(category);

            -- Craftsmen
            CREATE TABLE IF NOT EXISTS craftsmen (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                trade TEXT,
                created TEXT NOT NULL
            );

            -- Work orders
            CREATE TABLE IF NOT EXISTS work_orders (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                equipment_id TEXT REFERENCES equipment(id) ON DELETE SET NULL,
                craftsman_id TEXT REFERENCES craftsmen(id) ON DELETE SET NULL,
                priority TEXT NOT NULL,
                status TEXT NOT NULL,
                created TEXT NOT NULL,
                due_date TEXT,
                completed_date TEXT,
                notes TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_work_orders_status ON work_orders(status);
            CREATE INDEX IF NOT EXISTS idx_work_orders_equipment ON work_orders(equipment_id);
            CREATE INDEX IF NOT EXISTS idx_work_orders_craftsman ON work_orders(craftsman_id);

            -- Maintenance reports; the UNIQUE constraint on work_order_id is
            -- the duplicate-report guard
            CREATE TABLE IF NOT EXISTS maintenance_reports (
                id TEXT PRIMARY KEY,
                work_order_id TEXT NOT NULL UNIQUE
                    REFERENCES work_orders(id) ON DELETE CASCADE,
                equipment_id TEXT NOT NULL,
                craftsman_id TEXT NOT NULL,
                report_date TEXT NOT NULL,
                report_data TEXT NOT NULL,
                comments TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_reports_craftsman
                ON maintenance_reports(craftsman_id);
            CREATE INDEX IF NOT EXISTS idx_reports_equipment
                ON maintenance_reports(equipment_id);

            -- Report attachments
            CREATE TABLE IF NOT EXISTS report_attachments (
                id TEXT PRIMARY KEY,
                report_id TEXT NOT NULL
                    REFERENCES maintenance_reports(id) ON DELETE CASCADE,
                filename TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_type TEXT,
                file_size INTEGER NOT NULL,
                file_hash TEXT NOT NULL,
                uploaded_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_attachments_report
                ON report_attachments(report_id);
            "#,
        )?;

        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }
}
