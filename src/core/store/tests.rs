//! Store integration tests against a temp-dir project

use std::fs;

use chrono::{Local, NaiveDate};
use tempfile::{tempdir, TempDir};

use crate::core::project::Project;
use crate::entities::{Craftsman, Equipment, WorkOrder, WorkOrderStatus};
use crate::report::{Document, FormEngine};

use super::reports::NewReport;
use super::{Store, StoreError};

fn setup() -> (TempDir, Store, Equipment, Craftsman, WorkOrder) {
    let tmp = tempdir().unwrap();
    let project = Project::init(tmp.path()).unwrap();
    let store = Store::open(&project).unwrap();

    let mut equipment = Equipment::new("Feedwater pump".to_string());
    equipment.model = Some("FW-220".to_string());
    store.insert_equipment(&equipment).unwrap();

    let craftsman = Craftsman::new("Ada Fowler".to_string(), Some("millwright".to_string()));
    store.insert_craftsman(&craftsman).unwrap();

    let mut work_order = WorkOrder::new("Inspect feedwater pump".to_string());
    work_order.equipment = Some(equipment.id.clone());
    work_order.craftsman = Some(craftsman.id.clone());
    store.insert_work_order(&work_order).unwrap();

    (tmp, store, equipment, craftsman, work_order)
}

fn filled_document(
    work_order: &WorkOrder,
    equipment: &Equipment,
    craftsman: &Craftsman,
) -> Document {
    let mut engine = FormEngine::new(work_order, equipment, craftsman);
    engine
        .set_field("general", "maintenance_type", "Preventive")
        .unwrap();
    engine
        .set_field("inspection", "operational_vibration", "yes")
        .unwrap();
    engine.collect().unwrap()
}

#[test]
fn test_equipment_roundtrip() {
    let (_tmp, store, equipment, _, _) = setup();
    let loaded = store.get_equipment(&equipment.id).unwrap();
    assert_eq!(loaded.name, "Feedwater pump");
    assert_eq!(loaded.model.as_deref(), Some("FW-220"));
}

#[test]
fn test_missing_record_is_not_found() {
    let (_tmp, store, _, _, _) = setup();
    let missing = crate::core::identity::RecordId::new(crate::core::identity::RecordPrefix::Eq);
    let err = store.get_equipment(&missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: "equipment", .. }));
}

#[test]
fn test_status_transition_validation() {
    let (_tmp, store, _, _, work_order) = setup();

    // Open -> Completed is not a legal manual transition
    let err = store
        .update_work_order_status(&work_order.id, WorkOrderStatus::Completed)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransition { .. }));

    let updated = store
        .update_work_order_status(&work_order.id, WorkOrderStatus::InProgress)
        .unwrap();
    assert_eq!(updated.status, WorkOrderStatus::InProgress);
    assert!(updated.completed_date.is_none());
}

#[test]
fn test_completed_date_is_sticky_across_regression() {
    let (_tmp, store, _, _, work_order) = setup();

    store
        .update_work_order_status(&work_order.id, WorkOrderStatus::InProgress)
        .unwrap();
    let completed = store
        .update_work_order_status(&work_order.id, WorkOrderStatus::Completed)
        .unwrap();
    let completion_date = completed.completed_date.unwrap();
    assert_eq!(completion_date, Local::now().date_naive());

    // Rework: back to in_progress keeps the last completion date
    let reworked = store
        .update_work_order_status(&work_order.id, WorkOrderStatus::InProgress)
        .unwrap();
    assert_eq!(reworked.status, WorkOrderStatus::InProgress);
    assert_eq!(reworked.completed_date, Some(completion_date));
}

#[test]
fn test_create_report_completes_work_order() {
    let (_tmp, mut store, equipment, craftsman, work_order) = setup();
    let document = filled_document(&work_order, &equipment, &craftsman);

    let report = store
        .create_report(NewReport {
            work_order: &work_order.id,
            equipment: &equipment.id,
            craftsman: &craftsman.id,
            document: &document,
            comments: Some("Routine service"),
            attachments: &[],
        })
        .unwrap();

    assert!(report.id.to_string().starts_with("RPT-"));
    assert_eq!(report.comments.as_deref(), Some("Routine service"));

    let completed = store.get_work_order(&work_order.id).unwrap();
    assert_eq!(completed.status, WorkOrderStatus::Completed);
    assert_eq!(completed.completed_date, Some(Local::now().date_naive()));

    // Payload survives storage and still parses as a document
    let loaded = store.get_report(&report.id).unwrap();
    let parsed: Document = serde_json::from_value(loaded.report_data).unwrap();
    assert_eq!(parsed.metadata.work_order_id, work_order.id.to_string());
}

#[test]
fn test_report_on_completed_order_keeps_completion_date() {
    let (_tmp, store, equipment, craftsman, _) = setup();

    let old_date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
    let mut work_order = WorkOrder::new("Previously completed".to_string());
    work_order.equipment = Some(equipment.id.clone());
    work_order.status = WorkOrderStatus::Completed;
    work_order.completed_date = Some(old_date);
    store.insert_work_order(&work_order).unwrap();

    let document = filled_document(&work_order, &equipment, &craftsman);
    let mut store = store;
    store
        .create_report(NewReport {
            work_order: &work_order.id,
            equipment: &equipment.id,
            craftsman: &craftsman.id,
            document: &document,
            comments: None,
            attachments: &[],
        })
        .unwrap();

    let loaded = store.get_work_order(&work_order.id).unwrap();
    assert_eq!(loaded.status, WorkOrderStatus::Completed);
    assert_eq!(loaded.completed_date, Some(old_date));
}

#[test]
fn test_duplicate_report_is_rejected_atomically() {
    let (_tmp, mut store, equipment, craftsman, work_order) = setup();
    let document = filled_document(&work_order, &equipment, &craftsman);

    store
        .create_report(NewReport {
            work_order: &work_order.id,
            equipment: &equipment.id,
            craftsman: &craftsman.id,
            document: &document,
            comments: None,
            attachments: &[],
        })
        .unwrap();

    // Send the order back to rework; its completion date must survive
    let reworked = store
        .update_work_order_status(&work_order.id, WorkOrderStatus::InProgress)
        .unwrap();
    assert!(reworked.completed_date.is_some());

    let err = store
        .create_report(NewReport {
            work_order: &work_order.id,
            equipment: &equipment.id,
            craftsman: &craftsman.id,
            document: &document,
            comments: None,
            attachments: &[],
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateReport { .. }));

    // Exactly one row, and the rejected submission re-triggered no side effect
    assert_eq!(store.count_reports(), 1);
    let after = store.get_work_order(&work_order.id).unwrap();
    assert_eq!(after.status, WorkOrderStatus::InProgress);
}

#[test]
fn test_report_with_attachments() {
    let (tmp, mut store, equipment, craftsman, work_order) = setup();
    let document = filled_document(&work_order, &equipment, &craftsman);

    let photo = tmp.path().join("bearing_wear.jpg");
    fs::write(&photo, b"jpeg bytes").unwrap();

    let report = store
        .create_report(NewReport {
            work_order: &work_order.id,
            equipment: &equipment.id,
            craftsman: &craftsman.id,
            document: &document,
            comments: None,
            attachments: &[photo],
        })
        .unwrap();

    let attachments = store.list_attachments(&report.id).unwrap();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].filename, "bearing_wear.jpg");
    assert_eq!(attachments[0].file_type.as_deref(), Some("image/jpeg"));
    assert_eq!(attachments[0].file_size, 10);
    assert_eq!(attachments[0].file_hash.len(), 64);
    assert!(store
        .attachments()
        .root()
        .join(&attachments[0].file_path)
        .is_file());
}

#[test]
fn test_get_report_for_work_order() {
    let (_tmp, mut store, equipment, craftsman, work_order) = setup();
    assert!(store
        .get_report_for_work_order(&work_order.id)
        .unwrap()
        .is_none());

    let document = filled_document(&work_order, &equipment, &craftsman);
    let report = store
        .create_report(NewReport {
            work_order: &work_order.id,
            equipment: &equipment.id,
            craftsman: &craftsman.id,
            document: &document,
            comments: None,
            attachments: &[],
        })
        .unwrap();

    let found = store
        .get_report_for_work_order(&work_order.id)
        .unwrap()
        .unwrap();
    assert_eq!(found.id, report.id);
    assert_eq!(store.list_reports().unwrap().len(), 1);
}

#[test]
fn test_dashboard_counts() {
    let (_tmp, mut store, equipment, craftsman, work_order) = setup();
    assert_eq!(store.count_equipment(), 1);
    assert_eq!(store.count_craftsmen(), 1);
    assert_eq!(store.count_reports(), 0);

    let mut overdue = WorkOrder::new("Late job".to_string());
    overdue.due_date = Some(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    store.insert_work_order(&overdue).unwrap();
    assert_eq!(store.count_overdue_work_orders(), 1);

    let document = filled_document(&work_order, &equipment, &craftsman);
    store
        .create_report(NewReport {
            work_order: &work_order.id,
            equipment: &equipment.id,
            craftsman: &craftsman.id,
            document: &document,
            comments: None,
            attachments: &[],
        })
        .unwrap();

    let by_status = store.work_order_counts_by_status();
    let completed = by_status
        .iter()
        .find(|g| g.group == "completed")
        .map(|g| g.count)
        .unwrap_or(0);
    assert_eq!(completed, 1);
}
