//! Integration tests for the MRT CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get an mrt command
fn mrt() -> Command {
    Command::cargo_bin("mrt").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    mrt().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Extract the first word with the given prefix from command output
fn extract_id(output: &std::process::Output, prefix: &str) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .find(|w| w.starts_with(prefix))
        .map(|s| s.trim_end_matches("...").to_string())
        .unwrap_or_default()
}

/// Helper to register a piece of equipment, returning its ID
fn create_equipment(tmp: &TempDir, name: &str) -> String {
    let output = mrt()
        .current_dir(tmp.path())
        .args(["equipment", "new", "--name", name])
        .output()
        .unwrap();
    extract_id(&output, "EQ-")
}

/// Helper to add a craftsman, returning their ID
fn create_craftsman(tmp: &TempDir, name: &str) -> String {
    let output = mrt()
        .current_dir(tmp.path())
        .args(["craftsman", "new", "--name", name])
        .output()
        .unwrap();
    extract_id(&output, "CM-")
}

/// Helper to open a work order against equipment, returning its ID
fn create_work_order(tmp: &TempDir, title: &str, equipment_id: &str) -> String {
    let output = mrt()
        .current_dir(tmp.path())
        .args(["wo", "new", "--title", title, "--equipment", equipment_id])
        .output()
        .unwrap();
    extract_id(&output, "WO-")
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    mrt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("maintenance reports"));
}

#[test]
fn test_version_displays() {
    mrt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mrt"));
}

#[test]
fn test_unknown_command_fails() {
    mrt()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    mrt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".mrt/config.yaml").is_file());
    assert!(tmp.path().join(".mrt/store.db").is_file());
    assert!(tmp.path().join(".mrt/attachments").is_dir());
}

#[test]
fn test_init_twice_is_noop() {
    let tmp = setup_test_project();
    mrt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();
    mrt()
        .current_dir(tmp.path())
        .args(["wo", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an MRT project"));
}

// ============================================================================
// Equipment Tests
// ============================================================================

#[test]
fn test_equipment_new_and_list() {
    let tmp = setup_test_project();
    let id = create_equipment(&tmp, "Coolant Pump 3");
    assert!(id.starts_with("EQ-"));

    mrt()
        .current_dir(tmp.path())
        .args(["equipment", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coolant Pump 3"));

    mrt()
        .current_dir(tmp.path())
        .args(["equipment", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn test_equipment_show_yaml() {
    let tmp = setup_test_project();
    let id = create_equipment(&tmp, "Air Handler");

    mrt()
        .current_dir(tmp.path())
        .args(["equipment", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: Air Handler"));
}

#[test]
fn test_equipment_classify_by_keyword() {
    let tmp = setup_test_project();
    let id = create_equipment(&tmp, "Main breaker cabinet");

    mrt()
        .current_dir(tmp.path())
        .args(["equipment", "classify", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("electrical"));
}

#[test]
fn test_equipment_classify_defaults_to_mechanical() {
    let tmp = setup_test_project();
    let id = create_equipment(&tmp, "Mystery asset");

    mrt()
        .current_dir(tmp.path())
        .args(["equipment", "classify", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("mechanical"));
}

#[test]
fn test_equipment_classify_save_persists_tag() {
    let tmp = setup_test_project();
    let id = create_equipment(&tmp, "Rooftop chiller");

    mrt()
        .current_dir(tmp.path())
        .args(["equipment", "classify", &id, "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hvac"));

    mrt()
        .current_dir(tmp.path())
        .args(["equipment", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("category: hvac"));
}

// ============================================================================
// Work Order Tests
// ============================================================================

#[test]
fn test_wo_new_and_show() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Feedwater pump");
    let wo = create_work_order(&tmp, "Quarterly inspection", &eq);
    assert!(wo.starts_with("WO-"));

    mrt()
        .current_dir(tmp.path())
        .args(["wo", "show", &wo])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: open"));
}

#[test]
fn test_wo_status_transition() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Feedwater pump");
    let wo = create_work_order(&tmp, "Quarterly inspection", &eq);

    mrt()
        .current_dir(tmp.path())
        .args(["wo", "status", &wo, "in-progress"])
        .assert()
        .success();

    mrt()
        .current_dir(tmp.path())
        .args(["wo", "show", &wo])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: in_progress"));
}

#[test]
fn test_wo_invalid_transition_rejected() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Feedwater pump");
    let wo = create_work_order(&tmp, "Quarterly inspection", &eq);

    // Open -> Completed is not a legal manual transition
    mrt()
        .current_dir(tmp.path())
        .args(["wo", "status", &wo, "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status transition"));
}

#[test]
fn test_wo_list_filters_by_status() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Feedwater pump");
    create_work_order(&tmp, "First job", &eq);
    let second = create_work_order(&tmp, "Second job", &eq);

    mrt()
        .current_dir(tmp.path())
        .args(["wo", "status", &second, "on-hold"])
        .assert()
        .success();

    mrt()
        .current_dir(tmp.path())
        .args(["wo", "list", "--status", "on-hold", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));
}

// ============================================================================
// Report Tests
// ============================================================================

fn file_report(tmp: &TempDir, wo: &str, cm: &str) -> std::process::Output {
    mrt()
        .current_dir(tmp.path())
        .args([
            "report",
            "new",
            wo,
            "--craftsman",
            cm,
            "--set",
            "general.maintenance_type=Preventive",
            "--set",
            "inspection.operational_vibration=yes",
            "--comments",
            "Routine service",
        ])
        .output()
        .unwrap()
}

#[test]
fn test_report_new_completes_work_order() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Main breaker cabinet");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Breaker check", &eq);

    let output = file_report(&tmp, &wo, &cm);
    assert!(output.status.success());
    let rpt = extract_id(&output, "RPT-");
    assert!(rpt.starts_with("RPT-"));

    mrt()
        .current_dir(tmp.path())
        .args(["wo", "show", &wo])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: completed"))
        .stdout(predicate::str::contains("completed_date:"));
}

#[test]
fn test_report_duplicate_rejected() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Main breaker cabinet");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Breaker check", &eq);

    assert!(file_report(&tmp, &wo, &cm).status.success());

    mrt()
        .current_dir(tmp.path())
        .args([
            "report",
            "new",
            &wo,
            "--craftsman",
            &cm,
            "--set",
            "general.maintenance_type=Corrective",
            "--set",
            "inspection.visual_leaks=yes",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already has report"));

    mrt()
        .current_dir(tmp.path())
        .args(["report", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));
}

#[test]
fn test_report_missing_maintenance_type_blocks() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Main breaker cabinet");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Breaker check", &eq);

    mrt()
        .current_dir(tmp.path())
        .args(["report", "new", &wo, "--craftsman", &cm, "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"));

    // Nothing was filed and the work order did not move
    mrt()
        .current_dir(tmp.path())
        .args(["wo", "show", &wo])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: open"));
}

#[test]
fn test_report_unchecked_inspection_needs_confirmation() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Main breaker cabinet");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Breaker check", &eq);

    // Corrective work, no checklist items: blocked pending confirmation
    mrt()
        .current_dir(tmp.path())
        .args([
            "report",
            "new",
            &wo,
            "--craftsman",
            &cm,
            "--set",
            "general.maintenance_type=Corrective",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    // Explicit go-ahead files it
    let output = mrt()
        .current_dir(tmp.path())
        .args([
            "report",
            "new",
            &wo,
            "--craftsman",
            &cm,
            "--set",
            "general.maintenance_type=Corrective",
            "--yes",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    // The stored document carries the electrical section and no other
    let rpt = extract_id(&output, "RPT-");
    let show = mrt()
        .current_dir(tmp.path())
        .args(["report", "show", &rpt, "-f", "json"])
        .output()
        .unwrap();
    let report: serde_json::Value =
        serde_json::from_slice(&show.stdout).expect("report show -f json parses");
    let payload = report.get("report_data").unwrap().as_object().unwrap();
    assert!(payload.contains_key("electrical"));
    for absent in ["mechanical", "hvac", "plumbing"] {
        assert!(!payload.contains_key(absent));
    }
}

#[test]
fn test_report_show_renders_sections() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Main breaker cabinet");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Breaker check", &eq);

    let output = file_report(&tmp, &wo, &cm);
    let rpt = extract_id(&output, "RPT-");

    mrt()
        .current_dir(tmp.path())
        .args(["report", "show", &rpt])
        .assert()
        .success()
        .stdout(predicate::str::contains("General"))
        .stdout(predicate::str::contains("Maintenance Type:"))
        .stdout(predicate::str::contains("Preventive"))
        .stdout(predicate::str::contains("Operational Vibration:"))
        .stdout(predicate::str::contains("Yes"))
        .stdout(predicate::str::contains("Ada Fowler"))
        .stdout(predicate::str::contains("Routine service"))
        // Provenance is never rendered
        .stdout(predicate::str::contains("Metadata").not());
}

#[test]
fn test_report_with_attachment() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Sump pump");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Pump teardown", &eq);

    let photo = tmp.path().join("impeller.jpg");
    fs::write(&photo, b"jpeg bytes").unwrap();

    let output = mrt()
        .current_dir(tmp.path())
        .args([
            "report",
            "new",
            &wo,
            "--craftsman",
            &cm,
            "--set",
            "general.maintenance_type=Corrective",
            "--set",
            "inspection.visual_unusual_wear=yes",
            "--attach",
            photo.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rpt = extract_id(&output, "RPT-");

    mrt()
        .current_dir(tmp.path())
        .args(["report", "show", &rpt])
        .assert()
        .success()
        .stdout(predicate::str::contains("impeller.jpg"));
}

#[test]
fn test_report_rows_and_validate() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Condensate pump");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Seal replacement", &eq);

    mrt()
        .current_dir(tmp.path())
        .args([
            "report",
            "new",
            &wo,
            "--craftsman",
            &cm,
            "--set",
            "general.maintenance_type=Corrective",
            "--set",
            "inspection.visual_leaks=yes",
            "--set",
            "mechanical.seals_condition=Replaced",
            "--row",
            "parts.items=SL-440|Shaft seal|1|23.90",
            "--row",
            "measurements.custom_measurements=Runout|0.02|mm",
        ])
        .assert()
        .success();

    mrt()
        .current_dir(tmp.path())
        .args(["report", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("conform"));
}

#[test]
fn test_report_new_rejects_bad_field_value() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Condensate pump");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Seal replacement", &eq);

    mrt()
        .current_dir(tmp.path())
        .args([
            "report",
            "new",
            &wo,
            "--craftsman",
            &cm,
            "--set",
            "general.maintenance_type=Routine",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not one of"));
}

// ============================================================================
// Status Dashboard Tests
// ============================================================================

#[test]
fn test_status_dashboard() {
    let tmp = setup_test_project();
    let eq = create_equipment(&tmp, "Main breaker cabinet");
    let cm = create_craftsman(&tmp, "Ada Fowler");
    let wo = create_work_order(&tmp, "Breaker check", &eq);
    file_report(&tmp, &wo, &cm);

    mrt()
        .current_dir(tmp.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WORK ORDERS"))
        .stdout(predicate::str::contains("completed"))
        .stdout(predicate::str::contains("REPORTS"));

    mrt()
        .current_dir(tmp.path())
        .args(["status", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reports\": 1"));
}
