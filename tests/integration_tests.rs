//! Integration tests for the pdk CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd against
//! an offline catalog snapshot in a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
  "parts": [
    {"id": 1, "name": "10K Resistor", "category_path": "Passives/Resistors", "total_in_stock": 200.0},
    {"id": 2, "name": "4.7K Resistor", "category_path": "Passives/Resistors", "total_in_stock": 80.0},
    {"id": 3, "name": "100nF Film Capacitor", "category_path": "Passives/Capacitors", "total_in_stock": 40.0},
    {"id": 4, "name": "TL072 Dual Op-Amp", "category_path": "Active/ICs/Op-Amps", "total_in_stock": 1.0},
    {"id": 5, "name": "2N5088 NPN", "category_path": "Active/Transistors/NPN", "total_in_stock": 10.0},
    {"id": 6, "name": "1N4148 Diode", "category_path": "Active/Diodes", "total_in_stock": 50.0},
    {"id": 100, "name": "Fuzz Face", "category_path": "Projects/Guitar Pedals", "total_in_stock": 0.0}
  ],
  "locations": [
    {"id": 500, "name": "Bench", "pathstring": "Bench"}
  ],
  "stock": [
    {"id": 10, "part": 1, "location": 500, "quantity": 200.0},
    {"id": 11, "part": 4, "location": null, "quantity": 1.0}
  ],
  "bom": [
    {"part": 100, "sub_part": 1, "reference": "R1", "quantity": 2.0},
    {"part": 100, "sub_part": 4, "reference": "IC1", "quantity": 2.0},
    {"part": 100, "sub_part": 5, "reference": "Q1", "quantity": 1.0}
  ]
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("catalog.json"), SNAPSHOT).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// pdk isolated from the user's config and environment
    fn pdk(&self) -> Command {
        let mut cmd = Command::cargo_bin("pdk").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.path("config"))
            .env_remove("PDK_URL")
            .env_remove("PDK_TOKEN")
            .env_remove("PDK_REFERENCE")
            .env_remove("PDK_LOG");
        cmd
    }

    fn offline(&self) -> Command {
        let mut cmd = self.pdk();
        cmd.args(["--catalog", "catalog.json"]);
        cmd
    }

    fn catalog(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.path("catalog.json")).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    /// labels + locations, the usual first two steps
    fn prepare(&self) {
        self.offline().arg("labels").assert().success();
        self.pdk().arg("locations").assert().success();
    }
}

fn part<'a>(catalog: &'a serde_json::Value, id: u64) -> &'a serde_json::Value {
    catalog["parts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == id)
        .unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_lists_commands() {
    Workspace::new()
        .pdk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("labels"))
        .stdout(predicate::str::contains("reconcile"))
        .stdout(predicate::str::contains("move-stock"));
}

#[test]
fn test_completions_bash() {
    Workspace::new()
        .pdk()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pdk"));
}

#[test]
fn test_parse_names() {
    Workspace::new()
        .pdk()
        .args(["--format", "tsv", "parse", "4.7K Resistor", "0.1uF Film Cap", "B50K Pot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resistor\t4.7K\t4700\t1K-10K"))
        .stdout(predicate::str::contains("capacitor\t100nF\t100000\tfilm"))
        .stdout(predicate::str::contains("potentiometer\t50K\t50000\tB"));
}

#[test]
fn test_parse_with_family() {
    Workspace::new()
        .pdk()
        .args(["--format", "json", "parse", "--family", "transistor", "2N3904 NPN"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"display\": \"2N3904\""));
}

#[test]
fn test_missing_catalog_is_reported() {
    Workspace::new()
        .pdk()
        .arg("labels")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No catalog configured"));
}

// ============================================================================
// Label Sheet and Location Map
// ============================================================================

#[test]
fn test_labels_writes_sheet() {
    let ws = Workspace::new();
    ws.offline()
        .arg("labels")
        .assert()
        .success()
        .stdout(predicate::str::contains("labels.csv"));

    let sheet = fs::read_to_string(ws.path("labels.csv")).unwrap();
    let mut lines = sheet.lines();
    assert!(lines
        .next()
        .unwrap()
        .starts_with("Unit,Bin_Top,Bin_Bottom,Label_Top,Label_Bottom,"));
    assert!(sheet.contains("U1,S1,S2,R: "));
    assert!(sheet.contains("TL072"));
    assert!(sheet.contains("Q NPN: "));
    assert!(sheet.contains("PCBs,Enclosures"));
}

#[test]
fn test_labels_json_report() {
    let ws = Workspace::new();
    ws.offline()
        .args(["--format", "json", "labels", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"families\""))
        .stdout(predicate::str::contains("\"parts\": 7"));
    assert!(!ws.path("labels.csv").exists());
}

#[test]
fn test_locations_from_sheet() {
    let ws = Workspace::new();
    ws.prepare();

    let text = fs::read_to_string(ws.path("component_locations.json")).unwrap();
    let map: serde_json::Value = serde_json::from_str(&text).unwrap();
    let first = &map["10K"][0];
    assert_eq!(first["unit"], "U1");
    assert!(first["drawer"].as_str().unwrap().starts_with('S'));
    assert!(map.get("TL072").is_some());
}

#[test]
fn test_locations_without_sheet_fails() {
    Workspace::new()
        .pdk()
        .arg("locations")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Reconcile, Move Stock, Pick
// ============================================================================

#[test]
fn test_reconcile_dry_run_leaves_catalog_alone() {
    let ws = Workspace::new();
    ws.prepare();
    ws.offline()
        .args(["reconcile", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    let catalog = ws.catalog();
    assert!(part(&catalog, 1)["default_location"].is_null());
    assert_eq!(catalog["locations"].as_array().unwrap().len(), 1);
}

#[test]
fn test_reconcile_assigns_locations() {
    let ws = Workspace::new();
    ws.prepare();
    ws.offline()
        .arg("reconcile")
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched"));

    let catalog = ws.catalog();
    let location = part(&catalog, 1)["default_location"].as_u64().unwrap();
    let path = catalog["locations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"] == location)
        .unwrap()["pathstring"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(path.starts_with("Workshop/Unit 1 (U1)/S"));
    assert!(path.contains("/Compartment "));
}

#[test]
fn test_move_stock_after_reconcile() {
    let ws = Workspace::new();
    ws.prepare();
    ws.offline().arg("reconcile").assert().success();
    ws.offline()
        .arg("move-stock")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench"))
        .stdout(predicate::str::contains("Moved"));

    let catalog = ws.catalog();
    let target = part(&catalog, 1)["default_location"].clone();
    let item = catalog["stock"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == 10)
        .unwrap()
        .clone();
    assert_eq!(item["location"], target);
}

#[test]
fn test_pick_lists_assemblies() {
    let ws = Workspace::new();
    ws.offline()
        .arg("pick")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fuzz Face"));
}

#[test]
fn test_pick_sheet() {
    let ws = Workspace::new();
    ws.prepare();
    ws.offline()
        .args(["pick", "fuzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PICKING SHEET: Fuzz Face"))
        .stdout(predicate::str::contains("Total items to pick: 3"))
        .stdout(predicate::str::contains("TL072 Dual Op-Amp: need 1 more (have 1)"));
}

#[test]
fn test_pick_unknown_assembly() {
    Workspace::new()
        .offline()
        .args(["pick", "big muff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("big muff"));
}

#[test]
fn test_resolve_reports_tier() {
    Workspace::new()
        .offline()
        .args(["--format", "tsv", "resolve", "10K", "TL072", "LED Bezel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10K\t10K Resistor\t1\tnormalized"))
        .stdout(predicate::str::contains("TL072\tTL072 Dual Op-Amp\t4\tcontainment"))
        .stdout(predicate::str::contains("LED Bezel\t-\t-\tno match"));
}

#[test]
fn test_snapshot_round_trip() {
    let ws = Workspace::new();
    ws.offline()
        .args(["snapshot", "copy.json"])
        .assert()
        .success();
    let copy: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ws.path("copy.json")).unwrap()).unwrap();
    assert_eq!(copy["parts"].as_array().unwrap().len(), 7);
    assert_eq!(copy["bom"].as_array().unwrap().len(), 3);
}
