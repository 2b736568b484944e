use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use serial_test::serial;

const BIN: &str = env!("CARGO_BIN_EXE_poker-catalog");

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env_remove("CATALOG_MIN_CONFIDENCE")
        .env_remove("CATALOG_EXCLUDE")
        .output()
        .expect("Failed to execute poker-catalog")
}

fn create_share(root: &Path) {
    let files = [
        "WSOP/2024/Bracelet/10-wsop-2024-be-ev-21-25k-nlh-hr-ft-schutten-reclaims-chip-lead.mp4",
        "WSOP/2024/Circuit/WCLA24-15.mp4",
        "WSOP/2024/Circuit/Clips/WCLA24-15-hand01.mp4",
        "GOG/E01_GOG_final_edit_231106.mp4",
        "PAD/Season 12/pad-s12-ep01-002.mp4",
        "PAD/Season 12/._pad-s12-ep01-002.mp4",
        "misc/random_video.mp4",
        "misc/notes.txt",
    ];
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
}

#[test]
#[serial]
fn test_parse_command_json() {
    let output = run(&[
        "parse",
        "10-wsop-2024-be-ev-21-25k-nlh-hr-ft-schutten-reclaims-chip-lead.mp4",
        "WCLA24-15.mp4",
        "random_video.mp4",
        "--json",
    ]);
    assert!(output.status.success(), "Parse command failed");

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 3);

    let bracelet = &records[0];
    assert_eq!(bracelet["franchise"], "WSOP");
    assert_eq!(bracelet["year"], 2024);
    assert_eq!(bracelet["event_number"], 21);
    assert_eq!(bracelet["buy_in"], "25K");
    assert_eq!(bracelet["game_type"], "NLHE");
    assert_eq!(bracelet["table_type"], "final_table");
    assert!(bracelet["confidence"].as_f64().unwrap() >= 0.9);

    assert_eq!(records[1]["clip_number"], 15);
    assert_eq!(records[1]["extra"]["sub_category"], "CIRCUIT");

    let generic = &records[2];
    assert!(generic["franchise"].is_null());
    assert_eq!(generic["success"], true);
    assert!(generic["confidence"].as_f64().unwrap() <= 0.3);
}

#[test]
#[serial]
fn test_parse_command_report() {
    let output = run(&["parse", "E01_GOG_final_edit_231106.mp4"]);
    assert!(output.status.success(), "Parse command failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Parser: gog"), "Unexpected output: {stdout}");
    assert!(stdout.contains("Year: 2023"), "Unexpected output: {stdout}");
    assert!(stdout.contains("Game of Gold"), "Unexpected output: {stdout}");
}

#[test]
#[serial]
fn test_scan_command() {
    let temp_dir = TempDir::new().unwrap();
    create_share(temp_dir.path());

    let output = run(&["scan", temp_dir.path().to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "Scan command failed");

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // Hidden file skipped by the inventory
    assert_eq!(report["files_inventoried"], 7);
    // Video files only: bracelet, circuit, clip, gog, pad, misc
    assert_eq!(report["build"]["files_processed"], 6);
    // Clip folder excluded, misc has no franchise
    assert_eq!(report["build"]["skipped"], 2);
    assert_eq!(report["build"]["projects_created"], 3);
    assert_eq!(report["build"]["video_files_created"], 4);
}

#[test]
#[serial]
fn test_link_command() {
    let temp_dir = TempDir::new().unwrap();
    let share = temp_dir.path().join("share");
    create_share(&share);

    let circuit = share.join("WSOP/2024/Circuit/WCLA24-15.mp4");
    let rows = serde_json::json!([
        ["Title", "NAS Folder"],
        ["Circuit clip", circuit.to_string_lossy().replace('/', "\\").to_uppercase()],
        ["GOG", "\\\\nas\\media\\backup\\share\\GOG\\E01_GOG_final_edit_231106.mp4"],
        ["Missing", "HCL/2025/stream.mp4"],
        ["Empty", ""]
    ]);
    let rows_path = temp_dir.path().join("rows.json");
    fs::write(&rows_path, rows.to_string()).unwrap();

    let output = Command::new(BIN)
        .args([
            "link",
            share.to_str().unwrap(),
            rows_path.to_str().unwrap(),
            "--column",
            "1",
            "--skip-header",
            "--json",
        ])
        .env("CATALOG_MIN_CONFIDENCE", "0.5")
        .output()
        .expect("Failed to execute link command");
    assert!(
        output.status.success(),
        "Link command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["rows_read"], 4);
    assert_eq!(report["matches"]["total"], 3);
    assert_eq!(report["matches"]["exact"], 1);
    assert_eq!(report["matches"]["fuzzy"], 1);
    assert_eq!(report["matches"]["unmatched"], 1);
    assert_eq!(report["min_confidence"], 0.5);
    assert_eq!(report["applied"]["applied"], 2);
    assert_eq!(report["results"][1]["tier"], "fuzzy");
}

#[test]
#[serial]
fn test_scan_nonexistent_directory() {
    let output = run(&["scan", "/nonexistent/poker/share"]);
    assert!(!output.status.success());
}

#[test]
#[serial]
fn test_link_missing_rows_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&[
        "link",
        temp_dir.path().to_str().unwrap(),
        temp_dir.path().join("missing.json").to_str().unwrap(),
    ]);
    assert!(!output.status.success());
}
