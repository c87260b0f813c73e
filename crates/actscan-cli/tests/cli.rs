use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CARD: &str = "Evening Run\nOctober 3, 2023 at 6:15 PM\n· Mission Ward, Example City\n5.20 mi\n9:15 /mi\n45m 12s\nAchievements 3";

fn actscan() -> Command {
    let mut cmd = Command::cargo_bin("actscan").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Config file whose image store lives inside the temp dir.
fn write_config(dir: &TempDir) -> PathBuf {
    let config = serde_json::json!({
        "storage": { "images_dir": dir.path().join("images") },
        "models": { "model_dir": dir.path().join("models") }
    });
    let path = dir.path().join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_extract_from_file_as_json() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "card.txt", CARD.as_bytes());

    let output = actscan().arg("extract").arg(&input).output().unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["file"], "card.txt");
    assert_eq!(record["activityName"], "Evening Run");
    assert_eq!(record["location"], "Mission Ward, Example City");
    assert_eq!(record["distance"], "5.20 mi");
    assert_eq!(record["achievements"], "3");
    assert_eq!(record["rawText"], CARD);
}

#[test]
fn test_extract_from_stdin_omits_missing_fields() {
    let output = actscan()
        .args(["extract", "-", "--file-id", "shot.png"])
        .write_stdin("3.1 km")
        .output()
        .unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["file"], "shot.png");
    assert_eq!(record["distance"], "3.1 km");
    assert!(record.get("pace").is_none());
    assert!(record.get("activityName").is_none());
}

#[test]
fn test_extract_empty_input() {
    let output = actscan().arg("extract").write_stdin("").output().unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["file"], "stdin");
    assert_eq!(record["rawText"], "");
    assert_eq!(record.as_object().unwrap().len(), 2);
}

#[test]
fn test_extract_rejects_invalid_utf8() {
    actscan()
        .arg("extract")
        .write_stdin(vec![0x45, 0xff, 0xfe, 0x20, 0x35])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn test_extract_csv_and_text_formats() {
    actscan()
        .args(["extract", "--format", "csv"])
        .write_stdin("Evening Run\n5 mi")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "file,activityName,date,location,distance,pace,time,achievements,rawText",
        ));

    actscan()
        .args(["extract", "--format", "text"])
        .write_stdin("5 mi")
        .assert()
        .success()
        .stdout(predicate::str::contains("Distance").and(predicate::str::contains("5 mi")));
}

#[test]
fn test_extract_explain_names_rules() {
    actscan()
        .args(["extract", "--explain"])
        .write_stdin(CARD)
        .assert()
        .success()
        .stderr(predicate::str::contains("distance_mi"))
        .stderr(predicate::str::contains("location_after_dot"));
}

#[test]
fn test_extract_missing_file() {
    actscan()
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_upload_list_and_remove() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let shots = dir.path().join("shots");
    fs::create_dir_all(&shots).unwrap();
    write_file(&shots, "run.png", b"png");
    write_file(&shots, "ride.jpg", b"jpg");
    write_file(&shots, "notes.txt", b"txt");

    let pattern = shots.join("*").display().to_string();
    actscan()
        .arg("-c")
        .arg(&config)
        .args(["upload", "--user", "alice", pattern.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 images for user alice"));

    let stored: Vec<_> = fs::read_dir(dir.path().join("images").join("alice"))
        .unwrap()
        .collect();
    assert_eq!(stored.len(), 2);

    let output = actscan()
        .arg("-c")
        .arg(&config)
        .args(["list", "--json"])
        .output()
        .unwrap();
    let users: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(users, serde_json::json!([{ "userId": "alice", "images": 2 }]));

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["list", "--user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-run.png").and(predicate::str::contains("-ride.jpg")));

    // Without --yes nothing is deleted
    actscan()
        .arg("-c")
        .arg(&config)
        .args(["remove", "--user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    assert!(dir.path().join("images").join("alice").is_dir());

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["remove", "--user", "alice", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 images"));
    assert!(!dir.path().join("images").join("alice").exists());
}

#[test]
fn test_upload_rejects_path_like_user() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let shot = write_file(dir.path(), "run.png", b"png");

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["upload", "--user", "../escape"])
        .arg(&shot)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid user id"));
}

#[test]
fn test_upload_without_images_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let pattern = dir.path().join("*.png").display().to_string();

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["upload", "--user", "bob", pattern.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No image files found"));
}

#[test]
fn test_process_user_without_images() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = actscan()
        .arg("-c")
        .arg(&config)
        .args(["process", "--user", "ghost"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        response,
        serde_json::json!({
            "success": true,
            "message": "No images to process",
            "data": { "ghost": { "analysis": [] } }
        })
    );
}

#[test]
fn test_process_without_models_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let shot = write_file(dir.path(), "run.png", b"png");

    actscan()
        .arg("-c")
        .arg(&config)
        .arg("process")
        .arg(&shot)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--model-dir"));
}

#[test]
fn test_process_requires_user_or_input() {
    actscan().arg("process").assert().failure();
}

#[test]
fn test_config_init_get_and_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "ingest.on_ocr_failure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"record\""));

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "ingest.on_ocr_failure", "skip"])
        .assert()
        .success();

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "ingest.on_ocr_failure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"skip\""));

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "ingest.on_ocr_failure", "explode"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "ocr.no_such_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_process_invalid_user_reports_failure_envelope() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = actscan()
        .arg("-c")
        .arg(&config)
        .args(["process", "--user", "  "])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], false);
    assert_eq!(response["data"], serde_json::json!({}));
    assert!(response["message"].as_str().unwrap().contains("invalid user id"));
}

#[test]
fn test_config_path_reports_models() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    actscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exists"))
        .stdout(predicate::str::contains("missing"))
        .stdout(predicate::str::contains("det.onnx"));
}
