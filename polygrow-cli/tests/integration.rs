//! Integration tests for polygrow CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Get the path to the polygrow binary from the workspace root.
fn binary_path() -> PathBuf {
    if let Some(path) = option_env!("CARGO_BIN_EXE_polygrow") {
        return PathBuf::from(path);
    }

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // Go up from polygrow-cli to the workspace root

    // Try release first, then debug
    let release = path.join("target/release/polygrow");
    if release.exists() {
        return release;
    }
    path.join("target/debug/polygrow")
}

/// Fresh scratch directory for one test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("polygrow-it-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

#[test]
fn variants_command_lists_all_variants() {
    let output = Command::new(binary_path())
        .arg("variants")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["regular", "scaled", "edge-walk", "thorn"] {
        assert!(stdout.contains(name), "Should list '{}' variant", name);
    }
    assert!(stdout.contains("ThornTree"), "Should list persisted class names");
}

#[test]
fn config_command_prints_json() {
    let output = Command::new(binary_path())
        .args(["config", "-v", "thorn", "-s", "3"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(json["_class"], "ThornTree");
    assert_eq!(json["randomSeed"], 3);
    assert_eq!(json["fieldResolution"], 20);
    assert_eq!(json["polygon"].as_array().unwrap().len(), 18);
}

#[test]
fn grow_command_writes_svg() {
    let dir = scratch_dir("svg");
    let out = dir.join("pentagon.svg");

    let output = Command::new(binary_path())
        .args(["grow", "-v", "regular", "-s", "0", "-n", "200", "-o", out.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let svg = fs::read_to_string(&out).expect("SVG should be written");
    assert!(svg.contains("<svg"), "Should have SVG element");
    assert!(svg.contains("<path"), "Should have node paths");
    assert!(svg.contains("</svg>"), "Should close SVG element");
}

#[test]
fn grow_command_reports_json() {
    let dir = scratch_dir("json");
    let out = dir.join("report.svg");

    let output = Command::new(binary_path())
        .args(["grow", "-v", "scaled", "-s", "1", "-n", "40", "--json", "-o", out.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Report should be JSON");
    assert_eq!(report["variant"], "scaled");
    assert_eq!(report["seed"], 1);
    assert!(report["steps"].as_u64().unwrap() <= 40);
    assert!(report["accepted"].as_u64().unwrap() >= 1);
    assert!(report["filled_cells"].as_u64().unwrap() > 0);
}

#[test]
fn grow_command_writes_png_and_mask() {
    let dir = scratch_dir("png");
    let out = dir.join("run.svg");

    let output = Command::new(binary_path())
        .args(["grow", "-s", "2", "-n", "100", "--png", "--mask", "--size", "128", "-o", out.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let png = fs::read(dir.join("run.png")).expect("PNG should be written");
    assert_eq!(&png[1..4], b"PNG");
    assert!(dir.join("run.mask.png").exists(), "Mask should be written");
}

#[test]
fn thorn_always_writes_mask() {
    let dir = scratch_dir("thorn");
    let out = dir.join("thorn.svg");

    let output = Command::new(binary_path())
        .args(["grow", "-v", "thorn", "-s", "1", "-n", "50", "-o", out.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.join("thorn.mask.png").exists());
}

#[test]
fn saved_config_reloads() {
    let dir = scratch_dir("reload");
    let saved = dir.join("saved.json");
    let first = dir.join("first.svg");
    let second = dir.join("second.svg");

    let output = Command::new(binary_path())
        .args(["grow", "-v", "scaled", "-s", "4", "-n", "150"])
        .args(["--save-config", saved.to_str().unwrap(), "-o", first.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let output = Command::new(binary_path())
        .args(["grow", "--config", saved.to_str().unwrap(), "-n", "150", "-o", second.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    // same rule set, same growth
    let a = fs::read_to_string(first).unwrap();
    let b = fs::read_to_string(second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn yaml_config_loads() {
    let dir = scratch_dir("yaml");
    let yaml = dir.join("tree.yaml");
    let normalized = dir.join("normalized.json");

    let output = Command::new(binary_path())
        .args(["config", "-v", "edge-walk", "-s", "5"])
        .output()
        .expect("Failed to execute command");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    fs::write(&yaml, serde_yaml::to_string(&json).unwrap()).unwrap();

    let output = Command::new(binary_path())
        .args(["config", "--from", yaml.to_str().unwrap(), "-o", normalized.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let reloaded: serde_json::Value = serde_json::from_str(&fs::read_to_string(normalized).unwrap()).unwrap();
    assert_eq!(reloaded, json);
}

#[test]
fn unknown_variant_fails() {
    let output = Command::new(binary_path())
        .args(["grow", "-v", "hexagon"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown variant"), "stderr: {}", stderr);
}

#[test]
fn unknown_class_in_config_fails() {
    let dir = scratch_dir("badclass");
    let path = dir.join("bad.json");
    fs::write(&path, r#"{ "_class": "HexagonTree", "randomSeed": 0 }"#).unwrap();

    let output = Command::new(binary_path())
        .args(["grow", "--config", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown variant 'HexagonTree'"), "stderr: {}", stderr);
}

#[test]
fn unknown_command_fails() {
    let output = Command::new(binary_path())
        .arg("frobnicate")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
