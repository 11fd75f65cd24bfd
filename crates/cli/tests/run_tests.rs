// Integration tests for `gridkit show` and `gridkit run`.
// Run with: cargo test -p gridkit-cli --test run_tests -- --nocapture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::tempdir;

fn gridkit(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gridkit"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    // Keep the user's settings out of the test
    cmd.args(["--config", config_dir.join("settings.json").to_str().unwrap()]);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn donors() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/donors.json")
}

fn run_script(script: &str, extra: &[&str]) -> (std::process::Output, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let script_path = dir.path().join("steps.grid");
    fs::write(&script_path, script).unwrap();

    let output = gridkit(dir.path())
        .args(["run", donors().to_str().unwrap(), "--script", script_path.to_str().unwrap()])
        .args(extra)
        .output()
        .expect("gridkit run");
    (output, dir)
}

#[test]
fn show_prints_display_tsv() {
    let dir = tempdir().unwrap();
    let output = gridkit(dir.path())
        .args(["show", donors().to_str().unwrap()])
        .output()
        .expect("gridkit show");

    assert!(output.status.success(), "exit code was {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Donor\tAge\tActive\tCode");
    assert_eq!(lines[1], "Ada\t36\tYes\tA-1");
    assert_eq!(lines.len(), 4);
}

#[test]
fn run_edits_and_pastes() {
    let script = "\
# retype Bo's age, then paste two names
click 1:age
type 50
key Enter
clipboard Zed\\nYan
click 0:name
paste
";
    let (output, _dir) = run_script(script, &["--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["rows"][1]["age"], serde_json::json!(50.0));
    assert_eq!(json["rows"][0]["name"], "Zed");
    assert_eq!(json["rows"][1]["name"], "Yan");
    assert_eq!(json["rows"][2]["name"], "Cy");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cells: 2"), "summary was: {}", stderr);
}

#[test]
fn run_paste_skips_read_only_column() {
    let (output, _dir) = run_script("clipboard x\\ty\nclick 2:active\npaste\n", &["-q"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().nth(3), Some("Cy\t29\tYes\tC-3"));
}

#[test]
fn run_row_operations_and_save() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.json");
    let (output, _script_dir) = run_script(
        "row 0\nrow 1 ctrl\ndelete-rows\nappend\n",
        &["-q", "-o", out.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let rows = saved["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], "d3");
    assert_eq!(rows[1]["id"], "row-4");
}

#[test]
fn run_exports_csv_by_extension() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("donors.csv");
    let (output, _script_dir) = run_script("click 0:age\ntype 40\nkey Enter\n", &["-q", "-o", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Donor,Age,Active,Code");
    assert_eq!(lines[1], "Ada,40,Yes,A-1");
    assert_eq!(lines.len(), 4);
}

#[test]
fn bad_script_exits_with_parse_code() {
    let (output, _dir) = run_script("click 0:name\nwiggle\n", &[]);
    assert_eq!(output.status.code(), Some(11));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "stderr: {}", stderr);
}

#[test]
fn missing_document_is_usage_error() {
    let dir = tempdir().unwrap();
    let output = gridkit(dir.path())
        .args(["show", "does-not-exist.json"])
        .output()
        .expect("gridkit show");
    assert_eq!(output.status.code(), Some(2));
}
