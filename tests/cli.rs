/*!
 * Integration tests for the dumptext binary
 */

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn dumptext(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dumptext"))
        .args(args)
        .arg("--no-progress")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_writes_records_and_reports_completion() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("backend");
    fs::create_dir_all(root.join("node_modules")).unwrap();
    fs::write(root.join("a.py"), "print(1)").unwrap();
    fs::write(root.join("b.png"), [0u8, 1, 2, 3]).unwrap();
    fs::write(root.join("node_modules").join("c.py"), "print(2)").unwrap();
    let output_file = temp_dir.path().join("backend_all_content.md");

    let output = dumptext(&[&root, &output_file]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!(
        "Content successfully written to {}",
        output_file.display()
    )));

    let content = fs::read_to_string(&output_file).unwrap();
    assert_eq!(
        content,
        format!("--- File: {} ---\nprint(1)\n\n", root.join("a.py").display())
    );
}

#[test]
fn test_skip_diagnostic_on_stderr() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("src");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("blob.dat"), [0xffu8, 0xfe, 0x00]).unwrap();
    fs::write(root.join("main.rs"), "fn main() {}\n").unwrap();
    let output_file = temp_dir.path().join("out.md");

    let output = dumptext(&[&root, &output_file]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!(
        "Skipping file: {} due to error: invalid UTF-8 data",
        root.join("blob.dat").display()
    )));

    let content = fs::read_to_string(&output_file).unwrap();
    assert!(content.contains("fn main() {}"));
    assert!(!content.contains("blob.dat"));
}

#[test]
fn test_missing_root_fails() {
    let temp_dir = tempdir().unwrap();
    let output_file = temp_dir.path().join("out.md");

    let output = dumptext(&[&temp_dir.path().join("missing"), &output_file]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Path not found"));
    assert!(!output_file.exists());
}

#[test]
fn test_unreachable_entries_are_flagged() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("web");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("webpack.config.js"), "module.exports = {};").unwrap();
    let output_file = temp_dir.path().join("out.md");

    let output = dumptext(&[&root, &output_file]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("will never match"));
    assert!(stderr.contains(".config.js"));
}

#[test]
fn test_generate_completions() {
    let output = Command::new(env!("CARGO_BIN_EXE_dumptext"))
        .args(["--generate", "bash"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("dumptext"));
}
