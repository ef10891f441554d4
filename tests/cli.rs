use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn wrapper() -> Command {
    let mut cmd = Command::cargo_bin("mmseqs-wrapper").unwrap();
    cmd.env_remove("MMSEQS_BINARY");
    cmd
}

fn fasta(temp_dir: &TempDir) -> std::path::PathBuf {
    let path = temp_dir.path().join("input.fasta");
    fs::write(&path, ">seq1\nMKVLA\n").unwrap();
    path
}

#[test]
fn test_params_lists_createdb_parameters() {
    wrapper()
        .args(["params", "createdb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dbtype"))
        .stdout(predicate::str::contains("<input_files>"))
        .stdout(predicate::str::contains("--write-lookup"));
}

#[test]
fn test_params_json() {
    let output = wrapper()
        .args(["params", "createdb", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names[..2], ["input_files", "output_db"]);
}

#[test]
fn test_params_unknown_command_fails() {
    wrapper()
        .args(["params", "easy-search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command"));
}

#[test]
fn test_dry_run_prints_command_line() {
    let temp_dir = TempDir::new().unwrap();
    let input = fasta(&temp_dir);

    wrapper()
        .args(["--binary", "/usr/bin/mmseqs", "createdb"])
        .arg(&input)
        .args(["db", "--dbtype", "1", "--no-shuffle", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("/usr/bin/mmseqs createdb "))
        .stdout(predicate::str::contains("--dbtype 1 --shuffle 0"));
}

#[test]
fn test_missing_input_file_fails_validation() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.fasta");

    wrapper()
        .args(["--binary", "/usr/bin/mmseqs", "createdb"])
        .arg(&missing)
        .args(["db", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input_files"));
}

#[test]
fn test_invalid_choice_fails_validation() {
    let temp_dir = TempDir::new().unwrap();
    let input = fasta(&temp_dir);

    wrapper()
        .args(["createdb"])
        .arg(&input)
        .args(["db", "--dbtype", "7", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dbtype"));
}

#[test]
fn test_nonexistent_binary_exits_with_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = fasta(&temp_dir);

    wrapper()
        .args(["--binary", "/nonexistent/bin/mmseqs_12345", "createdb"])
        .arg(&input)
        .arg(temp_dir.path().join("db"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to execute"));
}

#[test]
fn test_huge_timeout_is_rejected_without_panicking() {
    let temp_dir = TempDir::new().unwrap();
    let input = fasta(&temp_dir);

    wrapper()
        .args(["--binary", "/bin/true", "createdb"])
        .arg(&input)
        .args(["db", "--timeout", "1e300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_nonpositive_timeout_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = fasta(&temp_dir);

    wrapper()
        .args(["createdb"])
        .arg(&input)
        .args(["db", "--timeout", "0", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Timeout"));
}
