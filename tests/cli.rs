//! Integration tests for top-level CLI behavior.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("filegate_cli_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_filegate(workdir: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_filegate");
    Command::new(bin)
        .args(args)
        .current_dir(workdir)
        .env("FILEGATE_WORKDIR", workdir)
        .env("FILEGATE_HOME", workdir)
        .env_remove("FILEGATE_ROOT")
        .env_remove("FILEGATE_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run filegate binary")
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn help_lists_every_node_command() {
    let dir = scratch("help");
    let output = run_filegate(&dir, &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for command in ["browse", "read", "write", "copy", "exec", "mkdir", "delete", "nodes"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn browse_defaults_to_home_and_sorts() {
    let dir = scratch("browse");
    fs::write(dir.join("b.txt"), "b").unwrap();
    fs::write(dir.join("A.txt"), "a").unwrap();
    fs::write(dir.join(".hidden"), "h").unwrap();
    fs::create_dir(dir.join("sub")).unwrap();

    let output = run_filegate(&dir, &["browse"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    let names: Vec<&str> =
        json["files"].as_array().unwrap().iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["A.txt", "b.txt"]);
    assert_eq!(json["directories"][0]["name"], "sub");
    assert_eq!(json["current_path"], dir.display().to_string());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn write_read_copy_delete_cycle() {
    let dir = scratch("cycle");

    let output = run_filegate(&dir, &["write", "docs/readme.txt", "--content", "hello"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)["status"]["message"],
        "Successfully wrote 5 characters to readme.txt"
    );

    let output = run_filegate(&dir, &["copy", "docs/readme.txt", "backup/readme.txt"]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(dir.join("backup/readme.txt")).unwrap(), "hello");

    let output = run_filegate(&dir, &["read", "backup/readme.txt", "--encoding", "binary"]);
    assert_eq!(stdout_json(&output)["content"], "[Binary file - Base64 encoded]\naGVsbG8=");

    let output = run_filegate(&dir, &["delete", "docs/readme.txt", "--confirm"]);
    assert!(output.status.success());
    assert!(!dir.join("docs/readme.txt").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failure_exits_nonzero_with_json_report() {
    let dir = scratch("failure");

    let output = run_filegate(&dir, &["read", "absent.txt"]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "not_found");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("path does not exist"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn out_of_range_size_is_a_usage_error() {
    let dir = scratch("usage");
    let output = run_filegate(&dir, &["read", "x", "--max-size-mb", "500"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn root_from_environment_confines_paths() {
    let dir = scratch("root");
    let bin = env!("CARGO_BIN_EXE_filegate");
    let output = Command::new(bin)
        .args(["read", "../outside.txt"])
        .env("FILEGATE_WORKDIR", &dir)
        .env("FILEGATE_ROOT", &dir)
        .env_remove("FILEGATE_CONFIG")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(stdout_json(&output)["kind"], "access_denied");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn config_file_sets_home() {
    let dir = scratch("config");
    let home = dir.join("home");
    fs::create_dir(&home).unwrap();
    fs::write(home.join("marker.txt"), "m").unwrap();
    let config = dir.join("filegate.yaml");
    fs::write(&config, format!("home_dir: {}\n", home.display())).unwrap();

    let bin = env!("CARGO_BIN_EXE_filegate");
    let output = Command::new(bin)
        .args(["browse", "--config"])
        .arg(&config)
        .env_remove("FILEGATE_HOME")
        .env_remove("FILEGATE_ROOT")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["files"][0]["name"], "marker.txt");

    let _ = fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn exec_reports_exit_code_and_streams() {
    let dir = scratch("exec");
    let output = run_filegate(&dir, &["exec", "echo out; echo err >&2; exit 3"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["stdout"], "out\n");
    assert_eq!(json["stderr"], "err\n");
    assert_eq!(json["exit_code"], 3);
    assert_eq!(json["truncated"], false);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn nodes_prints_catalog_json() {
    let dir = scratch("nodes");
    let output = run_filegate(&dir, &["nodes"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json[0]["class_name"], "FileBrowser");
    assert_eq!(json[6]["function"], "delete_file");
    let _ = fs::remove_dir_all(&dir);
}
