//! Integration tests that run the CLI binary.

use std::fs;
use std::path::Path;

/// Variables the runner sets that would change the binary's behaviour.
const AMBIENT_ENV: &[&str] = &[
    "GITHUB_ACTIONS",
    "GITHUB_OUTPUT",
    "GITHUB_TOKEN",
    "GITHUB_EVENT_NAME",
    "GITHUB_EVENT_PATH",
    "GITHUB_REPOSITORY",
    "GITHUB_SHA",
    "GITHUB_BASE_REF",
    "RUNNER_DEBUG",
    "RUST_LOG",
    "INPUT_PATH",
    "INPUT_INCLUDE_HIDDEN",
    "INPUT_EXCLUDE",
    "INPUT_FILTER",
    "INPUT_METADATA_FILE",
    "INPUT_CHANGED-ONLY",
    "INPUT_CHANGE-SOURCE",
    "INPUT_GITHUB-TOKEN",
];

fn bin(cwd: &Path) -> std::process::Command {
    // CARGO_BIN_EXE_<name> uses the binary target name; hyphens require concat! for env!()
    let bin = env!(concat!("CARGO_BIN_EXE_folder", "-", "matrix"));
    let mut cmd = std::process::Command::new(bin);
    for key in AMBIENT_ENV {
        cmd.env_remove(key);
    }
    // Run from a temp dir so dotenv() won't load .env from the project root
    cmd.current_dir(cwd);
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("matrix JSON on stdout")
}

fn sorted(value: &serde_json::Value) -> Vec<String> {
    let mut names: Vec<String> = value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--changed-only"), "expected usage text in output");
}

#[test]
fn lists_visible_subdirectories() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    for dir in ["dir1", ".hidden", "dir2"] {
        fs::create_dir_all(tmp.path().join("repo").join(dir)).unwrap();
    }

    let output = bin(tmp.path()).args(["--path", "repo"]).output().unwrap();
    let json = stdout_json(&output);

    assert_eq!(json.as_object().unwrap().len(), 1);
    assert_eq!(sorted(&json["directory"]), vec!["dir1", "dir2"]);
}

#[test]
fn reads_inputs_from_action_environment() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    for dir in ["app-a", "app-b", "lib-c", ".cache"] {
        fs::create_dir_all(tmp.path().join("repo").join(dir)).unwrap();
    }

    let output = bin(tmp.path())
        .env("INPUT_PATH", "repo")
        .env("INPUT_INCLUDE_HIDDEN", "false")
        .env("INPUT_EXCLUDE", "app-b, lib-c")
        .env("INPUT_FILTER", "")
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert_eq!(sorted(&json["directory"]), vec!["app-a"]);
}

#[test]
fn omitted_action_inputs_use_defaults() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    for dir in ["dir1", ".hidden"] {
        fs::create_dir_all(tmp.path().join("repo").join(dir)).unwrap();
    }

    // The runner passes '' for every input the workflow leaves out.
    let output = bin(tmp.path())
        .env("INPUT_PATH", "repo")
        .env("INPUT_INCLUDE_HIDDEN", "")
        .env("INPUT_CHANGED-ONLY", "")
        .env("INPUT_CHANGE-SOURCE", "")
        .env("INPUT_METADATA_FILE", "")
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert_eq!(json, serde_json::json!({"directory": ["dir1"]}));
}

#[test]
fn falsey_boolean_inputs_are_off() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    for dir in ["dir1", ".hidden"] {
        fs::create_dir_all(tmp.path().join("repo").join(dir)).unwrap();
    }

    for value in ["0", "no", "off", "false"] {
        let output = bin(tmp.path())
            .args(["--path", "repo"])
            .env("INPUT_INCLUDE_HIDDEN", value)
            .env("INPUT_CHANGED-ONLY", value)
            .output()
            .unwrap();
        let json = stdout_json(&output);
        assert_eq!(
            json,
            serde_json::json!({"directory": ["dir1"]}),
            "value {:?}",
            value
        );
    }
}

#[test]
fn truthy_include_hidden_input_keeps_dot_directories() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    for dir in ["dir1", ".hidden"] {
        fs::create_dir_all(tmp.path().join("repo").join(dir)).unwrap();
    }

    for value in ["true", "True", "1"] {
        let output = bin(tmp.path())
            .args(["--path", "repo"])
            .env("INPUT_INCLUDE_HIDDEN", value)
            .output()
            .unwrap();
        let json = stdout_json(&output);
        assert_eq!(sorted(&json["directory"]), vec![".hidden", "dir1"], "value {:?}", value);
    }
}

#[test]
fn git_change_source_from_input_needs_no_token() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    fs::create_dir_all(tmp.path().join("repo/dir1")).unwrap();

    // No event name: unsupported event, so nothing is in scope.
    let output = bin(tmp.path())
        .args(["--path", "repo"])
        .env("INPUT_CHANGED-ONLY", "true")
        .env("INPUT_CHANGE-SOURCE", "git")
        .output()
        .unwrap();
    let json = stdout_json(&output);

    assert_eq!(json, serde_json::json!({"directory": []}));
}

#[test]
fn metadata_file_produces_include_matrix() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let root = tmp.path().join("repo");
    fs::create_dir_all(root.join("project1")).unwrap();
    fs::create_dir_all(root.join("project2")).unwrap();
    fs::write(root.join("project1/package.json"), r#"{"name":"p1"}"#).unwrap();

    let output = bin(tmp.path())
        .args(["--path", "repo", "--metadata-file", "package.json"])
        .output()
        .unwrap();
    let json = stdout_json(&output);

    let mut include = json["include"].as_array().unwrap().clone();
    include.sort_by_key(|e| e["directory"].as_str().unwrap().to_string());
    assert_eq!(
        serde_json::Value::Array(include),
        serde_json::json!([{"directory": "project1", "name": "p1"}, {"directory": "project2"}])
    );
}

#[test]
fn writes_to_github_output_file() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    fs::create_dir_all(tmp.path().join("repo/only")).unwrap();
    let out_file = tmp.path().join("github_output");

    let output = bin(tmp.path())
        .args(["--path", "repo"])
        .env("GITHUB_OUTPUT", &out_file)
        .output()
        .unwrap();

    assert!(output.status.success());
    let written = fs::read_to_string(&out_file).unwrap();
    assert_eq!(written, "matrix={\"directory\":[\"only\"]}\n");
}

#[test]
fn invalid_filter_fails_with_message() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    fs::create_dir_all(tmp.path().join("repo/dir1")).unwrap();

    let output = bin(tmp.path())
        .args(["--path", "repo", "--filter", "[unclosed"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid regex pattern"), "got: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_directory_fails() {
    let tmp = tempfile::TempDir::new().expect("temp dir");

    let output = bin(tmp.path()).args(["--path", "nope"]).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Directory does not exist: nope"), "got: {}", stderr);
}

#[test]
fn changed_only_without_token_fails() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    fs::create_dir_all(tmp.path().join("repo/dir1")).unwrap();

    let output = bin(tmp.path())
        .args(["--path", "repo", "--changed-only"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("GITHUB_TOKEN is required when changed-only is set to true"),
        "got: {}",
        stderr
    );
}

#[test]
fn errors_become_workflow_commands_inside_actions() {
    let tmp = tempfile::TempDir::new().expect("temp dir");

    let output = bin(tmp.path())
        .args(["--path", "nope"])
        .env("GITHUB_ACTIONS", "true")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("::error::Action failed: Directory does not exist: nope"),
        "got: {}",
        stdout
    );
}
