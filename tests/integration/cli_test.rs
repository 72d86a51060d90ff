//! Integration tests for the texclean binary.

use std::process::Command;

use crate::helpers::{read, sample_project, write};

/// Helper to run the texclean CLI and capture output
fn run_texclean(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_texclean"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute texclean");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_exits_0_and_lists_options() {
    let (stdout, _stderr, exit_code) = run_texclean(&["--help"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("<INPUT_FOLDER>"));
    assert!(stdout.contains("--commands-to-delete"));
    assert!(stdout.contains("--keep-bib"));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn no_arguments_is_a_usage_error() {
    let (_stdout, stderr, exit_code) = run_texclean(&[]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("<INPUT_FOLDER>"));
}

#[test]
fn missing_input_folder_exits_1() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let (_stdout, stderr, exit_code) = run_texclean(&[missing.to_str().unwrap()]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("not a directory"));
}

#[test]
fn unsupported_config_format_exits_1() {
    let (dir, input) = sample_project();
    write(dir.path(), "settings.ini", "keep_bib = true");
    let config = dir.path().join("settings.ini");

    let (_stdout, stderr, exit_code) = run_texclean(&[
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Unsupported config format"));
}

// ============================================================================
// Cleaning Runs
// ============================================================================

#[test]
fn cleans_with_underscore_aliases() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");

    let (stdout, _stderr, exit_code) = run_texclean(&[
        input.to_str().unwrap(),
        "--output_folder",
        output.to_str().unwrap(),
        "--commands_to_delete",
        "todo",
        "--keep_bib",
    ]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("Wrote 3 TeX files"));
    assert!(!read(&output, "main.tex").contains("remove me"));
    assert!(output.join("refs.bib").is_file());
}

#[test]
fn config_file_and_command_line_are_merged() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");
    write(
        dir.path(),
        "cleaner.yaml",
        "commands_only_to_delete:\n  - red\nkeep_bib: false\n",
    );
    let config = dir.path().join("cleaner.yaml");

    let assert = assert_cmd::Command::cargo_bin("texclean")
        .unwrap()
        .args([
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--output-folder",
            output.to_str().unwrap(),
            "--commands-to-delete",
            "todo",
        ])
        .assert();
    assert.success();

    assert!(read(&output, "sections/intro.tex").starts_with("Intro highlighted\n"));
    assert!(!read(&output, "main.tex").contains("remove me"));
}

// ============================================================================
// Logging Tests
// ============================================================================

#[test]
fn verbose_from_config_file_enables_step_logs() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");
    write(dir.path(), "cleaner.yaml", "verbose: true\n");
    let config = dir.path().join("cleaner.yaml");

    let (_stdout, stderr, exit_code) = run_texclean(&[
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--output-folder",
        output.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("Collecting file structure"));
}

#[test]
fn quiet_by_default() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");

    let (_stdout, stderr, exit_code) = run_texclean(&[
        input.to_str().unwrap(),
        "--output-folder",
        output.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    assert!(!stderr.contains("Collecting file structure"));
}
