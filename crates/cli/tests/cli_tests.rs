//! CLI integration tests

use std::process::Command;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "eta-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Smart Delivery ETA"), "Should show app name");
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("analyze"), "Should show analyze command");
    assert!(stdout.contains("send-email"), "Should show send-email command");
    assert!(stdout.contains("status"), "Should show status command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_cli(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("eta"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = run_cli(&["predict", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    assert!(stdout.contains("--order-type"), "Should show order type option");
    assert!(stdout.contains("--vehicle-type"), "Should show vehicle type option");
    assert!(stdout.contains("--distance"), "Should show distance option");
}

/// Test that unknown categories are rejected before any request is made
#[test]
fn test_predict_rejects_unknown_order_type() {
    let output = run_cli(&["predict", "--order-type", "Pizza"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Unknown order type should fail");
    assert!(stderr.contains("Pizza"), "Should name the rejected value");
}

/// Test analyze subcommand help
#[test]
fn test_analyze_help() {
    let output = run_cli(&["analyze", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Analyze help should succeed");
    assert!(stdout.contains("delivery"), "Should list delivery domain");
    assert!(stdout.contains("academic"), "Should list academic domain");
}

/// Test send-email subcommand help
#[test]
fn test_send_email_help() {
    let output = run_cli(&["send-email", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Send-email help should succeed");
    assert!(stdout.contains("--from-file"), "Should show from-file option");
}

/// Test that an unreachable service fails with an error message
#[test]
fn test_unreachable_service() {
    let output = run_cli(&["--api-url", "http://127.0.0.1:9", "status"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Unreachable service should fail");
    assert!(
        stderr.contains("Failed to send request"),
        "Should explain the failure"
    );
}
