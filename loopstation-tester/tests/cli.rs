use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "loopstation-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_loopstation-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("clear-malfunctioning"));
}

#[test]
fn cli_runs_all_scenarios_and_passes() {
    let exe = env!("CARGO_BIN_EXE_loopstation-tester");
    let output = Command::new(exe)
        .args(["--seeds", "1337,42", "--iterations", "2"])
        .env("NO_COLOR", "1")
        .output()
        .expect("run cli");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "tester failed:\n{stdout}");
    assert!(stdout.contains("PASS Launch Pod"));
    assert!(stdout.contains("ALL TESTS: PASS"));
    assert!(!stdout.contains("FAIL "));
}

#[test]
fn cli_json_report_lists_each_seed() {
    let exe = env!("CARGO_BIN_EXE_loopstation-tester");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--scenarios",
            "empty-station-launch,malfunction-soak",
            "--seeds",
            "1,2,3",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(parsed.as_array().map(Vec::len), Some(6));
}

#[test]
fn cli_rejects_bad_seed() {
    let exe = env!("CARGO_BIN_EXE_loopstation-tester");
    let output = Command::new(exe)
        .args(["--seeds", "not-a-seed"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid seed"));
}
