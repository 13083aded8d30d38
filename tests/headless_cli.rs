use std::process::Command;

fn temp_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("raypanel-{}-{name}", std::process::id()))
}

#[test]
fn scripted_demo_run_writes_activations() {
    let event_log = temp_file("events.jsonl");
    let output = Command::new(env!("CARGO_BIN_EXE_raypanel"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args([
            "--scripted-input",
            "scripts/demo_input.json",
            "--event-log",
            event_log.to_str().unwrap(),
        ])
        .output()
        .expect("run raypanel");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Command 1 sent"), "stdout: {stdout}");
    assert!(stdout.contains("Command 2 Sent."), "stdout: {stdout}");
    assert!(stdout.contains("GLB SOS toggled"), "stdout: {stdout}");

    let events = std::fs::read_to_string(&event_log).expect("event log written");
    let labels: Vec<String> = events
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("json line");
            assert_eq!(value["kind"], "activation");
            let payload: serde_json::Value =
                serde_json::from_str(value["payload"].as_str().unwrap()).unwrap();
            payload["label"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(labels, vec!["Send Command", "Toggle Grip", "GLB SOS"]);
    let _ = std::fs::remove_file(event_log);
}

#[test]
fn headless_run_without_input_or_limit_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_raypanel"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("run raypanel");
    assert!(!output.status.success());
}

#[test]
fn write_config_round_trips_overrides() {
    let path = temp_file("scene.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_raypanel"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["--controllers", "1", "--write-config", path.to_str().unwrap()])
        .output()
        .expect("run raypanel");
    assert!(output.status.success());

    let written = std::fs::read_to_string(&path).expect("config written");
    assert!(written.contains("controllers = 1"));
    assert!(written.contains("max_logs = 5"));
    let _ = std::fs::remove_file(path);
}
