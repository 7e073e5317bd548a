use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;

fn dealbrief(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dealbrief").expect("binary");
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .env("XDG_DATA_HOME", dir.join("data"))
        .arg("--db-path")
        .arg(dir.join("dealbrief.sqlite3"))
        .arg("--json");
    cmd
}

#[test]
fn add_user_ingest_and_report() {
    let dir = tempfile::tempdir().expect("tempdir");

    let out = dealbrief(dir.path())
        .args(["add-user", "--email", "owner@example.com"])
        .output()
        .expect("run add-user");
    assert!(out.status.success());
    let user: Value = serde_json::from_slice(&out.stdout).expect("user json");
    let bcc = user["bcc_address"].as_str().expect("bcc address").to_string();
    assert!(bcc.starts_with("u_"));

    let payload = serde_json::json!({
        "messageId": "m1@provider",
        "from": "Jane <jane@acme-corp.com>",
        "to": [bcc],
        "subject": "Q4 QBR"
    });
    let payload_path = dir.path().join("payload.json");
    std::fs::write(&payload_path, payload.to_string()).expect("write payload");

    let out = dealbrief(dir.path())
        .arg("ingest")
        .arg("--file")
        .arg(&payload_path)
        .output()
        .expect("run ingest");
    assert!(out.status.success());
    let report: Value = serde_json::from_slice(&out.stdout).expect("ingest json");
    assert_eq!(report["outcome"], "processed");
    assert_eq!(report["contacts"], 1);
    assert!(report["meeting"].is_string());

    let out = dealbrief(dir.path())
        .arg("ingest")
        .arg("--file")
        .arg(&payload_path)
        .output()
        .expect("run ingest again");
    assert!(out.status.success());
    let retry: Value = serde_json::from_slice(&out.stdout).expect("retry json");
    assert_eq!(retry["outcome"], "duplicate");

    let bcc = user["bcc_address"].as_str().expect("bcc address");
    let out = dealbrief(dir.path())
        .args(["report", bcc])
        .output()
        .expect("run report");
    assert!(out.status.success());
    let brief: Value = serde_json::from_slice(&out.stdout).expect("brief json");
    assert_eq!(brief["emails"], 1);
    assert_eq!(brief["new_contacts"].as_array().expect("contacts").len(), 1);
    assert_eq!(brief["meetings"].as_array().expect("meetings").len(), 1);
}

#[test]
fn report_for_unknown_address_exits_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dealbrief(dir.path())
        .args(["report", "u_ghost@in.example.com"])
        .output()
        .expect("run report");
    assert_eq!(out.status.code(), Some(2));
}
