/*
[INPUT]:  rentroll-console binary, temp config files, mock server
[OUTPUT]: Verification of one-shot CLI commands
[POS]:    Integration test layer - binary entry point
[UPDATE]: When subcommands or their output change
*/

mod common;

use std::process::{Command, Output};

use common::{config_file, expense_json, list_json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rentroll-console"));
    command.env("RUST_LOG", "error").arg("--log-level").arg("error");
    command
}

/// Run the binary off the async runtime so the mock server keeps answering
async fn run(mut command: Command) -> Output {
    tokio::task::spawn_blocking(move || command.output())
        .await
        .expect("join")
        .expect("Failed to start rentroll-console binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn report_url_needs_no_server() {
    let config = config_file("http://rr.invalid:8270");
    let output = binary()
        .arg("--config")
        .arg(config.path())
        .args(["report", "view", "--url", "--start", "3/1/2024", "--stop", "4/1/2024"])
        .output()
        .expect("Failed to start rentroll-console binary");

    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/wsvc/1"), "{stdout}");
    assert!(stdout.contains("r=RPTrr"), "{stdout}");
}

#[test]
fn unknown_business_is_an_error() {
    let config = config_file("http://rr.invalid:8270");
    let output = binary()
        .arg("--config")
        .arg(config.path())
        .args(["--business", "NOPE", "report", "view", "--url"])
        .output()
        .expect("Failed to start rentroll-console binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("NOPE"));
}

#[tokio::test(flavor = "multi_thread")]
async fn expenses_list_prints_reversed_marker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/expense"))
        .and(query_param("searchDtStart", "3/1/2024"))
        .and(query_param("searchDtStop", "4/1/2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(vec![
            expense_json(7, 120.0, 4),
            expense_json(8, 1250.5, 0),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_file(&server.uri());
    let mut command = binary();
    command
        .arg("--config")
        .arg(config.path())
        .args(["expenses", "list", "--start", "3/1/2024", "--stop", "4/1/2024"]);
    let output = run(command).await;

    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("$1,250.50"), "{stdout}");
    assert!(
        stdout.lines().any(|line| line.starts_with('R') && line.contains('7')),
        "{stdout}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn report_export_writes_csv_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wsvc/1"))
        .and(query_param("r", "RPTrr"))
        .and(query_param("rtype", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a,b\n1,2\n".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_file(&server.uri());
    let out_dir = tempfile::tempdir().expect("tempdir");
    let mut command = binary();
    command
        .arg("--config")
        .arg(config.path())
        .args(["report", "export", "RPTrr", "--format", "csv"])
        .args(["--start", "2024-03-01", "--stop", "2024-04-01", "--out"])
        .arg(out_dir.path());
    let output = run(command).await;

    assert_success(&output);
    let written = std::fs::read(out_dir.path().join("RPTrr-2024-03-01-2024-04-01.csv"))
        .expect("export file");
    assert_eq!(written, b"a,b\n1,2\n".to_vec());
}
