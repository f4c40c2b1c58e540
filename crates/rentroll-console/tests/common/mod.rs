/*
[INPUT]:  Mock server requirements of console tests
[OUTPUT]: Wiremock fixtures, a live-client workspace, config files
[POS]:    Test infrastructure - shared across console test modules
[UPDATE]: When the wire fixtures or config schema change
*/

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use rentroll_adapter::{ClientConfig, RentrollClient};
use rentroll_console::{Business, DateRange, ExpenseWorkspace, Session};
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

pub fn client_for(server: &MockServer) -> RentrollClient {
    RentrollClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Workspace for BID 1 / REX over March 2024, talking to the mock server
pub fn workspace_for(server: &MockServer) -> ExpenseWorkspace {
    let session = Session::new(
        Business {
            bid: 1,
            bud: "REX".to_string(),
        },
        DateRange::month_of(date(2024, 3, 1)).expect("range"),
    );
    ExpenseWorkspace::new(Arc::new(client_for(server)), session)
}

/// Server-side representation of a stored expense
pub fn expense_json(expid: i64, amount: f64, flags: u64) -> Value {
    json!({
        "recid": expid,
        "EXPID": expid,
        "ARID": 3,
        "ARName": "Repairs",
        "BID": 1,
        "BUD": "REX",
        "RID": 0,
        "RAID": 0,
        "RName": "",
        "Amount": amount,
        "Dt": "3/15/2024",
        "Comment": "roof",
        "LastModTime": "2024-03-15T09:30:00Z",
        "LastModBy": 211,
        "CreateTS": "2024-03-15T09:30:00Z",
        "CreateBy": 211,
        "FLAGS": flags
    })
}

pub fn list_json(records: Vec<Value>) -> Value {
    json!({
        "status": "success",
        "total": records.len(),
        "records": records
    })
}

pub async fn mount_rules(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/uival/1/app.ExpenseRules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "REX": [
                {"id": 3, "text": "Repairs"},
                {"id": 4, "text": "Utilities"}
            ]
        })))
        .mount(server)
        .await;
}

pub async fn mount_record(server: &MockServer, record: Value) {
    let expid = record["EXPID"].as_i64().expect("EXPID");
    Mock::given(method("GET"))
        .and(path(format!("/v1/expense/1/{expid}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "record": record
        })))
        .mount(server)
        .await;
}

/// Config file pointing the binary at `base_url`
pub fn config_file(base_url: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("tempfile");
    write!(
        file,
        "server:\n  base_url: {base_url}\n  timeout_secs: 5\nbusinesses:\n  - bid: 1\n    bud: REX\nreport:\n  default_report: RPTrr\n"
    )
    .expect("write config");
    file
}
