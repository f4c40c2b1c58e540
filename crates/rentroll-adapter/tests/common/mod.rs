/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for rentroll-adapter tests

use rentroll_adapter::{ClientConfig, RentrollClient};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> RentrollClient {
    RentrollClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
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
        "Comment": "",
        "LastModTime": "2024-03-15T09:30:00Z",
        "LastModBy": 211,
        "CreateTS": "2024-03-15T09:30:00Z",
        "CreateBy": 211,
        "FLAGS": flags
    })
}
