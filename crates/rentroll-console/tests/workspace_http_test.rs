/*
[INPUT]:  Mock RentRoll server, ExpenseWorkspace over the live client
[OUTPUT]: End-to-end expense grid/form flows over HTTP
[POS]:    Integration test layer - workspace against the wire format
[UPDATE]: When expense flows or request bodies change
*/

mod common;

use common::{expense_json, list_json, mount_record, mount_rules, workspace_for};
use rentroll_console::expense::grid::REVERSED_MARKER;
use rentroll_console::expense::{ConfirmPrompt, FieldEdit, FormState};
use rentroll_console::{Intent, Outcome, Step};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn posted_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .filter(|request| request.method.as_str() == "POST")
        .map(|request| serde_json::from_slice(&request.body).expect("json body"))
        .collect()
}

#[tokio::test]
async fn test_reverse_keeps_row_and_reselects_it() {
    let server = MockServer::start().await;
    mount_rules(&server).await;
    mount_record(&server, expense_json(7, 120.0, 0)).await;

    // First listing before the reversal, every later one after it
    Mock::given(method("GET"))
        .and(path("/v1/expense"))
        .and(query_param("searchDtStart", "3/1/2024"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_json(vec![expense_json(7, 120.0, 0)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/expense"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_json(vec![expense_json(7, 120.0, 4)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/expense/1/7"))
        .and(body_partial_json(json!({"cmd": "delete", "ID": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut workspace = workspace_for(&server);
    assert_eq!(workspace.refresh().await, Outcome::Refreshed { rows: 1 });
    assert_eq!(
        workspace.run(Intent::Select(7)).await,
        Outcome::Loaded { expid: 7 }
    );
    assert_eq!(workspace.form().state(), Some(FormState::Editable));

    let step = assert_ok!(workspace.begin(Intent::Reverse));
    let Step::Confirm { intent, .. } = step else {
        panic!("reversal must be confirmed");
    };
    assert_eq!(workspace.run(intent).await, Outcome::Reversed { expid: 7 });

    assert!(!workspace.form().is_open());
    assert_eq!(workspace.grid().selected(), Some(7));
    let rows = workspace.grid().rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].marker, REVERSED_MARKER);
}

#[tokio::test]
async fn test_new_expense_is_saved_without_audit_fields() {
    let server = MockServer::start().await;
    mount_rules(&server).await;
    mount_record(&server, expense_json(41, 19.99, 0)).await;
    Mock::given(method("GET"))
        .and(path("/v1/expense"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(vec![])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/expense/1/0"))
        .and(body_partial_json(json!({"cmd": "save", "record": {"ARID": 4}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "recid": 41})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut workspace = workspace_for(&server);
    workspace.refresh().await;
    assert_eq!(workspace.run(Intent::AddNew).await, Outcome::NewRecord);
    assert_eq!(workspace.form().state(), Some(FormState::New));

    assert_ok!(workspace.edit(FieldEdit::AccountRule(4)));
    assert_ok!(workspace.edit(FieldEdit::Amount(Decimal::new(1999, 2))));

    match workspace.save().await {
        Outcome::Saved(record) => assert_eq!(record.expid, 41),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!workspace.form().is_open());

    let bodies = posted_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let record = bodies[0]["record"].as_object().expect("record");
    for audit in ["LastModTime", "LastModBy", "CreateTS", "CreateBy"] {
        assert!(!record.contains_key(audit), "{audit} was submitted");
    }
}

#[tokio::test]
async fn test_failed_reload_after_save_does_not_create_twice() {
    let server = MockServer::start().await;
    mount_rules(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/expense"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_json(vec![expense_json(41, 19.99, 0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/expense/1/0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "recid": 41})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/expense/1/41"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut workspace = workspace_for(&server);
    workspace.refresh().await;
    workspace.run(Intent::AddNew).await;
    assert_ok!(workspace.edit(FieldEdit::AccountRule(4)));
    assert_ok!(workspace.edit(FieldEdit::Amount(Decimal::new(1999, 2))));

    match workspace.save().await {
        Outcome::Saved(record) => {
            assert_eq!(record.expid, 41);
            assert_eq!(record.amount, Decimal::new(1999, 2));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!workspace.form().is_open());
    assert!(!workspace.form().is_dirty());
    assert!(
        workspace
            .grid()
            .message()
            .is_some_and(|message| message.contains("Expense 41 saved"))
    );

    // Nothing is left to submit a second time
    assert!(matches!(workspace.save().await, Outcome::Rejected(_)));
    assert_eq!(posted_bodies(&server).await.len(), 1);
}

#[tokio::test]
async fn test_server_rejection_keeps_form_dirty() {
    let server = MockServer::start().await;
    mount_rules(&server).await;
    mount_record(&server, expense_json(5, 100.0, 0)).await;
    Mock::given(method("GET"))
        .and(path("/v1/expense"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_json(vec![expense_json(5, 100.0, 0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/expense/1/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "Period is closed"
        })))
        .mount(&server)
        .await;

    let mut workspace = workspace_for(&server);
    workspace.refresh().await;
    workspace.run(Intent::Select(5)).await;
    assert_ok!(workspace.edit(FieldEdit::Comment("late invoice".to_string())));

    let outcome = workspace.save().await;
    assert!(matches!(&outcome, Outcome::Rejected(message) if message.contains("Period is closed")));
    assert!(workspace.form().is_dirty());
    assert_eq!(
        workspace.begin(Intent::Close).expect("close"),
        Step::Confirm {
            prompt: ConfirmPrompt::DiscardChanges,
            intent: Intent::Close,
        }
    );
}

#[tokio::test]
async fn test_invalid_record_never_reaches_the_server() {
    let server = MockServer::start().await;
    mount_rules(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/expense"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(vec![])))
        .mount(&server)
        .await;

    let mut workspace = workspace_for(&server);
    workspace.refresh().await;
    workspace.run(Intent::AddNew).await;

    match workspace.save().await {
        Outcome::Invalid(errors) => assert_eq!(errors.len(), 2),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(posted_bodies(&server).await.is_empty());
}
