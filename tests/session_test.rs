use std::sync::Arc;

use codepad::client::mock::StubTransport;
use codepad::client::{ExecutionClient, ExecutionOutcome, ServerReply, TransportError};
use codepad::consts::{CODE_KEY, LANGUAGE_KEY, MAX_TEST_CASES};
use codepad::files;
use codepad::languages;
use codepad::session::{RunStatus, Session};
use codepad::store::KvStore;
use codepad::store::sqlite::SqliteStore;

fn temp_store() -> (Arc<dyn KvStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("codepad.db");
    let store = SqliteStore::open(path.to_str().unwrap()).unwrap();
    (Arc::new(store), dir)
}

fn session(store: Arc<dyn KvStore>, replies: Vec<Result<ServerReply, TransportError>>) -> Session {
    let client = ExecutionClient::new(Box::new(StubTransport::new(replies)), "test-key");
    Session::new(client, store)
}

#[test]
fn code_and_language_survive_restart() {
    let (store, _dir) = temp_store();
    {
        let s = session(store.clone(), vec![]);
        s.select_language("java").unwrap();
        s.set_code("class Main {}");
    }

    let s = session(store, vec![]);
    assert_eq!(s.language().id, "java");
    assert_eq!(s.code(), "class Main {}");
    assert_eq!(s.test_cases(), [""]);
    assert!(s.results().is_empty());
}

#[test]
fn stored_values_are_json() {
    let (store, _dir) = temp_store();
    let s = session(store.clone(), vec![]);
    s.select_language("go").unwrap();
    s.set_code("package main");

    assert_eq!(store.get(CODE_KEY).unwrap().unwrap(), "\"package main\"");
    let record: serde_json::Value =
        serde_json::from_str(&store.get(LANGUAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(record["id"], "go");
}

#[test]
fn corrupt_state_falls_back_to_defaults() {
    let (store, _dir) = temp_store();
    store.set(CODE_KEY, "{not json").unwrap();
    store.set(LANGUAGE_KEY, "[1, 2").unwrap();

    let s = session(store, vec![]);
    let default = languages::default_language();
    assert_eq!(s.language().id, default.id);
    assert_eq!(s.code(), default.boilerplate);
}

#[test]
fn unknown_persisted_language_resolves_to_default() {
    let (store, _dir) = temp_store();
    store
        .set(LANGUAGE_KEY, r#"{"id":"cobol","label":"COBOL"}"#)
        .unwrap();

    let s = session(store, vec![]);
    assert_eq!(s.language().id, languages::default_language().id);
}

#[test]
fn test_case_bounds_hold() {
    let (store, _dir) = temp_store();
    let s = session(store, vec![]);

    assert!(!s.remove_test_case(0));
    assert_eq!(s.test_cases().len(), 1);

    for _ in 1..MAX_TEST_CASES {
        assert!(s.add_test_case());
    }
    assert!(!s.add_test_case());
    assert_eq!(s.test_cases().len(), MAX_TEST_CASES);

    assert!(s.set_test_case(3, "42"));
    assert!(s.remove_test_case(0));
    assert_eq!(s.test_cases()[2], "42");
}

#[tokio::test]
async fn run_sends_one_input_per_case() {
    let (store, _dir) = temp_store();
    let stub = Arc::new(StubTransport::new(vec![Ok(ServerReply::ok(vec![
        "3".to_string(),
        "7".to_string(),
    ]))]));
    let client = ExecutionClient::new(Box::new(stub.clone()), "test-key");
    let s = Session::new(client, store);

    s.select_language("cpp").unwrap();
    s.set_test_case(0, "1 2");
    s.add_test_case();
    s.set_test_case(1, "3 4");

    let status = s.run().await;
    assert_eq!(
        status,
        RunStatus::Completed(ExecutionOutcome::Success {
            outputs: vec!["3".to_string(), "7".to_string()],
        })
    );

    let request = &stub.requests()[0];
    assert_eq!(request["language"], languages::find("cpp").unwrap().api_id);
    assert_eq!(request["inputs"], serde_json::json!(["1 2", "3 4"]));
    assert_eq!(request["key"], "test-key");
}

#[tokio::test]
async fn server_error_message_becomes_result() {
    let (store, _dir) = temp_store();
    let s = session(
        store,
        vec![Err(TransportError::Status {
            code: 502,
            message: None,
        })],
    );

    s.run().await;
    assert_eq!(
        s.results(),
        ["Server error: Please check the server logs for details."]
    );
}

#[tokio::test]
async fn load_then_save_round_trips_source() {
    let (store, dir) = temp_store();
    let s = session(store, vec![]);

    let source = dir.path().join("main.py");
    std::fs::write(&source, "print(input())\n").unwrap();
    let bytes = files::load_into(&s, &source).await.unwrap();
    assert_eq!(bytes, 15);
    assert_eq!(s.code(), "print(input())\n");

    let target = dir.path().join("out.py");
    let written = files::save_from(&s, target.to_str().unwrap()).await.unwrap();
    assert_eq!(std::fs::read_to_string(written).unwrap(), "print(input())\n");
}

#[tokio::test]
async fn load_missing_file_keeps_source() {
    let (store, dir) = temp_store();
    let s = session(store, vec![]);
    s.set_code("unchanged");

    let err = files::load_into(&s, &dir.path().join("nope.py"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("nope.py"));
    assert_eq!(s.code(), "unchanged");
}
