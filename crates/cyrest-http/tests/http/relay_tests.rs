//! Relayed dispatch: the service is only reachable through the fake relay.

use super::test_utilities::{RelayedSetup, UNREACHABLE_ORIGIN};
use axum::http::StatusCode;
use cyrest_http::{ConnectivityMode, CyError, HttpRequest, HttpResponse, RelayError};
use serde_json::json;

async fn relayed() -> RelayedSetup {
    let setup = RelayedSetup::start().await;
    assert_eq!(
        setup.client.resolve_connectivity().await,
        ConnectivityMode::Relayed
    );
    setup
}

#[tokio::test]
async fn test_resolves_to_relayed() {
    let setup = relayed().await;
    assert_eq!(setup.client.connectivity().mode(), ConnectivityMode::Relayed);

    // The probe itself went through the relay.
    let envelopes = setup.relay.envelopes();
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0]["command"], "GET");
    assert_eq!(envelopes[0]["url"], format!("{UNREACHABLE_ORIGIN}/v1"));
}

#[tokio::test]
async fn test_commands_post_through_relay() {
    let setup = relayed().await;

    let data = setup
        .client
        .commands_post("command echo message=hi")
        .await
        .unwrap();
    assert_eq!(data["path"], "command/echo");
    assert_eq!(data["body"], json!({"message": "hi"}));

    let envelope = setup.relay.envelopes().pop().unwrap();
    assert_eq!(envelope["command"], "POST");
    assert_eq!(
        envelope["url"],
        format!("{UNREACHABLE_ORIGIN}/v1/commands/command/echo")
    );
    assert_eq!(envelope["data"], r#"{"message":"hi"}"#);
    assert_eq!(envelope["headers"]["Content-Type"], "application/json");
    assert_eq!(envelope["channel_query"], "channel=1");
}

#[tokio::test]
async fn test_commands_get_through_relay() {
    let setup = relayed().await;

    let lines = setup
        .client
        .commands_get("network list all=true")
        .await
        .unwrap();
    assert_eq!(lines, vec!["path: network/list", "param: all=true"]);

    let envelope = setup.relay.envelopes().pop().unwrap();
    assert_eq!(envelope["params"], json!({"all": "true"}));
    assert_eq!(envelope["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_unreachable_reply_status() {
    let setup = relayed().await;
    setup.relay.script_reply(r#"{"status": 0, "reason": "", "text": ""}"#);

    let err = setup.client.cyrest_get("version", None, true).await.unwrap_err();
    assert!(err.is_connectivity_error());
}

#[tokio::test]
async fn test_trailing_garbage_after_reply_is_ignored() {
    let setup = relayed().await;
    setup.relay.script_reply(
        &br#"{"status": 200, "reason": "OK", "text": "{\"data\": {\"ok\": true}, \"errors\": []}"}   junk"#[..],
    );

    let data = setup.client.commands_post("command echo").await.unwrap();
    assert_eq!(data, json!({"ok": true}));
}

#[tokio::test]
async fn test_undecipherable_reply() {
    let setup = relayed().await;
    setup.relay.script_reply("<html>bad gateway</html>");

    let err = setup.client.commands_post("command echo").await.unwrap_err();
    assert!(matches!(
        err,
        CyError::Relay(RelayError::Undecipherable { .. })
    ));
}

#[tokio::test]
async fn test_enqueue_failure() {
    let setup = relayed().await;
    setup.relay.fail_enqueue_with(StatusCode::INTERNAL_SERVER_ERROR);

    let err = setup.client.commands_post("command echo").await.unwrap_err();
    assert!(err.is_relay_error());
    match err {
        CyError::Relay(RelayError::Enqueue { status, text }) => {
            assert_eq!(status, 500);
            assert_eq!(text, "relay overloaded");
        }
        other => panic!("Expected enqueue failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dequeue_failure() {
    let setup = relayed().await;
    setup
        .relay
        .script_dequeue(StatusCode::SERVICE_UNAVAILABLE, "try later");

    let err = setup.client.commands_post("command echo").await.unwrap_err();
    match err {
        CyError::Relay(RelayError::Dequeue { status, text }) => {
            assert_eq!(status, 503);
            assert_eq!(text, "try later");
        }
        other => panic!("Expected dequeue failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bridge_send_exposes_reply() {
    let setup = RelayedSetup::start().await;

    let response = setup
        .client
        .relay()
        .send(&HttpRequest::get(format!("{UNREACHABLE_ORIGIN}/v1/version")))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.channel(), 1);
    assert_eq!(response.json().unwrap()["cytoscapeVersion"], "3.10.0");
}
