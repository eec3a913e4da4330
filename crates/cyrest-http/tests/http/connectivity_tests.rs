//! Connectivity resolution against live fakes.

use super::test_utilities::{FakeCyRest, FakeRelay, UNREACHABLE_ORIGIN};
use cyrest_http::{ClientConfig, ConnectivityMode, CyRestClient, FixedEnvironment};
use std::sync::Arc;

fn client(base_url: &str, relay_url: &str, interactive: bool) -> CyRestClient {
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .with_relay_url(relay_url);
    CyRestClient::new(config)
        .unwrap()
        .with_environment(Arc::new(FixedEnvironment(interactive)))
}

#[tokio::test]
async fn test_reachable_service_is_direct() {
    let service = FakeCyRest::start().await;
    let client = client(&service.base_url(), UNREACHABLE_ORIGIN, true);

    assert_eq!(client.resolve_connectivity().await, ConnectivityMode::Direct);
    assert!(client.cyrest_get("version", None, true).await.is_ok());
}

#[tokio::test]
async fn test_no_route_is_unreachable_and_sticky() {
    let base_url = format!("{UNREACHABLE_ORIGIN}/v1");
    let client = client(&base_url, UNREACHABLE_ORIGIN, true);

    assert_eq!(
        client.resolve_connectivity().await,
        ConnectivityMode::Unreachable
    );

    let err = client.commands_get("network list").await.unwrap_err();
    assert!(err.is_connectivity_error());
    assert_eq!(client.connectivity().mode(), ConnectivityMode::Unreachable);

    client.reset_connectivity();
    assert_eq!(client.connectivity().mode(), ConnectivityMode::Unknown);
}

#[tokio::test]
async fn test_relay_without_service_is_unreachable() {
    // The relay is up, but the far side cannot reach the service either.
    let relay = FakeRelay::start(None).await;
    let base_url = format!("{UNREACHABLE_ORIGIN}/v1");
    let client = client(&base_url, &relay.url(), true);

    assert_eq!(
        client.resolve_connectivity().await,
        ConnectivityMode::Unreachable
    );
    assert_eq!(relay.envelopes().len(), 1);
}

#[tokio::test]
async fn test_non_interactive_is_direct_without_probing() {
    let relay = FakeRelay::start(None).await;
    let base_url = format!("{UNREACHABLE_ORIGIN}/v1");
    let client = client(&base_url, &relay.url(), false);

    assert_eq!(client.resolve_connectivity().await, ConnectivityMode::Direct);
    assert!(relay.envelopes().is_empty());

    // A direct failure is a transport error, not a connectivity verdict.
    let err = client.cyrest_get("version", None, true).await.unwrap_err();
    assert!(!err.is_connectivity_error());
    assert!(matches!(err, cyrest_http::CyError::Transport { .. }));
}

#[tokio::test]
async fn test_clones_share_mode() {
    let service = FakeCyRest::start().await;
    let client = client(&service.base_url(), UNREACHABLE_ORIGIN, true);
    let clone = client.clone();

    client.resolve_connectivity().await;
    assert_eq!(clone.connectivity().mode(), ConnectivityMode::Direct);
}
