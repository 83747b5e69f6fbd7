//! Process-wide transport sharing.
//!
//! Kept in its own test binary: the process slot is global and can only be
//! filled once, so nothing else may touch it here.

use deso_core::{ApiClient, ClientConfig, TransportScope};
use mock_server::MockNode;

async fn start_node() -> (MockNode, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let node = MockNode::new();
    tokio::spawn(mock_server::run_with(listener, node.clone()));
    (node, format!("http://{addr}/api"))
}

#[tokio::test]
async fn first_base_url_wins_for_every_process_scoped_client() {
    let (first_node, first_url) = start_node().await;
    let (second_node, second_url) = start_node().await;
    let (keyed_node, keyed_url) = start_node().await;

    let first = ApiClient::with_base_url(&first_url);
    let second = ApiClient::with_base_url(&second_url);
    assert_eq!(second.config().scope, TransportScope::Process);

    // Nothing is created until a request goes out.
    first.get_exchange_rate().await.unwrap();
    second.get_exchange_rate().await.unwrap();

    assert_eq!(first_node.requests().await.len(), 2);
    assert!(second_node.requests().await.is_empty());
    assert_eq!(second.base_url(), second_url);

    // Opting out of the process slot reaches the configured node.
    let keyed = ApiClient::with_config(ClientConfig::with_base_url(&keyed_url).scope(TransportScope::PerBaseUrl));
    keyed.get_app_state().await.unwrap();
    assert_eq!(keyed_node.requests().await.len(), 1);
    assert_eq!(first_node.requests().await.len(), 2);
}
