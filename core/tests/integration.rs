//! Every client operation against the live mock node over real HTTP.
//!
//! The mock node parses bodies with its own copies of the wire types and
//! rejects unknown fields, so these tests also catch wire-name drift.

use std::collections::BTreeMap;

use deso_core::{
    ApiClient, ApiError, AppendExtraDataParams, AuthorizeDerivedKeyParams, ClientConfig,
    FollowsStatelessParams, HoldersParams, IsHodlingParams, NotificationsParams,
    SingleProfileParams, SubmitTransactionParams, TransactionParams, TransportError,
    TransportScope, UserDerivedKeysParams, UsersStatelessParams,
};
use mock_server::MockNode;
use serde_json::json;

/// Start a mock node on a random port and return it with a client bound to it.
async fn start() -> (MockNode, ApiClient) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let node = MockNode::new();
    tokio::spawn(mock_server::run_with(listener, node.clone()));

    let config = ClientConfig::with_base_url(&format!("http://{addr}/api")).scope(TransportScope::Dedicated);
    (node, ApiClient::with_config(config))
}

#[tokio::test]
async fn read_operations() {
    let (node, client) = start().await;

    let rate = client.get_exchange_rate().await.unwrap().unwrap();
    assert_eq!(rate["USDCentsPerDeSoExchangeRate"], 850);

    let state = client.get_app_state().await.unwrap().unwrap();
    assert_eq!(state["BlockHeight"], 250_000);

    let hodling = client
        .get_is_hodling_public_key(&IsHodlingParams {
            public_key: "BC1holder".to_string(),
            is_hodling_public_key: "BC1creator".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hodling["IsHodling"], true);

    let profile = client
        .get_single_profile(&SingleProfileParams {
            username: Some("alice".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile["Profile"]["Username"], "alice");

    let users = client
        .get_users_stateless(&UsersStatelessParams {
            public_keys: vec!["BC1".to_string(), "BC2".to_string()],
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(users["UserList"].as_array().unwrap().len(), 2);

    let follows = client
        .get_follows_stateless(&FollowsStatelessParams {
            public_key: "BC1".to_string(),
            get_entries_following_username: Some(false),
            num_to_fetch: 25,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(follows["Following"], false);

    let hodlers = client
        .get_holders_for_public_key(&HoldersParams {
            public_key: Some("BC1".to_string()),
            num_to_fetch: 10,
            last_public_key: Some("BC1last".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hodlers["LastPublicKeyBase58Check"], "BC1last");
    assert_eq!(hodlers["Username"], serde_json::Value::Null);

    let notifications = client
        .get_notifications(&NotificationsParams {
            public_key: "BC1".to_string(),
            fetch_start_index: -1,
            num_to_fetch: 50,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notifications["FetchStartIndex"], -1);

    let txn = client
        .get_transaction(&TransactionParams {
            txn_hash_hex: "abcd".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(txn["TxnFound"], true);

    let keys = client
        .get_user_derived_keys(&UserDerivedKeysParams {
            public_key_base58_check: "BC1".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(keys["Owner"], "BC1");

    let requests = node.requests().await;
    assert_eq!(requests.len(), 11);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/v0/get-exchange-rate");
    assert!(requests[0].body.is_none());
    assert_eq!(requests[3].body, Some(json!({ "username": "alice" })));
}

#[tokio::test]
async fn write_operations() {
    let (node, client) = start().await;

    let submitted = client
        .submit_transaction(&SubmitTransactionParams {
            transaction_hex: "0102".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(submitted["TxnHashHex"], "hash-of-0102");

    let authorized = client
        .authorize_derived_key(&AuthorizeDerivedKeyParams {
            owner_public_key_base58_check: "BC1owner".to_string(),
            derived_public_key_base58_check: "BC1derived".to_string(),
            expiration_block: 300_000,
            access_signature: "3045".to_string(),
            delete_key: Some(false),
            derived_key_signature: None,
            min_fee_rate_nanos_per_kb: 1000,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(authorized["DeleteKey"], false);
    assert_eq!(authorized["DerivedKeySignature"], false);

    let mut extra_data = BTreeMap::new();
    extra_data.insert("App".to_string(), "demo".to_string());
    extra_data.insert("Version".to_string(), "2".to_string());
    let appended = client
        .append_extra_data(&AppendExtraDataParams {
            transaction_hex: "0102".to_string(),
            extra_data,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(appended["TransactionHex"], "0102+2");

    let requests = node.requests().await;
    assert_eq!(requests.len(), 3);
    let authorize_body = requests[1].body.as_ref().unwrap();
    assert_eq!(authorize_body["MinFeeRateNanosPerKB"], 1000);
    assert!(authorize_body.get("DerivedKeySignature").is_none());
}

#[tokio::test]
async fn validation_failure_sends_nothing() {
    let (node, client) = start().await;

    let err = client
        .get_notifications(&NotificationsParams {
            public_key: "BC1".to_string(),
            fetch_start_index: 0,
            num_to_fetch: 50,
        })
        .await
        .unwrap_err();
    assert_eq!(err.missing_field(), Some("fetch_start_index"));

    let err = client
        .authorize_derived_key(&AuthorizeDerivedKeyParams {
            owner_public_key_base58_check: "BC1owner".to_string(),
            derived_public_key_base58_check: "BC1derived".to_string(),
            expiration_block: 300_000,
            access_signature: "3045".to_string(),
            delete_key: None,
            derived_key_signature: None,
            min_fee_rate_nanos_per_kb: 1000,
        })
        .await
        .unwrap_err();
    assert_eq!(err.missing_field(), Some("delete_key"));

    assert!(node.requests().await.is_empty());
}

#[tokio::test]
async fn server_error_propagates_unchanged() {
    let (node, client) = start().await;
    node.fail_with(500).await;

    let err = client
        .get_transaction(&TransactionParams {
            txn_hash_hex: "abcd".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ApiError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "simulated failure");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    let err = client.get_exchange_rate().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Transport(TransportError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn unreachable_node_is_a_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::with_base_url(&format!("http://{addr}/api")).scope(TransportScope::Dedicated);
    let client = ApiClient::with_config(config);
    let err = client.get_app_state().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Request(_))));
}
