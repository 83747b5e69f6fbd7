//! In-process stand-in for a DeSo node's `/api/v0` routes.
//!
//! Request bodies are parsed into this crate's own copies of the node's
//! request types, with unknown fields rejected, so a client that drifts from
//! the wire names gets a 422 instead of a silent pass. Every request is
//! recorded, and the node can be told to fail everything with a fixed status.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// A request as the mock node saw it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

/// Shared state: the request log and the failure switch.
#[derive(Clone, Debug, Default)]
pub struct MockNode {
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    failure: Arc<RwLock<Option<StatusCode>>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Answer every subsequent request with `status`. Codes axum cannot
    /// represent become 500.
    pub async fn fail_with(&self, status: u16) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        *self.failure.write().await = Some(status);
    }

    async fn record(&self, method: &str, path: &str, body: Option<Value>) -> Result<(), ApiFailure> {
        tracing::info!(method, path, "mock node request");
        self.requests.write().await.push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            body,
        });
        match *self.failure.read().await {
            Some(status) => Err((status, "simulated failure".to_string())),
            None => Ok(()),
        }
    }
}

type ApiFailure = (StatusCode, String);
type ApiResult = Result<Json<Value>, ApiFailure>;

// ---------------------------------------------------------------------------
// Wire request types, kept independent of the client crate.
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppStateRequest {}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct IsHodlingRequest {
    pub public_key_base58_check: String,
    pub is_hodling_public_key_base58_check: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleProfileRequest {
    #[serde(rename = "PublicKeyBase58Check")]
    pub public_key_base58_check: Option<String>,
    pub username: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct UsersStatelessRequest {
    pub public_keys_base58_check: Vec<String>,
    pub skip_for_leaderboard: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct FollowsStatelessRequest {
    pub public_key_base58_check: String,
    pub get_entries_following_username: bool,
    pub num_to_fetch: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct HodlersRequest {
    pub username: Option<String>,
    pub fetch_all: Option<bool>,
    pub public_key_base58_check: Option<String>,
    pub num_to_fetch: u64,
    pub last_public_key_base58_check: Option<String>,
    pub fetch_hodlings: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct NotificationsRequest {
    pub public_key_base58_check: String,
    pub fetch_start_index: i64,
    pub num_to_fetch: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct TxnRequest {
    pub txn_hash_hex: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct SubmitTransactionRequest {
    pub transaction_hex: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct AuthorizeDerivedKeyRequest {
    pub owner_public_key_base58_check: String,
    pub derived_public_key_base58_check: String,
    pub expiration_block: u64,
    pub access_signature: String,
    pub delete_key: bool,
    pub derived_key_signature: Option<bool>,
    #[serde(rename = "MinFeeRateNanosPerKB")]
    pub min_fee_rate_nanos_per_kb: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct AppendExtraDataRequest {
    pub transaction_hex: String,
    pub extra_data: std::collections::BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct UserDerivedKeysRequest {
    pub public_key_base58_check: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Router with a fresh `MockNode`.
pub fn app() -> Router {
    app_with(MockNode::new())
}

pub fn app_with(node: MockNode) -> Router {
    Router::new()
        .route("/api/v0/get-exchange-rate", get(exchange_rate))
        .route("/api/v0/get-app-state", post(app_state))
        .route("/api/v0/is-hodling-public-key", post(is_hodling))
        .route("/api/v0/get-single-profile", post(single_profile))
        .route("/api/v0/get-users-stateless", post(users_stateless))
        .route("/api/v0/get-follows-stateless", post(follows_stateless))
        .route("/api/v0/get-hodlers-for-public-key", post(hodlers))
        .route("/api/v0/get-notifications", post(notifications))
        .route("/api/v0/get-txn", post(txn))
        .route("/api/v0/submit-transaction", post(submit_transaction))
        .route("/api/v0/authorize-derived-key", post(authorize_derived_key))
        .route("/api/v0/append-extra-data", post(append_extra_data))
        .route("/api/v0/get-user-derived-keys", post(user_derived_keys))
        .with_state(node)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockNode::new()).await
}

pub async fn run_with(listener: TcpListener, node: MockNode) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(node)).await
}

/// Record a POST, parse its body as `T`, and build the reply.
async fn handle<T: DeserializeOwned>(
    node: &MockNode,
    path: &str,
    body: Value,
    respond: impl FnOnce(T) -> Value,
) -> ApiResult {
    node.record("POST", path, Some(body.clone())).await?;
    let input: T = serde_json::from_value(body)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    Ok(Json(respond(input)))
}

async fn exchange_rate(State(node): State<MockNode>) -> ApiResult {
    node.record("GET", "/api/v0/get-exchange-rate", None).await?;
    Ok(Json(json!({
        "SatoshisPerDeSoExchangeRate": 26_000,
        "USDCentsPerDeSoExchangeRate": 850,
        "USDCentsPerBitcoinExchangeRate": 3_000_000
    })))
}

async fn app_state(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/get-app-state", body, |_: AppStateRequest| {
        json!({
            "MinSatoshisBurnedForProfileCreation": 50_000,
            "BlockHeight": 250_000,
            "DefaultFeeRateNanosPerKB": 1000
        })
    })
    .await
}

async fn is_hodling(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/is-hodling-public-key", body, |req: IsHodlingRequest| {
        json!({ "IsHodling": req.public_key_base58_check != req.is_hodling_public_key_base58_check })
    })
    .await
}

async fn single_profile(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/get-single-profile", body, |req: SingleProfileRequest| {
        json!({
            "Profile": {
                "PublicKeyBase58Check": req.public_key_base58_check.unwrap_or_else(|| "BC1YLmock".to_string()),
                "Username": req.username.unwrap_or_else(|| "mock".to_string())
            }
        })
    })
    .await
}

async fn users_stateless(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/get-users-stateless", body, |req: UsersStatelessRequest| {
        let users: Vec<Value> = req
            .public_keys_base58_check
            .into_iter()
            .map(|pk| json!({ "PublicKeyBase58Check": pk }))
            .collect();
        json!({ "UserList": users })
    })
    .await
}

async fn follows_stateless(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/get-follows-stateless", body, |req: FollowsStatelessRequest| {
        json!({
            "PublicKeyToProfileEntry": {},
            "NumFollowers": req.num_to_fetch,
            "Following": req.get_entries_following_username
        })
    })
    .await
}

async fn hodlers(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/get-hodlers-for-public-key", body, |req: HodlersRequest| {
        json!({
            "Hodlers": [],
            "LastPublicKeyBase58Check": req.last_public_key_base58_check.unwrap_or_default(),
            "FetchHodlings": req.fetch_hodlings.unwrap_or(false),
            "FetchAll": req.fetch_all.unwrap_or(false),
            "Requested": req.num_to_fetch,
            "Username": req.username,
            "PublicKeyBase58Check": req.public_key_base58_check
        })
    })
    .await
}

async fn notifications(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/get-notifications", body, |req: NotificationsRequest| {
        json!({
            "Notifications": [],
            "FetchStartIndex": req.fetch_start_index,
            "PublicKeyBase58Check": req.public_key_base58_check,
            "NumToFetch": req.num_to_fetch
        })
    })
    .await
}

async fn txn(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/get-txn", body, |req: TxnRequest| {
        json!({ "TxnFound": !req.txn_hash_hex.is_empty() })
    })
    .await
}

async fn submit_transaction(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/submit-transaction", body, |req: SubmitTransactionRequest| {
        json!({ "TxnHashHex": format!("hash-of-{}", req.transaction_hex) })
    })
    .await
}

async fn authorize_derived_key(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/authorize-derived-key", body, |req: AuthorizeDerivedKeyRequest| {
        json!({
            "TransactionHex": "01",
            "SpendAmountNanos": 0,
            "FeeNanos": req.min_fee_rate_nanos_per_kb,
            "DeleteKey": req.delete_key,
            "DerivedKeySignature": req.derived_key_signature.unwrap_or(false),
            "Owner": req.owner_public_key_base58_check,
            "Derived": req.derived_public_key_base58_check,
            "ExpirationBlock": req.expiration_block,
            "AccessSignature": req.access_signature
        })
    })
    .await
}

async fn append_extra_data(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/append-extra-data", body, |req: AppendExtraDataRequest| {
        json!({
            "TransactionHex": format!("{}+{}", req.transaction_hex, req.extra_data.len())
        })
    })
    .await
}

async fn user_derived_keys(State(node): State<MockNode>, Json(body): Json<Value>) -> ApiResult {
    handle(&node, "/api/v0/get-user-derived-keys", body, |req: UserDerivedKeysRequest| {
        json!({ "DerivedKeys": {}, "Owner": req.public_key_base58_check })
    })
    .await
}
