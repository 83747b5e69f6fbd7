//! Request builders, response unwrapping, and the async operations that tie
//! them to a transport.
//!
//! # Design
//! Every endpoint has a `build_*` method that validates its params and
//! produces an `HttpRequest`, plus an async method that sends it and returns
//! the unwrapped response body. Validation lives only in `build_*`, so a
//! request with a missing parameter never reaches a transport. The body the
//! node returns is handed back as an opaque `serde_json::Value`.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;

use crate::config::{normalize_base_url, ClientConfig, TransportScope};
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{self, Transport};
use crate::types::{
    AppendExtraDataParams, AuthorizeDerivedKeyParams, FollowsStatelessParams, HoldersParams,
    IsHodlingParams, NotificationsParams, SingleProfileParams, SubmitTransactionParams,
    TransactionParams, UserDerivedKeysParams, UsersStatelessParams,
};
use crate::validation::{non_empty, require, require_set};
use crate::wire;

/// Endpoint paths, relative to the base URL.
pub mod routes {
    pub const GET_EXCHANGE_RATE: &str = "/v0/get-exchange-rate";
    pub const GET_APP_STATE: &str = "/v0/get-app-state";
    pub const IS_HODLING_PUBLIC_KEY: &str = "/v0/is-hodling-public-key";
    pub const GET_SINGLE_PROFILE: &str = "/v0/get-single-profile";
    pub const GET_USERS_STATELESS: &str = "/v0/get-users-stateless";
    pub const GET_FOLLOWS_STATELESS: &str = "/v0/get-follows-stateless";
    pub const GET_HODLERS_FOR_PUBLIC_KEY: &str = "/v0/get-hodlers-for-public-key";
    pub const GET_NOTIFICATIONS: &str = "/v0/get-notifications";
    pub const GET_TXN: &str = "/v0/get-txn";
    pub const SUBMIT_TRANSACTION: &str = "/v0/submit-transaction";
    pub const AUTHORIZE_DERIVED_KEY: &str = "/v0/authorize-derived-key";
    pub const APPEND_EXTRA_DATA: &str = "/v0/append-extra-data";
    pub const GET_USER_DERIVED_KEYS: &str = "/v0/get-user-derived-keys";
}

/// Typed client for the node's public REST API.
///
/// Cheap to construct: no transport exists until the first request is sent.
/// Which transport that is depends on [`ClientConfig::scope`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: OnceCell<Arc<dyn Transport>>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Client for the public node with default settings.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_config(ClientConfig::with_base_url(base_url))
    }

    pub fn with_config(mut config: ClientConfig) -> Self {
        config.base_url = normalize_base_url(&config.base_url);
        Self {
            config,
            transport: OnceCell::new(),
        }
    }

    /// Client that sends everything through `transport`, bypassing the
    /// shared registry. The transport's base URL becomes the client's and
    /// the scope reads as [`TransportScope::Dedicated`].
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let config = ClientConfig::with_base_url(transport.base_url()).scope(TransportScope::Dedicated);
        Self {
            config,
            transport: OnceCell::with_value(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_get_exchange_rate(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: routes::GET_EXCHANGE_RATE.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_app_state(&self) -> Result<HttpRequest, ApiError> {
        post(routes::GET_APP_STATE, &wire::Empty {})
    }

    pub fn build_get_is_hodling_public_key(&self, params: &IsHodlingParams) -> Result<HttpRequest, ApiError> {
        require(&params.public_key, "public_key")?;
        require(&params.is_hodling_public_key, "is_hodling_public_key")?;
        post(
            routes::IS_HODLING_PUBLIC_KEY,
            &wire::IsHodlingBody {
                public_key_base58_check: &params.public_key,
                is_hodling_public_key_base58_check: &params.is_hodling_public_key,
            },
        )
    }

    pub fn build_get_single_profile(&self, params: &SingleProfileParams) -> Result<HttpRequest, ApiError> {
        let body = match (non_empty(&params.public_key), non_empty(&params.username)) {
            (Some(public_key), _) => wire::SingleProfileBody::PublicKey(public_key),
            (None, Some(username)) => wire::SingleProfileBody::Username(username),
            (None, None) => {
                return Err(ApiError::Validation {
                    field: "public_key_or_username",
                })
            }
        };
        post(routes::GET_SINGLE_PROFILE, &body)
    }

    pub fn build_get_users_stateless(&self, params: &UsersStatelessParams) -> Result<HttpRequest, ApiError> {
        require(&params.public_keys, "public_keys")?;
        post(
            routes::GET_USERS_STATELESS,
            &wire::UsersStatelessBody {
                public_keys_base58_check: &params.public_keys,
                skip_for_leaderboard: true,
            },
        )
    }

    /// `get_entries_following_username` must be set, but `false` counts as
    /// set: it asks for the user's followers rather than who they follow.
    pub fn build_get_follows_stateless(&self, params: &FollowsStatelessParams) -> Result<HttpRequest, ApiError> {
        require(&params.public_key, "public_key")?;
        let following = require_set(params.get_entries_following_username, "get_entries_following_username")?;
        require(&params.num_to_fetch, "num_to_fetch")?;
        post(
            routes::GET_FOLLOWS_STATELESS,
            &wire::FollowsStatelessBody {
                public_key_base58_check: &params.public_key,
                get_entries_following_username: following,
                num_to_fetch: params.num_to_fetch,
            },
        )
    }

    pub fn build_get_holders_for_public_key(&self, params: &HoldersParams) -> Result<HttpRequest, ApiError> {
        require(&params.num_to_fetch, "num_to_fetch")?;
        let public_key = non_empty(&params.public_key);
        let username = non_empty(&params.username);
        if public_key.is_none() && username.is_none() {
            return Err(ApiError::Validation {
                field: "public_key_or_username",
            });
        }
        post(
            routes::GET_HODLERS_FOR_PUBLIC_KEY,
            &wire::HoldersBody {
                username,
                fetch_all: params.fetch_all,
                public_key_base58_check: public_key,
                num_to_fetch: params.num_to_fetch,
                last_public_key_base58_check: non_empty(&params.last_public_key),
                fetch_hodlings: params.fetch_hodlings,
            },
        )
    }

    pub fn build_get_notifications(&self, params: &NotificationsParams) -> Result<HttpRequest, ApiError> {
        require(&params.public_key, "public_key")?;
        require(&params.fetch_start_index, "fetch_start_index")?;
        require(&params.num_to_fetch, "num_to_fetch")?;
        post(
            routes::GET_NOTIFICATIONS,
            &wire::NotificationsBody {
                public_key_base58_check: &params.public_key,
                fetch_start_index: params.fetch_start_index,
                num_to_fetch: params.num_to_fetch,
            },
        )
    }

    pub fn build_get_transaction(&self, params: &TransactionParams) -> Result<HttpRequest, ApiError> {
        require(&params.txn_hash_hex, "txn_hash_hex")?;
        post(
            routes::GET_TXN,
            &wire::TxnBody {
                txn_hash_hex: &params.txn_hash_hex,
            },
        )
    }

    pub fn build_submit_transaction(&self, params: &SubmitTransactionParams) -> Result<HttpRequest, ApiError> {
        require(&params.transaction_hex, "transaction_hex")?;
        post(
            routes::SUBMIT_TRANSACTION,
            &wire::SubmitTransactionBody {
                transaction_hex: &params.transaction_hex,
            },
        )
    }

    pub fn build_authorize_derived_key(&self, params: &AuthorizeDerivedKeyParams) -> Result<HttpRequest, ApiError> {
        require(&params.owner_public_key_base58_check, "owner_public_key_base58_check")?;
        require(&params.derived_public_key_base58_check, "derived_public_key_base58_check")?;
        require(&params.expiration_block, "expiration_block")?;
        require(&params.access_signature, "access_signature")?;
        let delete_key = require_set(params.delete_key, "delete_key")?;
        require(&params.min_fee_rate_nanos_per_kb, "min_fee_rate_nanos_per_kb")?;
        post(
            routes::AUTHORIZE_DERIVED_KEY,
            &wire::AuthorizeDerivedKeyBody {
                owner_public_key_base58_check: &params.owner_public_key_base58_check,
                derived_public_key_base58_check: &params.derived_public_key_base58_check,
                expiration_block: params.expiration_block,
                access_signature: &params.access_signature,
                delete_key,
                derived_key_signature: params.derived_key_signature,
                min_fee_rate_nanos_per_kb: params.min_fee_rate_nanos_per_kb,
            },
        )
    }

    pub fn build_append_extra_data(&self, params: &AppendExtraDataParams) -> Result<HttpRequest, ApiError> {
        require(&params.transaction_hex, "transaction_hex")?;
        require(&params.extra_data, "extra_data")?;
        post(
            routes::APPEND_EXTRA_DATA,
            &wire::AppendExtraDataBody {
                transaction_hex: &params.transaction_hex,
                extra_data: &params.extra_data,
            },
        )
    }

    pub fn build_get_user_derived_keys(&self, params: &UserDerivedKeysParams) -> Result<HttpRequest, ApiError> {
        require(&params.public_key_base58_check, "public_key_base58_check")?;
        post(
            routes::GET_USER_DERIVED_KEYS,
            &wire::UserDerivedKeysBody {
                public_key_base58_check: &params.public_key_base58_check,
            },
        )
    }

    // -----------------------------------------------------------------------
    // Response handling
    // -----------------------------------------------------------------------

    /// Unwrap a response into its JSON body.
    ///
    /// An empty or `null` body is a successful call with no result.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Option<Value>, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        let data: Value = serde_json::from_str(&response.body).map_err(TransportError::Decode)?;
        Ok(match data {
            Value::Null => None,
            data => Some(data),
        })
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Current DeSo/USD and BTC exchange rates.
    pub async fn get_exchange_rate(&self) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_exchange_rate();
        self.execute(request).await
    }

    /// Node-wide settings such as fee rates and the current block height.
    pub async fn get_app_state(&self) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_app_state()?;
        self.execute(request).await
    }

    /// Whether `public_key` holds the creator coin of `is_hodling_public_key`.
    pub async fn get_is_hodling_public_key(&self, params: &IsHodlingParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_is_hodling_public_key(params)?;
        self.execute(request).await
    }

    pub async fn get_single_profile(&self, params: &SingleProfileParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_single_profile(params)?;
        self.execute(request).await
    }

    pub async fn get_users_stateless(&self, params: &UsersStatelessParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_users_stateless(params)?;
        self.execute(request).await
    }

    /// Followers, or followed users when `get_entries_following_username`
    /// is `true`. An explicit `false` is accepted; only `None` is rejected.
    pub async fn get_follows_stateless(&self, params: &FollowsStatelessParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_follows_stateless(params)?;
        self.execute(request).await
    }

    pub async fn get_holders_for_public_key(&self, params: &HoldersParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_holders_for_public_key(params)?;
        self.execute(request).await
    }

    pub async fn get_notifications(&self, params: &NotificationsParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_notifications(params)?;
        self.execute(request).await
    }

    /// Look up a transaction by hash, including whether it is in the mempool.
    pub async fn get_transaction(&self, params: &TransactionParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_transaction(params)?;
        self.execute(request).await
    }

    pub async fn submit_transaction(&self, params: &SubmitTransactionParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_submit_transaction(params)?;
        self.execute(request).await
    }

    /// Build an authorize (or, with `delete_key: Some(true)`, revoke)
    /// derived-key transaction. Signing it is up to the caller.
    pub async fn authorize_derived_key(&self, params: &AuthorizeDerivedKeyParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_authorize_derived_key(params)?;
        self.execute(request).await
    }

    pub async fn append_extra_data(&self, params: &AppendExtraDataParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_append_extra_data(params)?;
        self.execute(request).await
    }

    pub async fn get_user_derived_keys(&self, params: &UserDerivedKeysParams) -> Result<Option<Value>, ApiError> {
        let request = self.build_get_user_derived_keys(params)?;
        self.execute(request).await
    }

    async fn execute(&self, request: HttpRequest) -> Result<Option<Value>, ApiError> {
        let transport = self.transport()?;
        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            base_url = %transport.base_url(),
            "sending request"
        );
        let response = transport.send(request).await?;
        self.parse_response(response)
    }

    fn transport(&self) -> Result<Arc<dyn Transport>, TransportError> {
        self.transport
            .get_or_try_init(|| transport::resolve(&self.config))
            .map(Arc::clone)
    }
}

fn post<B: Serialize>(path: &str, body: &B) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(body).map_err(ApiError::Serialization)?;
    Ok(HttpRequest {
        method: HttpMethod::Post,
        path: path.to_string(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn check_status(response: &HttpResponse) -> Result<(), TransportError> {
    if response.is_success() {
        return Ok(());
    }
    Err(TransportError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
