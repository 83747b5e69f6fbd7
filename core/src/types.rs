//! Caller-facing parameter types, one per endpoint that takes input.
//!
//! # Design
//! Field names follow the client's naming, not the node's wire names; the
//! mapping to wire fields lives in `wire`. Required parameters use plain
//! types whose zero value means "not provided" (empty string, `0`, empty
//! collection), so `Default` yields a params value that fails validation on
//! its first required field. Booleans that are required are `Option<bool>`
//! because `false` is a real answer. Optional parameters are `Option<T>` and
//! are left off the wire when unset.
//!
//! Every type deserializes from camelCase JSON with all fields defaulted,
//! which is how test vectors and the CLI feed them.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Input for `is-hodling-public-key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IsHodlingParams {
    pub public_key: String,
    pub is_hodling_public_key: String,
}

/// Input for `get-single-profile`. At least one of the two must be set;
/// `public_key` wins when both are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SingleProfileParams {
    pub public_key: Option<String>,
    pub username: Option<String>,
}

/// Input for `get-users-stateless`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsersStatelessParams {
    pub public_keys: Vec<String>,
}

/// Input for `get-follows-stateless`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FollowsStatelessParams {
    pub public_key: String,
    /// `true` lists who the user follows, `false` lists their followers.
    pub get_entries_following_username: Option<bool>,
    pub num_to_fetch: u64,
}

/// Input for `get-hodlers-for-public-key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoldersParams {
    pub public_key: Option<String>,
    pub username: Option<String>,
    pub num_to_fetch: u64,
    /// List what the user holds instead of who holds the user.
    pub fetch_hodlings: Option<bool>,
    /// Pagination cursor: the last public key of the previous page.
    pub last_public_key: Option<String>,
    pub fetch_all: Option<bool>,
}

/// Input for `get-notifications`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationsParams {
    pub public_key: String,
    /// Index to page back from; `-1` starts at the newest notification.
    pub fetch_start_index: i64,
    pub num_to_fetch: u64,
}

/// Input for `get-txn`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionParams {
    pub txn_hash_hex: String,
}

/// Input for `submit-transaction`. The hex is a signed transaction and is
/// forwarded as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitTransactionParams {
    pub transaction_hex: String,
}

/// Input for `authorize-derived-key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthorizeDerivedKeyParams {
    pub owner_public_key_base58_check: String,
    pub derived_public_key_base58_check: String,
    pub expiration_block: u64,
    pub access_signature: String,
    /// Required. `Some(false)` authorizes, `Some(true)` de-authorizes.
    pub delete_key: Option<bool>,
    pub derived_key_signature: Option<bool>,
    #[serde(rename = "minFeeRateNanosPerKB")]
    pub min_fee_rate_nanos_per_kb: u64,
}

/// Input for `append-extra-data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppendExtraDataParams {
    pub transaction_hex: String,
    pub extra_data: BTreeMap<String, String>,
}

/// Input for `get-user-derived-keys`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDerivedKeysParams {
    pub public_key_base58_check: String,
}
