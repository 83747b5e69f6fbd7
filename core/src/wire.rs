//! Request bodies as the node expects them on the wire.
//!
//! The node's field names are historical (`PublicKeyBase58Check`,
//! `MinFeeRateNanosPerKB`, a lowercase `username` on one endpoint) and do
//! not match the caller-facing params. Unset optional fields are skipped,
//! never sent as `null`.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct Empty {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct IsHodlingBody<'a> {
    pub public_key_base58_check: &'a str,
    pub is_hodling_public_key_base58_check: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) enum SingleProfileBody<'a> {
    #[serde(rename = "PublicKeyBase58Check")]
    PublicKey(&'a str),
    #[serde(rename = "username")]
    Username(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct UsersStatelessBody<'a> {
    pub public_keys_base58_check: &'a [String],
    pub skip_for_leaderboard: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct FollowsStatelessBody<'a> {
    pub public_key_base58_check: &'a str,
    pub get_entries_following_username: bool,
    pub num_to_fetch: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct HoldersBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_base58_check: Option<&'a str>,
    pub num_to_fetch: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_public_key_base58_check: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_hodlings: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NotificationsBody<'a> {
    pub public_key_base58_check: &'a str,
    pub fetch_start_index: i64,
    pub num_to_fetch: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct TxnBody<'a> {
    pub txn_hash_hex: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SubmitTransactionBody<'a> {
    pub transaction_hex: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AuthorizeDerivedKeyBody<'a> {
    pub owner_public_key_base58_check: &'a str,
    pub derived_public_key_base58_check: &'a str,
    pub expiration_block: u64,
    pub access_signature: &'a str,
    pub delete_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_key_signature: Option<bool>,
    #[serde(rename = "MinFeeRateNanosPerKB")]
    pub min_fee_rate_nanos_per_kb: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AppendExtraDataBody<'a> {
    pub transaction_hex: &'a str,
    pub extra_data: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct UserDerivedKeysBody<'a> {
    pub public_key_base58_check: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_is_an_empty_object() {
        assert_eq!(serde_json::to_value(Empty {}).unwrap(), json!({}));
    }

    #[test]
    fn single_profile_body_uses_one_key() {
        let body = serde_json::to_value(SingleProfileBody::Username("alice")).unwrap();
        assert_eq!(body, json!({ "username": "alice" }));
        let body = serde_json::to_value(SingleProfileBody::PublicKey("BC1")).unwrap();
        assert_eq!(body, json!({ "PublicKeyBase58Check": "BC1" }));
    }

    #[test]
    fn fee_rate_keeps_uppercase_kb() {
        let body = serde_json::to_value(AuthorizeDerivedKeyBody {
            owner_public_key_base58_check: "BC1owner",
            derived_public_key_base58_check: "BC1derived",
            expiration_block: 10,
            access_signature: "sig",
            delete_key: false,
            derived_key_signature: None,
            min_fee_rate_nanos_per_kb: 1000,
        })
        .unwrap();
        assert_eq!(body["MinFeeRateNanosPerKB"], 1000);
        assert_eq!(body["DeleteKey"], false);
        assert!(body.get("DerivedKeySignature").is_none());
        assert!(body.get("MinFeeRateNanosPerKb").is_none());
    }

    #[test]
    fn unset_holder_options_are_omitted() {
        let body = serde_json::to_value(HoldersBody {
            username: Some("alice"),
            fetch_all: None,
            public_key_base58_check: None,
            num_to_fetch: 5,
            last_public_key_base58_check: None,
            fetch_hodlings: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "Username": "alice", "NumToFetch": 5 }));
    }
}
