//! Required-parameter checks.
//!
//! A value is "present" when it is non-empty / non-zero, mirroring how the
//! node's reference clients treat their inputs: `numToFetch: 0` and an
//! empty string both count as missing. Required booleans are checked for
//! being set, not for being `true`.

use std::collections::BTreeMap;

use crate::error::ApiError;

pub(crate) trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for u64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for i64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Presence for BTreeMap<K, V> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

pub(crate) fn require<T: Presence + ?Sized>(value: &T, field: &'static str) -> Result<(), ApiError> {
    if value.is_present() {
        Ok(())
    } else {
        Err(ApiError::Validation { field })
    }
}

/// Presence check for required booleans: any `Some` passes, `Some(false)` included.
pub(crate) fn require_set<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, ApiError> {
    value.ok_or(ApiError::Validation { field })
}

/// Borrow an optional string, treating an empty one as unset.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_missing() {
        let err = require("", "public_key").unwrap_err();
        assert_eq!(err.missing_field(), Some("public_key"));
        assert!(require("BC1", "public_key").is_ok());
    }

    #[test]
    fn zero_is_missing_but_negative_sentinel_is_present() {
        assert!(require(&0u64, "num_to_fetch").is_err());
        assert!(require(&0i64, "fetch_start_index").is_err());
        assert!(require(&-1i64, "fetch_start_index").is_ok());
    }

    #[test]
    fn empty_collections_are_missing() {
        assert!(require(&Vec::<String>::new(), "public_keys").is_err());
        assert!(require(&BTreeMap::<String, String>::new(), "extra_data").is_err());
        assert!(require(&vec!["BC1".to_string()], "public_keys").is_ok());
    }

    #[test]
    fn option_of_empty_string_is_missing() {
        assert!(!Some(String::new()).is_present());
        assert!(!None::<String>.is_present());
        assert!(Some("alice".to_string()).is_present());
    }

    #[test]
    fn false_is_a_valid_required_boolean() {
        assert!(!require_set(Some(false), "delete_key").unwrap());
        let err = require_set(None::<bool>, "delete_key").unwrap_err();
        assert_eq!(err.missing_field(), Some("delete_key"));
    }

    #[test]
    fn non_empty_filters_blank_strings() {
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&Some("bob".to_string())), Some("bob"));
    }
}
