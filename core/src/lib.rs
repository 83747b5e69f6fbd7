//! Typed async client for a DeSo node's public REST API.
//!
//! # Overview
//! Covers exchange rates, app state, profile and user lookups, the social
//! graph, notifications, transaction lookup and submission, and derived-key
//! authorization. Each operation validates its required parameters, maps
//! them onto the node's wire field names, sends the request, and returns the
//! response body untouched as JSON.
//!
//! # Design
//! - Each operation is split into `build_*` (validation and mapping, no I/O)
//!   and an async method that sends the built request, so the request side
//!   can be tested without a network.
//! - All I/O goes through the [`Transport`] trait. Transports are created
//!   lazily and, by default, shared process-wide; see [`TransportScope`].
//! - Response bodies are not modelled: the node documents them, and this
//!   crate passes them through as `serde_json::Value`.
//!
//! ```no_run
//! use deso_core::{ApiClient, SingleProfileParams};
//!
//! # async fn example() -> Result<(), deso_core::ApiError> {
//! let client = ApiClient::new();
//! let profile = client
//!     .get_single_profile(&SingleProfileParams {
//!         username: Some("diamondhands".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{profile:?}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
mod validation;
mod wire;

pub use client::{routes, ApiClient};
pub use config::{ClientConfig, TransportScope, DEFAULT_BASE_URL};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{HttpTransport, Transport};
pub use types::{
    AppendExtraDataParams, AuthorizeDerivedKeyParams, FollowsStatelessParams, HoldersParams,
    IsHodlingParams, NotificationsParams, SingleProfileParams, SubmitTransactionParams,
    TransactionParams, UserDerivedKeysParams, UsersStatelessParams,
};
