//! Vitrina core: client side of the Telegram Mini App storefront
//!
//! # Module Structure
//!
//! - `config`: figment-backed configuration (defaults, `vitrina.toml`, `VITRINA_*` env)
//! - `error`: error taxonomy shared by every layer
//! - `logging`: tracing subscriber setup
//! - `host`: host chat client boundary (init data, ready signal)
//! - `storage`: durable key-value storage for the credential and UI preferences
//! - `session`: verifier (init data → token) and the session store
//! - `guard`: route guard that mounts protected views after verification
//! - `gateway`: typed REST client for auth, catalog, broadcast and uploads
//! - `model`: wire types
//! - `routes`: route table of the storefront
//! - `validation`: client-side form checks

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod host;
pub mod logging;
pub mod model;
pub mod routes;
pub mod session;
pub mod storage;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{AppError, AppResult, GatewayError, SessionError, StorageError, VerifyError};
pub use gateway::{ApiClient, BearerAuth, RequestDecorator};
pub use guard::{AuthorizedContext, GuardState, NotRendered, ProtectedView, Redirect, RouteGuard};
pub use host::{HostBridge, StaticHost};
pub use model::{CatalogEntry, Credential, EntryDraft, EntryPatch, Identity};
pub use routes::Route;
pub use session::{SessionStore, SessionVerifier};
