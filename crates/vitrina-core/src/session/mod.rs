//! Session bootstrap: the verifier that trades init data for a token and
//! the store that holds the result for the rest of the process.

pub mod store;
pub mod verifier;

pub use store::{initial_admin_mode, ActiveSession, SessionStore};
pub use verifier::{wait_for_payload, LoginApi, SessionVerifier, VerifiedSession};
