//! Outcome lines printed by pages

use std::fmt::Display;

use vitrina_core::GatewayError;

pub fn success(message: impl Display) {
    println!("✅ {message}");
}

pub fn failure(message: impl Display) {
    println!("❌ {message}");
}

/// User-facing text for a failed gateway call.
pub fn describe_gateway_error(action: &str, err: &GatewayError) -> String {
    match err {
        err if err.is_unauthorized() => {
            format!("Failed to {action}: the session was rejected. Reopen the app to sign in again.")
        }
        GatewayError::Status { status, .. } if status.as_u16() == 404 => {
            format!("Failed to {action}: not found.")
        }
        GatewayError::Validation(reason) => format!("Failed to {action}: {reason}."),
        err => format!("Failed to {action}: {err}"),
    }
}
