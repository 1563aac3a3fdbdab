use vitrina_core::{Redirect, VerifyError};

/// `/unauthorized`, the one page outside the guard.
pub fn render(redirect: &Redirect) -> String {
    let reason = match &redirect.reason {
        VerifyError::EmptyPayload | VerifyError::HostClosed => {
            "The app was opened without Telegram init data.".to_string()
        }
        VerifyError::Rejected(status) => format!("The server did not accept your Telegram session ({status})."),
        VerifyError::Transport(_) => "The server could not be reached.".to_string(),
        VerifyError::Persist(_) => "The session could not be saved on this device.".to_string(),
    };
    format!(
        "🔒 Unauthorized\n{reason}\nYou tried to open {}. Reopen the app from Telegram to sign in.\n",
        redirect.from
    )
}
