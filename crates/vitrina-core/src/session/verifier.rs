use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::{GatewayError, VerifyError};
use crate::model::{Credential, Identity, LoginResponse};

/// The one call the verifier needs from the backend.
#[async_trait]
pub trait LoginApi: Send + Sync {
    async fn login(&self, init_data: &str) -> Result<LoginResponse, GatewayError>;
}

/// Decoded result of a successful login.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub identity: Identity,
    pub credential: Credential,
}

impl From<LoginResponse> for VerifiedSession {
    fn from(response: LoginResponse) -> Self {
        Self {
            identity: response.user,
            credential: Credential::new(response.token),
        }
    }
}

type Outcome = Result<VerifiedSession, VerifyError>;

/// Receives the outcome of one login task, `None` while it runs.
type Slot = watch::Receiver<Option<Outcome>>;

/// Exchanges the host-signed init data for a session credential.
///
/// One verifier lives for one mount. Results are memoized per payload: the
/// first caller spawns the `POST /auth/login` task, every later or concurrent
/// caller with the same payload awaits that same task. Callers only wait on
/// it, so a caller that gives up does not cancel the request; only
/// [`abandon`](Self::abandon) does. Failures are memoized too, so nothing is
/// retried within the mount.
pub struct SessionVerifier<A> {
    api: Arc<A>,
    outcomes: DashMap<String, Slot>,
    abandon: CancellationToken,
}

impl<A: LoginApi + 'static> SessionVerifier<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            outcomes: DashMap::new(),
            abandon: CancellationToken::new(),
        }
    }

    /// Verifies `payload`, issuing at most one request for it.
    ///
    /// An empty payload is refused without touching the network.
    ///
    /// # Errors
    /// Returns [`VerifyError::Rejected`] or [`VerifyError::Transport`] when
    /// the login fails, and [`VerifyError::Transport`] if the verifier was
    /// abandoned before the login finished.
    pub async fn verify(&self, payload: &str) -> Outcome {
        if payload.trim().is_empty() {
            return Err(VerifyError::EmptyPayload);
        }

        // The map guard must be released before awaiting.
        let mut slot = self
            .outcomes
            .entry(payload.to_string())
            .or_insert_with(|| self.spawn_login(payload.to_string()))
            .clone();

        let abandoned = || VerifyError::Transport("login abandoned".to_string());
        let outcome = slot.wait_for(Option::is_some).await.map_err(|_| abandoned())?.clone();
        outcome.unwrap_or_else(|| Err(abandoned()))
    }

    /// Cancels every login still in flight. Waiting callers get an error.
    pub fn abandon(&self) {
        self.abandon.cancel();
    }

    fn spawn_login(&self, payload: String) -> Slot {
        let (tx, rx) = watch::channel(None);
        let api = Arc::clone(&self.api);
        let abandon = self.abandon.clone();

        tokio::spawn(async move {
            tracing::debug!("Sending login request");
            let result = tokio::select! {
                () = abandon.cancelled() => {
                    tracing::debug!("Login abandoned");
                    return;
                }
                result = api.login(&payload) => result,
            };
            let outcome = match result {
                Ok(response) => {
                    tracing::debug!(user_id = response.user.id, "Login accepted");
                    Ok(VerifiedSession::from(response))
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Login failed");
                    Err(VerifyError::from(err))
                }
            };
            tx.send_replace(Some(outcome));
        });
        rx
    }
}

impl<A> Drop for SessionVerifier<A> {
    fn drop(&mut self) {
        self.abandon.cancel();
    }
}

/// Waits until the host has supplied a non-empty payload.
///
/// Returns [`VerifyError::HostClosed`] if the host goes away first.
pub async fn wait_for_payload(payload: &mut watch::Receiver<Option<String>>) -> Result<String, VerifyError> {
    let ready = payload
        .wait_for(|value| value.as_deref().is_some_and(|s| !s.trim().is_empty()))
        .await
        .map_err(|_| VerifyError::HostClosed)?;
    Ok(ready.clone().unwrap_or_default())
}
