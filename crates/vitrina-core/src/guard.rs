//! Route guard
//!
//! Gates every protected page behind the session verifier. One guard is one
//! mount, and its state moves exactly once:
//!
//! ```text
//! Pending ──verified + committed──▶ Authorized   (children mount)
//!    │
//!    └──────────failed────────────▶ Unauthorized (redirect, children never mount)
//! ```
//!
//! There is no way back from Authorized within a mount. A credential that
//! the backend rejects later surfaces as a gateway error on that call.
//!
//! Protected pages only get an API handle through [`AuthorizedContext`], so
//! none of their requests can start before verification has finished.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{watch, OnceCell};
use tokio_util::sync::CancellationToken;

use crate::error::VerifyError;
use crate::host::{HostBridge, InitData};
use crate::model::Identity;
use crate::routes::Route;
use crate::session::{wait_for_payload, LoginApi, SessionStore, SessionVerifier, VerifiedSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Verification in flight; show a wait indicator.
    Pending,
    Authorized(Arc<Identity>),
    Unauthorized(Redirect),
}

impl GuardState {
    pub fn is_pending(&self) -> bool {
        matches!(self, GuardState::Pending)
    }
}

/// Where a failed mount sends the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    /// Location the user tried to open
    pub from: String,
    pub reason: VerifyError,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotRendered {
    #[error("redirected to {} from {}: {}", .0.to, .0.from, .0.reason)]
    Redirected(Redirect),

    #[error("guard torn down before verification finished")]
    TornDown,
}

/// What a protected page receives once the guard lets it mount.
pub struct AuthorizedContext<A> {
    pub identity: Arc<Identity>,
    pub session: SessionStore,
    pub api: Arc<A>,
}

impl<A> Clone for AuthorizedContext<A> {
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            session: self.session.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

/// A page mounted behind the guard.
#[async_trait]
pub trait ProtectedView<A>: Send {
    type Output: Send;

    async fn mount(self, ctx: AuthorizedContext<A>) -> Self::Output;
}

pub struct RouteGuard<A> {
    location: String,
    api: Arc<A>,
    verifier: SessionVerifier<A>,
    store: SessionStore,
    payload: watch::Receiver<Option<String>>,
    state: watch::Sender<GuardState>,
    outcome: OnceCell<GuardState>,
    teardown: CancellationToken,
}

impl<A: LoginApi + 'static> RouteGuard<A> {
    /// Mounts a guard for `location`. Nothing is sent until [`resolve`](Self::resolve).
    pub fn mount(location: impl Into<String>, api: Arc<A>, store: SessionStore, host: &dyn HostBridge) -> Self {
        let (state, _) = watch::channel(GuardState::Pending);
        Self {
            location: location.into(),
            verifier: SessionVerifier::new(Arc::clone(&api)),
            api,
            store,
            payload: host.init_data(),
            state,
            outcome: OnceCell::new(),
            teardown: CancellationToken::new(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn state(&self) -> GuardState {
        self.state.borrow().clone()
    }

    /// Follows state changes, e.g. to drive a wait indicator.
    pub fn subscribe(&self) -> watch::Receiver<GuardState> {
        self.state.subscribe()
    }

    /// Runs verification once and returns the settled state.
    ///
    /// Safe to call any number of times, concurrently too. The login runs on
    /// its own task, so a caller that stops waiting leaves it in flight and
    /// the next call picks up the same result. Stays [`GuardState::Pending`]
    /// if the guard is torn down first.
    pub async fn resolve(&self) -> GuardState {
        self.outcome.get_or_init(|| self.run()).await.clone()
    }

    /// Mounts `view` if the guard authorizes.
    pub async fn render<V: ProtectedView<A>>(&self, view: V) -> Result<V::Output, NotRendered> {
        match self.resolve().await {
            GuardState::Authorized(identity) => {
                tracing::debug!(location = %self.location, "Mounting protected view");
                let ctx = AuthorizedContext {
                    identity,
                    session: self.store.clone(),
                    api: Arc::clone(&self.api),
                };
                Ok(view.mount(ctx).await)
            }
            GuardState::Unauthorized(redirect) => Err(NotRendered::Redirected(redirect)),
            GuardState::Pending => Err(NotRendered::TornDown),
        }
    }

    /// Abandons an in-flight verification, including the login request.
    pub fn teardown(&self) {
        self.teardown.cancel();
        self.verifier.abandon();
    }

    async fn run(&self) -> GuardState {
        tracing::debug!(location = %self.location, "Guard pending");

        let verified = tokio::select! {
            biased;
            () = self.teardown.cancelled() => {
                tracing::debug!(location = %self.location, "Guard torn down while pending");
                return GuardState::Pending;
            }
            result = self.verify() => result,
        };

        let next = match verified.and_then(|session| self.commit(session)) {
            Ok(identity) => GuardState::Authorized(identity),
            Err(reason) => {
                tracing::warn!(location = %self.location, error = %reason, "Unauthorized, redirecting");
                GuardState::Unauthorized(Redirect {
                    to: Route::Unauthorized,
                    from: self.location.clone(),
                    reason,
                })
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    async fn verify(&self) -> Result<VerifiedSession, VerifyError> {
        let mut payload = self.payload.clone();
        let payload = wait_for_payload(&mut payload).await?;
        if let Ok(init_data) = InitData::parse(&payload) {
            tracing::debug!(claimed_user_id = ?init_data.unverified_user_id(), "Verifying init data");
        }
        self.verifier.verify(&payload).await
    }

    fn commit(&self, session: VerifiedSession) -> Result<Arc<Identity>, VerifyError> {
        self.store
            .set_identity(session.identity, session.credential)
            .map_err(|e| VerifyError::Persist(e.to_string()))
    }
}

impl<A> Drop for RouteGuard<A> {
    fn drop(&mut self) {
        self.teardown.cancel();
    }
}
