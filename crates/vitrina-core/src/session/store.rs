use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{SessionError, StorageError};
use crate::gateway::CredentialSource;
use crate::model::{Credential, Identity};
use crate::storage::{ClientStorage, ADMIN_MODE_KEY, TOKEN_KEY};

/// Admin mode on first mount: the role bit and the remembered preference
/// must both hold.
pub fn initial_admin_mode(is_admin: bool, persisted_preference: bool) -> bool {
    is_admin && persisted_preference
}

/// Identity and credential as one unit; they are only ever read together.
#[derive(Clone)]
pub struct ActiveSession {
    pub identity: Arc<Identity>,
    pub credential: Credential,
}

impl fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSession")
            .field("identity", &self.identity)
            .field("credential", &self.credential)
            .finish()
    }
}

#[derive(Debug, Default)]
struct State {
    session: Option<ActiveSession>,
    admin_mode: bool,
}

/// Injected handle to the authenticated session.
///
/// Cheap to clone; all clones share one state. There are exactly two
/// writers: [`SessionStore::set_identity`] after a successful verification
/// and [`SessionStore::toggle_admin_mode`]. No teardown: the session lives
/// as long as the process.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<State>>,
    storage: Arc<dyn ClientStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            storage,
        }
    }

    /// Commits a verified session.
    ///
    /// Storage is read and the credential persisted before memory changes;
    /// if either fails nothing changes in memory, so identity and credential
    /// are either both set or both left as they were. Admin mode is
    /// recomputed from the new identity and the remembered preference.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the preference cannot be read or the
    /// credential cannot be written.
    pub fn set_identity(&self, identity: Identity, credential: Credential) -> Result<Arc<Identity>, StorageError> {
        let preference = self.persisted_admin_preference()?;
        self.storage.set(TOKEN_KEY, credential.expose())?;

        let identity = Arc::new(identity);
        let admin_mode = initial_admin_mode(identity.is_admin, preference);
        {
            let mut state = self.state.write();
            state.session = Some(ActiveSession {
                identity: Arc::clone(&identity),
                credential,
            });
            state.admin_mode = admin_mode;
        }

        tracing::info!(
            user_id = identity.id,
            is_admin = identity.is_admin,
            admin_mode,
            "Session committed"
        );
        Ok(identity)
    }

    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.state.read().session.as_ref().map(|s| Arc::clone(&s.identity))
    }

    /// Identity and credential read under one lock.
    pub fn snapshot(&self) -> Option<ActiveSession> {
        self.state.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().session.is_some()
    }

    pub fn admin_mode(&self) -> bool {
        self.state.read().admin_mode
    }

    /// Flips admin mode and remembers the new value for later mounts.
    ///
    /// Only administrators have the toggle.
    ///
    /// # Errors
    /// Returns [`SessionError::NotAuthenticated`] before a session is
    /// committed, [`SessionError::NotAdmin`] for other users, or a storage
    /// error if the preference cannot be saved.
    pub fn toggle_admin_mode(&self) -> Result<bool, SessionError> {
        let mut state = self.state.write();
        let identity = state
            .session
            .as_ref()
            .map(|s| Arc::clone(&s.identity))
            .ok_or(SessionError::NotAuthenticated)?;
        if !identity.is_admin {
            return Err(SessionError::NotAdmin(identity.id));
        }

        let next = !state.admin_mode;
        self.storage.set(ADMIN_MODE_KEY, if next { "true" } else { "false" })?;
        state.admin_mode = next;

        tracing::info!(user_id = identity.id, admin_mode = next, "Admin mode toggled");
        Ok(next)
    }

    /// Credential left by an earlier run, if any.
    pub fn persisted_credential(&self) -> Result<Option<Credential>, StorageError> {
        Ok(self.storage.get(TOKEN_KEY)?.map(Credential::new))
    }

    fn persisted_admin_preference(&self) -> Result<bool, StorageError> {
        Ok(self.storage.get(ADMIN_MODE_KEY)?.as_deref() == Some("true"))
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").field("state", &*self.state.read()).finish()
    }
}

/// In-memory credential first, then whatever an earlier run persisted.
impl CredentialSource for SessionStore {
    fn credential(&self) -> Option<Credential> {
        if let Some(session) = self.snapshot() {
            return Some(session.credential);
        }
        match self.persisted_credential() {
            Ok(credential) => credential,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read persisted credential");
                None
            }
        }
    }
}
