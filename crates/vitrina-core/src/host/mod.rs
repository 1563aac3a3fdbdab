//! Boundary with the host chat client
//!
//! The host supplies the signed initialization payload (possibly later than
//! startup) and wants to hear when a page is ready.

pub mod init_data;

use tokio::sync::watch;

pub use init_data::{InitData, InitDataError};

pub trait HostBridge: Send + Sync {
    /// Current payload, `None` until the host has produced one.
    fn init_data(&self) -> watch::Receiver<Option<String>>;

    /// A page finished mounting.
    fn ready(&self);
}

/// Host whose payload comes from the command line, environment or config.
///
/// The payload can also be supplied after construction with
/// [`StaticHost::provide`].
#[derive(Debug)]
pub struct StaticHost {
    payload: watch::Sender<Option<String>>,
}

impl StaticHost {
    pub fn new(payload: Option<String>) -> Self {
        let (payload, _) = watch::channel(payload.filter(|p| !p.trim().is_empty()));
        Self { payload }
    }

    pub fn provide(&self, payload: impl Into<String>) {
        self.payload.send_replace(Some(payload.into()));
    }

    pub fn has_payload(&self) -> bool {
        self.payload.borrow().is_some()
    }
}

impl HostBridge for StaticHost {
    fn init_data(&self) -> watch::Receiver<Option<String>> {
        self.payload.subscribe()
    }

    fn ready(&self) {
        tracing::debug!("Host notified: page ready");
    }
}
