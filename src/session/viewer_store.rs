use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::models::Viewer;

/// Application-wide holder of the current [`Viewer`].
///
/// Clones share the same value. `replace` swaps the whole viewer at once so
/// observers never see a half-updated record.
#[derive(Clone)]
pub struct ViewerStore {
    sender: Arc<watch::Sender<Viewer>>,
}

impl Default for ViewerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerStore {
    /// Starts out with the anonymous viewer.
    pub fn new() -> Self {
        Self::with_viewer(Viewer::anonymous())
    }

    pub fn with_viewer(viewer: Viewer) -> Self {
        let (sender, _) = watch::channel(viewer);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> Viewer {
        self.sender.borrow().clone()
    }

    pub fn replace(&self, next: Viewer) {
        debug!(
            event_name = "session.viewer.replaced",
            event_domain = "session",
            authenticated = next.is_authenticated(),
            has_wallet = ?next.has_wallet,
            did_request = next.did_request,
            "viewer replaced"
        );
        self.sender.send_replace(next);
    }

    /// Change notifications for every later `replace`.
    pub fn subscribe(&self) -> watch::Receiver<Viewer> {
        self.sender.subscribe()
    }
}
