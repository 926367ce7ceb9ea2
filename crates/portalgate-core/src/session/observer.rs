use tokio::sync::mpsc;
use tracing::debug;

use crate::models::{NavigationEvent, PortalLocation};

use super::SessionHandle;

/// Feeds location changes from the browsing surface back into the session.
///
/// The surface is trusted as the source of truth for its own location: every
/// event overwrites the tracked location, with no filtering or validation.
#[derive(Clone)]
pub struct NavigationObserver {
    session: SessionHandle,
}

impl NavigationObserver {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    /// Record that the surface now shows `location`.
    pub fn on_navigation_event(&self, location: PortalLocation) {
        let changed = self.session.update(|m| m.update_location(location));
        if changed {
            debug!("Navigation event applied");
        }
    }

    /// Apply events in arrival order until every sender is dropped.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<NavigationEvent>) {
        while let Some(event) = events.recv().await {
            self.on_navigation_event(event.location);
        }
        debug!("Navigation event stream closed");
    }
}
