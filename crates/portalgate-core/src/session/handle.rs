use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::models::{AuthToken, PortalLocation};

use super::machine::{SessionMachine, SessionState};

/// What the presentation layer sees of the session. Never carries the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub location: Option<PortalLocation>,
    pub has_token: bool,
}

impl SessionSnapshot {
    fn of(machine: &SessionMachine) -> Self {
        Self {
            state: machine.current(),
            location: machine.location().cloned(),
            has_token: machine.token().is_some(),
        }
    }
}

/// Shared owner of the single [`SessionMachine`].
///
/// Every mutation goes through [`SessionHandle::update`], which publishes a
/// fresh [`SessionSnapshot`] to subscribers when something visible changed.
/// Clone is cheap; all clones refer to the same session.
#[derive(Clone)]
pub struct SessionHandle {
    machine: Arc<Mutex<SessionMachine>>,
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    pub fn new() -> Self {
        let machine = SessionMachine::new();
        let (tx, _rx) = watch::channel(SessionSnapshot::of(&machine));
        Self {
            machine: Arc::new(Mutex::new(machine)),
            tx: Arc::new(tx),
        }
    }

    pub fn current(&self) -> SessionState {
        self.machine.lock().current()
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.machine.lock().token().cloned()
    }

    pub fn location(&self) -> Option<PortalLocation> {
        self.machine.lock().location().cloned()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(&self.machine.lock())
    }

    /// Receive a snapshot after every visible change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Apply `f` to the machine and notify subscribers if the snapshot changed.
    pub fn update<R>(&self, f: impl FnOnce(&mut SessionMachine) -> R) -> R {
        let (result, snapshot) = {
            let mut machine = self.machine.lock();
            let result = f(&mut *machine);
            (result, SessionSnapshot::of(&machine))
        };

        self.tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });

        result
    }
}
