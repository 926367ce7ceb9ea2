use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{AuthToken, PortalLocation};

/// Where the session is in the sign-in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    Authenticating,
    /// Token held, portal not yet resolved.
    Authenticated,
    /// Portal resolved, location tracked.
    Browsing,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::LoggedOut => "Logged out",
            SessionState::Authenticating => "Signing in",
            SessionState::Authenticated => "Signed in",
            SessionState::Browsing => "Browsing",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cannot {action} while {from:?}")]
pub struct TransitionError {
    pub from: SessionState,
    pub action: &'static str,
}

/// Token and location live inside the variants that own them, so a token
/// outside `Authenticated`/`Browsing` or a location outside `Browsing`
/// cannot be represented.
#[derive(Debug, Clone)]
enum Phase {
    LoggedOut,
    Authenticating,
    Authenticated {
        token: AuthToken,
    },
    Browsing {
        token: AuthToken,
        location: PortalLocation,
    },
}

/// Authoritative session state. Pure storage plus transition checks; no I/O.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    phase: Phase,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::LoggedOut,
        }
    }

    pub fn current(&self) -> SessionState {
        match self.phase {
            Phase::LoggedOut => SessionState::LoggedOut,
            Phase::Authenticating => SessionState::Authenticating,
            Phase::Authenticated { .. } => SessionState::Authenticated,
            Phase::Browsing { .. } => SessionState::Browsing,
        }
    }

    /// Get the bearer token if one is held
    pub fn token(&self) -> Option<&AuthToken> {
        match &self.phase {
            Phase::Authenticated { token } | Phase::Browsing { token, .. } => Some(token),
            Phase::LoggedOut | Phase::Authenticating => None,
        }
    }

    /// Get the tracked location while browsing
    pub fn location(&self) -> Option<&PortalLocation> {
        match &self.phase {
            Phase::Browsing { location, .. } => Some(location),
            _ => None,
        }
    }

    fn reject(&self, action: &'static str) -> TransitionError {
        let from = self.current();
        warn!(?from, action, "Rejected session transition");
        TransitionError { from, action }
    }

    /// `LoggedOut -> Authenticating`
    pub fn begin_authenticating(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::LoggedOut => {
                self.phase = Phase::Authenticating;
                debug!("Session -> Authenticating");
                Ok(())
            }
            _ => Err(self.reject("begin sign-in")),
        }
    }

    /// `Authenticating -> LoggedOut`, used when the login request fails.
    pub fn abort_authenticating(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Authenticating => {
                self.phase = Phase::LoggedOut;
                debug!("Session -> LoggedOut (sign-in failed)");
                Ok(())
            }
            _ => Err(self.reject("abort sign-in")),
        }
    }

    /// `LoggedOut | Authenticating -> Authenticated`
    pub fn set_authenticated(&mut self, token: AuthToken) -> Result<(), TransitionError> {
        match self.phase {
            Phase::LoggedOut | Phase::Authenticating => {
                self.phase = Phase::Authenticated { token };
                debug!("Session -> Authenticated");
                Ok(())
            }
            _ => Err(self.reject("store token")),
        }
    }

    /// `Authenticated -> Browsing`
    pub fn set_browsing(&mut self, location: PortalLocation) -> Result<(), TransitionError> {
        match std::mem::replace(&mut self.phase, Phase::LoggedOut) {
            Phase::Authenticated { token } => {
                debug!(location = %location, "Session -> Browsing");
                self.phase = Phase::Browsing { token, location };
                Ok(())
            }
            other => {
                self.phase = other;
                Err(self.reject("start browsing"))
            }
        }
    }

    /// Overwrite the tracked location. Returns true if the location changed.
    ///
    /// Outside `Browsing` this is a no-op.
    pub fn update_location(&mut self, new_location: PortalLocation) -> bool {
        match &mut self.phase {
            Phase::Browsing { location, .. } => {
                if *location == new_location {
                    return false;
                }
                debug!(location = %new_location, "Location updated");
                *location = new_location;
                true
            }
            _ => {
                warn!(state = ?self.current(), "Ignoring navigation outside of Browsing");
                false
            }
        }
    }

    /// End the session: drop token and location and return to `LoggedOut`.
    ///
    /// Refused while a sign-in is in flight.
    pub fn logout(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Authenticating => Err(self.reject("log out")),
            _ => {
                self.phase = Phase::LoggedOut;
                debug!("Session -> LoggedOut");
                Ok(())
            }
        }
    }
}
