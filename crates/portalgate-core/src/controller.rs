//! Sign-in orchestration.
//!
//! `SessionController` runs the whole sequence for one attempt: credential
//! checks, the loading gate, the login exchange, and the automatic portal
//! lookup that follows it. Every failure is terminal for the attempt and is
//! returned to the caller; nothing is retried.

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};
use crate::models::{Credentials, PortalLocation};
use crate::session::{LoadingFlag, NavigationObserver, SessionHandle, SessionState, TransitionError};
use crate::validate::{check_credentials, ValidationError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A sign-in is already in progress")]
    Busy,

    #[error("Already signed in - log out first")]
    AlreadySignedIn,

    #[error("Login failed: {0}")]
    Login(#[source] ApiError),

    #[error("Could not open your portal: {0}")]
    Portal(#[source] ApiError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// User-facing notification kinds; one dialog per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidEmail,
    InvalidPassword,
    LoginFailed,
    PortalFailed,
    Rejected,
}

impl ErrorCategory {
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidEmail => "Invalid email",
            ErrorCategory::InvalidPassword => "Invalid password",
            ErrorCategory::LoginFailed => "Login failed",
            ErrorCategory::PortalFailed => "Portal unavailable",
            ErrorCategory::Rejected => "Not allowed",
        }
    }
}

impl SessionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::Validation(ValidationError::InvalidEmail) => ErrorCategory::InvalidEmail,
            SessionError::Validation(ValidationError::WeakPassword) => {
                ErrorCategory::InvalidPassword
            }
            SessionError::Login(_) => ErrorCategory::LoginFailed,
            SessionError::Portal(_) => ErrorCategory::PortalFailed,
            SessionError::Busy | SessionError::AlreadySignedIn | SessionError::Transition(_) => {
                ErrorCategory::Rejected
            }
        }
    }

    /// HTTP status behind a login or portal failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Login(e) | SessionError::Portal(e) => e.status(),
            _ => None,
        }
    }
}

/// Puts the session back in `LoggedOut` if the attempt ends before a token
/// is stored, including when the `sign_in` future is dropped mid-request.
struct PendingSignIn<'a> {
    session: &'a SessionHandle,
    armed: bool,
}

impl<'a> PendingSignIn<'a> {
    fn begin(session: &'a SessionHandle) -> Result<Self, TransitionError> {
        session.update(|m| m.begin_authenticating())?;
        Ok(Self {
            session,
            armed: true,
        })
    }

    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingSignIn<'_> {
    fn drop(&mut self) {
        if self.armed && self.session.update(|m| m.abort_authenticating()).is_ok() {
            debug!("Sign-in ended before a token was stored");
        }
    }
}

/// Drives the session through sign-in. Clone is cheap; clones share the
/// same session and loading flag.
#[derive(Clone)]
pub struct SessionController {
    api: ApiClient,
    session: SessionHandle,
    loading: LoadingFlag,
}

impl SessionController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            session: SessionHandle::new(),
            loading: LoadingFlag::new(),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Observer that writes navigation events into this controller's session.
    pub fn observer(&self) -> NavigationObserver {
        NavigationObserver::new(self.session.clone())
    }

    /// Sign in and resolve the portal.
    ///
    /// On a login failure, or if the future is dropped before the login
    /// completes, the session is back in `LoggedOut` with no token. On a
    /// portal failure it stays `Authenticated` with no location. The loading
    /// flag is released on every path.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<PortalLocation, SessionError> {
        check_credentials(email, password)?;

        let _loading = self.loading.try_acquire().ok_or(SessionError::Busy)?;

        if self.session.current() != SessionState::LoggedOut {
            return Err(SessionError::AlreadySignedIn);
        }

        let pending = PendingSignIn::begin(&self.session)?;

        let credentials = Credentials::new(email, password);
        let token = self
            .api
            .login(&credentials)
            .await
            .map_err(SessionError::Login)?;
        drop(credentials);

        self.session.update(|m| m.set_authenticated(token.clone()))?;
        pending.complete();
        info!("Signed in, resolving portal");

        let location = self
            .api
            .resolve_portal(&token)
            .await
            .map_err(SessionError::Portal)?;

        self.session.update(|m| m.set_browsing(location.clone()))?;
        info!(location = %location, "Portal resolved");

        Ok(location)
    }

    /// End the current session.
    pub fn logout(&self) -> Result<(), SessionError> {
        if self.loading.is_loading() {
            return Err(SessionError::Busy);
        }
        self.session.update(|m| m.logout())?;
        info!("Logged out");
        Ok(())
    }
}
