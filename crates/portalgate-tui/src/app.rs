//! Application state management for portalgate.
//!
//! This module contains the core `App` struct that owns the session
//! controller, the browsing surface and all UI state, and coordinates the
//! background sign-in task.

use anyhow::Result;
use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use portalgate_core::controller::ErrorCategory;
use portalgate_core::session::SessionSnapshot;
use portalgate_core::{
    ApiClient, BrowsingSurface, Config, HttpSurface, NavigationObserver, PortalLocation,
    SessionController, SessionError, SessionState, SurfaceEvent,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the sign-in result channel.
/// Only one sign-in can be in flight, so a small buffer is plenty.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Maximum length for email input (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a typed address.
const MAX_ADDRESS_LENGTH: usize = 2048;

/// Navigation history entries kept for the browsing view.
const MAX_HISTORY: usize = 50;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EnteringAddress,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// A blocking notification. Input is ignored until it is dismissed.
#[derive(Debug, Clone)]
pub struct ErrorDialog {
    pub category: ErrorCategory,
    pub message: String,
}

/// What the browsing surface last reported about the current page.
#[derive(Debug, Clone, Default)]
pub struct PageInfo {
    pub status: Option<u16>,
    pub title: Option<String>,
    pub loading: bool,
}

/// One entry in the navigation history panel.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub location: PortalLocation,
    pub at: DateTime<Local>,
}

type SignInResult = Result<PortalLocation, SessionError>;

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    controller: SessionController,
    observer: NavigationObserver,
    surface: HttpSurface,

    // UI State
    pub state: AppState,
    pub error_dialog: Option<ErrorDialog>,
    pub status_message: Option<String>,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,

    // Browsing state
    pub address_input: String,
    pub page: PageInfo,
    pub history: Vec<HistoryEntry>,

    // Background task channels
    sign_in_pending: bool,
    sign_in_rx: mpsc::Receiver<SignInResult>,
    sign_in_tx: mpsc::Sender<SignInResult>,
    surface_rx: mpsc::UnboundedReceiver<SurfaceEvent>,
}

impl App {
    /// Create a new application instance. Must run inside the Tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        debug!(api = %config.api_base_url, "App::new() starting");

        let api = ApiClient::with_timeout(config.api_base_url.as_str(), config.request_timeout())?;
        let controller = SessionController::new(api);
        let observer = controller.observer();

        let (surface, surface_rx) = open_surface(&config)?;

        let (sign_in_tx, sign_in_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Get credentials from env vars or config
        let login_email = std::env::var("PORTALGATE_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        let login_password = std::env::var("PORTALGATE_PASSWORD").unwrap_or_default();

        let login_focus = if login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };

        Ok(Self {
            config,
            controller,
            observer,
            surface,

            state: AppState::Normal,
            error_dialog: None,
            status_message: None,

            login_email,
            login_password,
            login_focus,

            address_input: String::new(),
            page: PageInfo::default(),
            history: Vec::new(),

            sign_in_pending: false,
            sign_in_rx,
            sign_in_tx,
            surface_rx,
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn session(&self) -> SessionSnapshot {
        self.controller.session().snapshot()
    }

    pub fn is_browsing(&self) -> bool {
        self.controller.session().current() == SessionState::Browsing
    }

    /// True while the Login button must stay disabled.
    pub fn is_loading(&self) -> bool {
        self.sign_in_pending || self.controller.is_loading()
    }

    /// Start a sign-in with the credentials from the login form.
    ///
    /// Ignored while another attempt is loading. The outcome arrives through
    /// `check_background_tasks`.
    pub fn attempt_login(&mut self) {
        if self.is_loading() {
            debug!("Sign-in already in progress, ignoring submit");
            return;
        }

        let controller = self.controller.clone();
        let tx = self.sign_in_tx.clone();
        let email = self.login_email.clone();
        let password = self.login_password.clone();

        self.sign_in_pending = true;
        self.status_message = Some("Signing in...".to_string());

        tokio::spawn(async move {
            let result = controller.sign_in(&email, &password).await;
            let _ = tx.send(result).await;
        });
    }

    /// End the session and return to the login form.
    pub fn logout(&mut self) {
        match self.controller.logout() {
            Ok(()) => {
                self.discard_pending_loads();
                self.history.clear();
                self.page = PageInfo::default();
                self.address_input.clear();
                self.login_focus = LoginFocus::Password;
                self.state = AppState::Normal;
                self.status_message = Some("Logged out".to_string());
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn on_sign_in_result(&mut self, result: SignInResult) {
        self.sign_in_pending = false;
        self.status_message = None;

        match result {
            Ok(location) => {
                info!("Sign-in complete");
                self.login_password.clear();

                let email = self.login_email.clone();
                if self.config.last_email.as_deref() != Some(email.as_str()) {
                    self.config.last_email = Some(email);
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save config");
                    }
                }

                self.push_history(location.clone());
                self.load(location);
            }
            Err(e) => {
                warn!(category = ?e.category(), status = ?e.status(), "Sign-in failed");
                self.show_error(&e);
            }
        }
    }

    pub fn show_error(&mut self, error: &SessionError) {
        self.error_dialog = Some(ErrorDialog {
            category: error.category(),
            message: user_message(error),
        });
    }

    pub fn dismiss_error(&mut self) {
        self.error_dialog = None;
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    /// Hand a location to the browsing surface.
    pub fn load(&mut self, location: PortalLocation) {
        self.page = PageInfo {
            loading: true,
            ..PageInfo::default()
        };
        self.surface.load(&location);
    }

    pub fn reload(&mut self) {
        if let Some(location) = self.controller.session().location() {
            self.load(location);
        }
    }

    /// Navigate to the address typed into the prompt.
    pub fn submit_address(&mut self) {
        let address = self.address_input.trim().to_string();
        self.address_input.clear();
        self.state = AppState::Normal;

        if address.is_empty() {
            return;
        }
        self.load(PortalLocation::new(address));
    }

    /// Swap in a fresh surface so loads started by the previous session
    /// report into a closed channel.
    fn discard_pending_loads(&mut self) {
        match open_surface(&self.config) {
            Ok((surface, surface_rx)) => {
                self.surface = surface;
                self.surface_rx = surface_rx;
            }
            Err(e) => warn!(error = %e, "Failed to reset browsing surface"),
        }
    }

    fn on_surface_event(&mut self, event: SurfaceEvent) {
        if !self.is_browsing() {
            debug!("Dropping surface event outside of Browsing");
            return;
        }

        if let Some(nav) = event.navigation() {
            self.observer.on_navigation_event(nav.location.clone());
            self.push_history(nav.location.clone());
        }

        match event {
            SurfaceEvent::Redirected(_) => {}
            SurfaceEvent::Loaded { status, title, .. } => {
                self.page = PageInfo {
                    status: Some(status),
                    title,
                    loading: false,
                };
            }
            SurfaceEvent::Failed { location, reason } => {
                self.page.loading = false;
                self.status_message = Some(format!("Could not load {}: {}", location, reason));
            }
        }
    }

    fn push_history(&mut self, location: PortalLocation) {
        if self.history.last().map(|h| &h.location) == Some(&location) {
            return;
        }
        self.history.push(HistoryEntry {
            location,
            at: Local::now(),
        });
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.sign_in_rx.try_recv() {
            self.on_sign_in_result(result);
        }
        while let Ok(event) = self.surface_rx.try_recv() {
            self.on_surface_event(event);
        }
    }
}

fn open_surface(
    config: &Config,
) -> Result<(HttpSurface, mpsc::UnboundedReceiver<SurfaceEvent>)> {
    let (tx, rx) = mpsc::unbounded_channel();
    let surface = HttpSurface::new(tx, config.request_timeout())?;
    Ok((surface, rx))
}

/// Turn a session error into the text shown in its dialog.
pub fn user_message(error: &SessionError) -> String {
    match error {
        SessionError::Login(_) if error.status() == Some(401) => {
            "Invalid email or password (status 401)".to_string()
        }
        SessionError::Login(_) | SessionError::Portal(_) => match error.status() {
            Some(_) => error.to_string(),
            None => format!("{}. Check your connection and try again.", error),
        },
        _ => error.to_string(),
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if an address character should be accepted
pub fn can_add_address_char(current_len: usize, c: char) -> bool {
    current_len < MAX_ADDRESS_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

// ============================================================================
// Tests
// ============================================================================
