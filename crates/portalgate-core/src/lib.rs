//! Core library for portalgate.
//!
//! Signs a user in against an identity service, exchanges the resulting
//! bearer token for a tenant portal address, and tracks the location the
//! browsing surface reports from then on.
//!
//! - `validate`: client-side credential checks
//! - `api`: the login and portal-resolution requests
//! - `session`: session state, loading gate and navigation observer
//! - `controller`: the sign-in sequence tying those together
//! - `surface`: the browsing surface boundary and an HTTP implementation
//! - `config`: persisted settings

pub mod api;
pub mod config;
pub mod controller;
pub mod models;
pub mod session;
pub mod surface;
pub mod utils;
pub mod validate;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use controller::{ErrorCategory, SessionController, SessionError};
pub use models::{AuthToken, Credentials, NavigationEvent, PortalLocation};
pub use session::{NavigationObserver, SessionHandle, SessionSnapshot, SessionState};
pub use surface::{BrowsingSurface, HttpSurface, SurfaceEvent};
