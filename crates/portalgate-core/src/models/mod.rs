//! Data types passed between the core components.
//!
//! - `Credentials`, `AuthToken`: the sign-in exchange
//! - `PortalLocation`, `NavigationEvent`: the browsing target and its changes

pub mod auth;
pub mod portal;

pub use auth::{AuthToken, Credentials};
pub(crate) use auth::LoginResponse;
pub use portal::{NavigationEvent, PortalLocation};
