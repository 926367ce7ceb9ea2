//! REST API client module for the identity service.
//!
//! This module provides the `ApiClient` for the two endpoints a session
//! depends on: `POST /api/Login` and `GET /api/PortalUrl`.
//!
//! The portal endpoint uses bearer token authentication with the token
//! obtained from the login endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
