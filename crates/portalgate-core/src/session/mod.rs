//! Session state and the pieces that drive it.
//!
//! This module provides:
//! - `SessionMachine`: the `LoggedOut -> Authenticating -> Authenticated -> Browsing` state
//! - `SessionHandle`: shared ownership plus snapshot subscription
//! - `LoadingFlag`: the at-most-one-sign-in gate
//! - `NavigationObserver`: location updates from the browsing surface
//!
//! Sessions live for the lifetime of the process; nothing is written to disk.

pub mod handle;
pub mod loading;
pub mod machine;
pub mod observer;

pub use handle::{SessionHandle, SessionSnapshot};
pub use loading::{LoadingFlag, LoadingGuard};
pub use machine::{SessionMachine, SessionState, TransitionError};
pub use observer::NavigationObserver;
