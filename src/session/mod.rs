//! Session Management Module
//!
//! This module provides the OIDC session state machine and its collaborators.
//!
//! # Modules
//!
//! - [`controller`] - `SessionController`, the state machine driving the identity client
//! - [`derive`] - Building session records from sign-in responses
//! - [`persisted`] - Session record bound to a storage slot
//! - [`broadcast`] - Change notification for session consumers
//! - [`factory`] - Building a controller from settings

pub mod broadcast;
pub mod controller;
pub mod derive;
pub mod factory;
pub mod persisted;

// Re-export commonly used items for convenience
pub use broadcast::{SessionBroadcaster, SessionSubscription};
pub use controller::{ControllerOptions, SessionController};
pub use derive::{derive_session, is_benign_signin_error, BENIGN_SIGNIN_ERRORS};
pub use factory::SessionControllerFactory;
pub use persisted::{PersistedSession, DEFAULT_SESSION_KEY};
