#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the idporten-session library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod identity;
pub mod models;
pub mod session;
pub mod settings;
pub mod storage;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use identity::{IdentityClient, IdentityClientConfig, IdentityError};
pub use models::auth::{LoginMethod, LogoutMethod, SigninResponse, SignoutResponse};
pub use models::{AuthStatus, FlowStatus, SessionRecord, SessionSnapshot, UserProfile};
pub use session::{
    ControllerOptions, SessionController, SessionControllerFactory, SessionSubscription,
};
pub use settings::SessionSettings;
pub use storage::{FileStore, MemoryStore, SessionStore, StoreError};
