//! Unified testing utilities
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built test data (sign-in responses, profiles, stores)
//! - [`builders`] - Fluent builders for session records
//! - [`assertions`] - Assertion helpers for session state
//! - [`mock`] - Scripted identity client
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use idporten_session::testing::{mock::MockIdentityClient, TestFixtures, TestRecordBuilder};
//!
//! let client = MockIdentityClient::new()
//!     .with_signin_response(Ok(Some(TestFixtures::signin_response())));
//! let record = TestRecordBuilder::new().login_pending().build();
//! let (controller, _store) = TestFixtures::controller(Arc::new(client), &record);
//! assert!(!controller.is_authenticated());
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod mock;

// Re-export commonly used items for convenience
pub use assertions::*;
pub use builders::TestRecordBuilder;
pub use fixtures::TestFixtures;

/// Common test constants
pub mod constants {
    /// Default test access token
    pub const TEST_ACCESS_TOKEN: &str = "test_access_token";

    /// Default test ID token
    pub const TEST_ID_TOKEN: &str = "test_id_token";

    /// Default test subject claim
    pub const TEST_SUBJECT: &str = "u1";

    /// Default test national identity number claim
    pub const TEST_PID: &str = "12345678901";
}
