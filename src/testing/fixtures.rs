//! Test fixtures providing pre-built test objects
//!
//! This module provides commonly used test data as static fixtures, eliminating
//! the need to recreate the same test objects in multiple test files.

use crate::identity::IdentityClient;
use crate::models::auth::{SigninResponse, SignoutResponse};
use crate::models::{SessionRecord, UserProfile};
use crate::session::{ControllerOptions, SessionController, DEFAULT_SESSION_KEY};
use crate::storage::{MemoryStore, SessionStore};
use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;

use super::constants::{TEST_ACCESS_TOKEN, TEST_ID_TOKEN, TEST_PID, TEST_SUBJECT};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Profile claims as returned for a signed-in test user
    #[must_use]
    pub fn profile() -> UserProfile {
        let mut profile = UserProfile::new();
        profile.insert("sub".to_string(), json!(TEST_SUBJECT));
        profile.insert("pid".to_string(), json!(TEST_PID));
        profile
    }

    /// Sign-in response whose access token is valid for one more hour
    #[must_use]
    pub fn signin_response() -> SigninResponse {
        Self::signin_response_expiring_at((Utc::now() + Duration::hours(1)).timestamp())
    }

    /// Sign-in response whose access token expired an hour ago
    #[must_use]
    pub fn expired_signin_response() -> SigninResponse {
        Self::signin_response_expiring_at((Utc::now() - Duration::hours(1)).timestamp())
    }

    /// Sign-in response expiring at `expires_at` (seconds since epoch)
    #[must_use]
    pub fn signin_response_expiring_at(expires_at: i64) -> SigninResponse {
        SigninResponse {
            access_token: Some(TEST_ACCESS_TOKEN.to_string()),
            id_token: Some(TEST_ID_TOKEN.to_string()),
            profile: Some(Self::profile()),
            expires_at: Some(expires_at),
            token_type: Some("Bearer".to_string()),
            ..Default::default()
        }
    }

    /// Sign-out response carrying a provider error
    #[must_use]
    pub fn rejected_signout() -> SignoutResponse {
        SignoutResponse {
            error: Some("access_denied".to_string()),
            error_description: Some("End-user cancelled the logout".to_string()),
            state: None,
        }
    }

    /// Memory store holding `record` under the default session key
    ///
    /// # Panics
    ///
    /// Panics if the record cannot be serialized.
    #[must_use]
    pub fn store_with(record: &SessionRecord) -> Arc<MemoryStore> {
        let raw = serde_json::to_string(record).expect("session record serializes");
        Arc::new(MemoryStore::with_value(DEFAULT_SESSION_KEY, &raw))
    }

    /// Controller over `client` whose store already holds `record`
    #[must_use]
    pub fn controller(
        client: Arc<dyn IdentityClient>,
        record: &SessionRecord,
    ) -> (SessionController, Arc<MemoryStore>) {
        let store = Self::store_with(record);
        let shared: Arc<dyn SessionStore> = store.clone();
        let controller = SessionController::new(client, shared, ControllerOptions::default());
        (controller, store)
    }

    /// Read back the record persisted under the default session key
    ///
    /// # Panics
    ///
    /// Panics if the slot is empty or holds invalid JSON.
    #[must_use]
    pub fn persisted_record(store: &dyn SessionStore) -> SessionRecord {
        let raw = store
            .load(DEFAULT_SESSION_KEY)
            .expect("store readable")
            .expect("session persisted");
        serde_json::from_str(&raw).expect("persisted session parses")
    }
}
