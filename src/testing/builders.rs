//! Fluent builders for creating customizable test objects

use crate::models::{AuthStatus, FlowStatus, SessionRecord};
use chrono::{Duration, Utc};

use super::constants::{TEST_ACCESS_TOKEN, TEST_ID_TOKEN};
use super::fixtures::TestFixtures;

/// Builder for session records in a given lifecycle state
pub struct TestRecordBuilder {
    record: SessionRecord,
}

impl TestRecordBuilder {
    /// Start from the default, unauthenticated record
    #[must_use]
    pub fn new() -> Self {
        Self {
            record: SessionRecord::default(),
        }
    }

    /// Start from a settled, signed-in record valid for one hour
    #[must_use]
    pub fn signed_in() -> Self {
        Self::new()
            .with_tokens(TEST_ACCESS_TOKEN, TEST_ID_TOKEN)
            .expires_in_minutes(60)
            .with_user()
            .with_status(AuthStatus::Finished, FlowStatus::Finished)
    }

    #[must_use]
    pub fn with_tokens(mut self, token: &str, id_token: &str) -> Self {
        self.record.token = Some(token.to_string());
        self.record.id_token = Some(id_token.to_string());
        self
    }

    #[must_use]
    pub fn with_user(mut self) -> Self {
        self.record.user = Some(TestFixtures::profile());
        self
    }

    /// Set expiry relative to now; negative values produce an expired record
    #[must_use]
    pub fn expires_in_minutes(mut self, minutes: i64) -> Self {
        let expires_at = Utc::now() + Duration::minutes(minutes);
        self.record.expires_at = Some(expires_at.timestamp_millis());
        self
    }

    #[must_use]
    pub fn with_status(mut self, auth_status: AuthStatus, status: FlowStatus) -> Self {
        self.record.auth_status = auth_status;
        self.record.status = status;
        self
    }

    #[must_use]
    pub fn login_pending(self) -> Self {
        self.with_status(AuthStatus::Unknown, FlowStatus::LoginPending)
    }

    #[must_use]
    pub fn logout_pending(mut self) -> Self {
        self.record.status = FlowStatus::LogoutPending;
        self
    }

    /// Build the record, deriving `is_authenticated` from token and expiry
    #[must_use]
    pub fn build(mut self) -> SessionRecord {
        self.record.is_authenticated = self.record.is_authenticated_now();
        self.record
    }
}

impl Default for TestRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
