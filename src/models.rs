use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod auth;

use crate::identity::IdentityError;

/// Opaque user profile: claim name to claim value, as handed over by the identity client
pub type UserProfile = Map<String, Value>;

/// Lifecycle marker consumed by UI code: "still resolving" vs "settled"
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AuthStatus {
    #[default]
    Unknown,
    Pending,
    Finished,
    Rejected,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthStatus::Unknown => "unknown",
            AuthStatus::Pending => "pending",
            AuthStatus::Finished => "finished",
            AuthStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Which redirect flow is waiting to be completed after the next reload
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FlowStatus {
    #[default]
    Unknown,
    LoginPending,
    LogoutPending,
    Finished,
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStatus::Unknown => "unknown",
            FlowStatus::LoginPending => "loginPending",
            FlowStatus::LogoutPending => "logoutPending",
            FlowStatus::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Persisted session record
///
/// Serialized with camelCase keys so the stored shape stays readable by other
/// consumers of the same storage slot.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRecord {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub id_token: Option<String>,
    /// Epoch milliseconds at which `token` stops being valid
    pub expires_at: Option<i64>,
    pub auth_status: AuthStatus,
    pub status: FlowStatus,
}

impl SessionRecord {
    /// Evaluate the authentication flag against `now_ms`
    ///
    /// True only when a token is present and its expiry lies strictly after `now_ms`.
    #[must_use]
    pub fn is_authenticated_at(&self, now_ms: i64) -> bool {
        self.token.is_some() && self.expires_at.is_some_and(|expires| expires > now_ms)
    }

    /// Evaluate the authentication flag against the current wall clock
    #[must_use]
    pub fn is_authenticated_now(&self) -> bool {
        self.is_authenticated_at(Utc::now().timestamp_millis())
    }

    /// Merge the lifecycle markers, leaving every other field untouched
    pub fn settle(&mut self, auth_status: AuthStatus, status: FlowStatus) {
        self.auth_status = auth_status;
        self.status = status;
    }
}

/// Read-only view of the session handed to subscribers
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    pub auth_status: AuthStatus,
    pub status: FlowStatus,
    pub token: Option<String>,
    pub id_token: Option<String>,
    pub user: Option<UserProfile>,
    pub expires_at: Option<i64>,
    pub login_error: Option<IdentityError>,
}

impl SessionSnapshot {
    /// Build a snapshot, re-evaluating `is_authenticated` at `now_ms`
    #[must_use]
    pub fn capture(record: &SessionRecord, login_error: Option<IdentityError>, now_ms: i64) -> Self {
        Self {
            is_authenticated: record.is_authenticated_at(now_ms),
            auth_status: record.auth_status,
            status: record.status,
            token: record.token.clone(),
            id_token: record.id_token.clone(),
            user: record.user.clone(),
            expires_at: record.expires_at,
            login_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_record_is_unauthenticated() {
        let record = SessionRecord::default();

        assert!(!record.is_authenticated);
        assert!(record.user.is_none());
        assert!(record.token.is_none());
        assert!(record.id_token.is_none());
        assert!(record.expires_at.is_none());
        assert_eq!(record.auth_status, AuthStatus::Unknown);
        assert_eq!(record.status, FlowStatus::Unknown);
        assert!(!record.is_authenticated_now());
    }

    #[test]
    fn test_is_authenticated_requires_token_and_future_expiry() {
        let now = 1_700_000_000_000;
        let mut record = SessionRecord {
            token: Some("a".to_string()),
            expires_at: Some(now + 1),
            ..Default::default()
        };
        assert!(record.is_authenticated_at(now));

        // Expiry equal to now is already expired
        record.expires_at = Some(now);
        assert!(!record.is_authenticated_at(now));

        record.expires_at = Some(now + 60_000);
        record.token = None;
        assert!(!record.is_authenticated_at(now));
    }

    #[test]
    fn test_record_serializes_with_camel_case_keys() {
        let record = SessionRecord {
            is_authenticated: true,
            token: Some("a".to_string()),
            id_token: Some("i".to_string()),
            expires_at: Some(1_700_000_000_000),
            auth_status: AuthStatus::Finished,
            status: FlowStatus::LoginPending,
            ..Default::default()
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["isAuthenticated"], json!(true));
        assert_eq!(value["idToken"], json!("i"));
        assert_eq!(value["expiresAt"], json!(1_700_000_000_000_i64));
        assert_eq!(value["authStatus"], json!("finished"));
        assert_eq!(value["status"], json!("loginPending"));
    }

    #[test]
    fn test_record_tolerates_missing_fields() {
        let record: SessionRecord = serde_json::from_str(r#"{"status":"logoutPending"}"#).unwrap();
        assert_eq!(record.status, FlowStatus::LogoutPending);
        assert_eq!(record.auth_status, AuthStatus::Unknown);
        assert!(record.token.is_none());
    }

    #[test]
    fn test_settle_keeps_tokens() {
        let mut record = SessionRecord {
            token: Some("a".to_string()),
            status: FlowStatus::LoginPending,
            auth_status: AuthStatus::Pending,
            ..Default::default()
        };
        record.settle(AuthStatus::Finished, FlowStatus::Finished);

        assert_eq!(record.token.as_deref(), Some("a"));
        assert_eq!(record.auth_status, AuthStatus::Finished);
        assert_eq!(record.status, FlowStatus::Finished);
    }

    #[test]
    fn test_status_display_matches_wire_names() {
        assert_eq!(AuthStatus::Rejected.to_string(), "rejected");
        assert_eq!(FlowStatus::LogoutPending.to_string(), "logoutPending");
    }
}
