// Centralized logging utilities for session lifecycle events
use crate::identity::IdentityError;
use crate::models::{FlowStatus, SessionRecord};
use crate::storage::StoreError;
use log::{debug, error, info, warn};

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log the record restored from storage at construction
    pub fn log_session_restored(key: &str, record: &SessionRecord) {
        debug!(
            "Restored session from slot {}: status={}, auth_status={}, token={}",
            key,
            record.status,
            record.auth_status,
            presence(record.token.as_ref())
        );
    }

    /// Log which completion branch initialize takes
    pub fn log_initialize(status: FlowStatus) {
        match status {
            FlowStatus::LoginPending => info!("🔄 Completing pending login"),
            FlowStatus::LogoutPending => info!("🔄 Completing pending logout"),
            FlowStatus::Unknown | FlowStatus::Finished => {
                info!("Nothing pending (status={status}), session settled");
            }
        }
    }

    /// Log the start of a login/logout action
    pub fn log_action_started(method: &str) {
        info!("▶️  Starting {method}");
    }

    /// Log a freshly derived session; never logs token values
    pub fn log_session_derived(record: &SessionRecord) {
        info!(
            "✅ Session established: authenticated={}, token={}, id_token={}, user={}, expires_at={:?}",
            record.is_authenticated,
            presence(record.token.as_ref()),
            presence(record.id_token.as_ref()),
            presence(record.user.as_ref()),
            record.expires_at
        );
    }

    /// Log a sign-in error that is treated as "nothing to complete"
    pub fn log_benign_signin_error(err: &IdentityError) {
        warn!("Sign-in completion found no pending state ({err}), treating as idle");
    }

    /// Log a sign-out answered with a protocol error
    pub fn log_signout_protocol_error(error: &str, description: Option<&str>) {
        error!(
            "❌ Signout response error: {} {}",
            error,
            description.unwrap_or_default()
        );
    }

    /// Log an unexpected identity client failure
    pub fn log_identity_failure(context: &str, err: &IdentityError) {
        error!("❌ {} error ({}): {}", context, err.kind(), err);
    }

    /// Log a persisted slot that could not be read or parsed
    pub fn log_store_unreadable(key: &str, err: &StoreError) {
        warn!("Persisted session under {key} is unreadable ({err}), starting from default");
    }

    /// Log a failed write to the session store
    pub fn log_store_write_failure(backend: &str, key: &str, err: &StoreError) {
        error!("Failed to persist session to {backend} store under {key}: {err}");
    }
}

fn presence<T>(value: Option<&T>) -> &'static str {
    if value.is_some() {
        "present"
    } else {
        "missing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence() {
        assert_eq!(presence(Some(&"token")), "present");
        assert_eq!(presence::<String>(None), "missing");
    }
}
