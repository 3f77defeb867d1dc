//! Session controller - the OIDC session state machine
//!
//! `status` records which redirect flow awaits completion across a restart:
//! `unknown -> loginPending -> finished` and `unknown -> logoutPending -> finished`.
//! `auth_status` independently tracks `pending -> finished | rejected`.
//!
//! State transitions (`initialize`, `login`, `logout`) are serialized through a
//! single transition guard held across identity client calls. The record lock
//! itself is never held across an await.

use super::broadcast::{SessionBroadcaster, SessionSubscription, DEFAULT_BROADCAST_CAPACITY};
use super::derive::{derive_session, is_benign_signin_error};
use super::persisted::{PersistedSession, DEFAULT_SESSION_KEY};
use crate::identity::{IdentityClient, IdentityError};
use crate::models::auth::{LoginMethod, LogoutMethod, SigninResponse};
use crate::models::{AuthStatus, FlowStatus, SessionRecord, SessionSnapshot, UserProfile};
use crate::settings::SessionSettings;
use crate::storage::SessionStore;
use crate::utils::logging::LoggingHelper;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Construction options for [`SessionController`]
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub session_key: String,
    pub login_method: LoginMethod,
    pub logout_method: LogoutMethod,
    pub broadcast_capacity: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            login_method: LoginMethod::default(),
            logout_method: LogoutMethod::default(),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl ControllerOptions {
    /// Create controller options from settings
    #[must_use]
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            session_key: settings.storage.session_key.clone(),
            login_method: settings.methods.login,
            logout_method: settings.methods.logout,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    record: SessionRecord,
    login_error: Option<IdentityError>,
}

/// Owns the session record and drives the identity client
pub struct SessionController {
    client: Arc<dyn IdentityClient>,
    persisted: PersistedSession,
    state: Mutex<SessionState>,
    broadcaster: SessionBroadcaster,
    transitions: tokio::sync::Mutex<()>,
    login_method: LoginMethod,
    logout_method: LogoutMethod,
}

// =============================================================================
// Construction
// =============================================================================

impl SessionController {
    /// Create a controller, restoring the record persisted under the session key
    #[must_use]
    pub fn new(
        client: Arc<dyn IdentityClient>,
        store: Arc<dyn SessionStore>,
        options: ControllerOptions,
    ) -> Self {
        let persisted = PersistedSession::new(store, options.session_key);
        let record = persisted.load_or_default();
        LoggingHelper::log_session_restored(persisted.key(), &record);

        Self {
            client,
            persisted,
            state: Mutex::new(SessionState {
                record,
                login_error: None,
            }),
            broadcaster: SessionBroadcaster::new(options.broadcast_capacity),
            transitions: tokio::sync::Mutex::new(()),
            login_method: options.login_method,
            logout_method: options.logout_method,
        }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

impl SessionController {
    /// Resolve whatever flow was pending when the previous run navigated away
    ///
    /// Marks the session `pending`, then completes a pending login or logout, or
    /// settles straight to `finished` when nothing is pending. Meant to be called
    /// once at startup; calling it again on a settled session is a no-op apart
    /// from the `pending -> finished` notification pair.
    pub async fn initialize(&self) {
        let _transition = self.transitions.lock().await;

        self.update(|record| record.auth_status = AuthStatus::Pending);

        let status = self.status();
        LoggingHelper::log_initialize(status);
        match status {
            FlowStatus::LoginPending => self.complete_login().await,
            FlowStatus::LogoutPending => self.complete_logout().await,
            FlowStatus::Unknown | FlowStatus::Finished => {
                self.update(|record| record.auth_status = AuthStatus::Finished);
            }
        }
    }

    async fn complete_login(&self) {
        match self.client.process_signin_response().await {
            Ok(Some(response)) => self.store_signin(&response),
            Ok(None) => {
                log::info!("No sign-in response to complete");
                self.update(|record| record.settle(AuthStatus::Finished, FlowStatus::Finished));
            }
            Err(e) if is_benign_signin_error(&e) => {
                LoggingHelper::log_benign_signin_error(&e);
                self.update(|record| record.settle(AuthStatus::Finished, FlowStatus::Finished));
            }
            Err(e) => {
                self.update(|record| record.settle(AuthStatus::Rejected, FlowStatus::Finished));
                self.report_error("login/complete", e);
            }
        }
    }

    async fn complete_logout(&self) {
        match self.client.process_signout_response().await {
            Ok(response) => {
                if let Some(error) = response.error {
                    LoggingHelper::log_signout_protocol_error(
                        &error,
                        response.error_description.as_deref(),
                    );
                    self.update(|record| record.settle(AuthStatus::Rejected, FlowStatus::Finished));
                    self.set_login_error(IdentityError::SignoutRejected {
                        error,
                        description: response.error_description,
                    });
                } else {
                    log::info!("Sign-out completed, session reset");
                    self.replace(SessionRecord::default());
                }
            }
            Err(e) => {
                self.update(|record| record.settle(AuthStatus::Rejected, FlowStatus::Finished));
                self.report_error("logout/complete", e);
            }
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

impl SessionController {
    /// Start a sign-in
    ///
    /// A redirect leaves `status = loginPending` persisted so the next
    /// [`initialize`](Self::initialize) completes it. Failures are published as
    /// the login error rather than returned.
    pub async fn login(&self, method: LoginMethod) {
        let _transition = self.transitions.lock().await;
        LoggingHelper::log_action_started(method.as_str());

        match method {
            LoginMethod::Popup => match self.signin_with_popup().await {
                Ok(response) => self.store_signin(&response),
                Err(e) => self.report_error("login/popup", e),
            },
            LoginMethod::Redirect => {
                self.update(|record| record.status = FlowStatus::LoginPending);
                if let Err(e) = self.client.signin_redirect().await {
                    self.report_error("login/redirect", e);
                }
            }
        }
    }

    /// Start a sign-in with the configured method
    pub async fn login_preferred(&self) {
        self.login(self.login_method).await;
    }

    /// Start a sign-out
    ///
    /// A redirect leaves `status = logoutPending` persisted so the next
    /// [`initialize`](Self::initialize) completes it.
    pub async fn logout(&self, method: LogoutMethod) {
        let _transition = self.transitions.lock().await;
        LoggingHelper::log_action_started(method.as_str());

        match method {
            LogoutMethod::Popup => {
                if let Err(e) = self.client.signout_popup().await {
                    self.report_error("logout/popup", e);
                }
            }
            LogoutMethod::Redirect => {
                self.update(|record| record.status = FlowStatus::LogoutPending);
                if let Err(e) = self.client.signout_redirect().await {
                    self.report_error("logout/redirect", e);
                }
            }
        }
    }

    /// Start a sign-out with the configured method
    pub async fn logout_preferred(&self) {
        self.logout(self.logout_method).await;
    }

    async fn signin_with_popup(&self) -> Result<SigninResponse, IdentityError> {
        let response = self.client.signin_popup().await?;
        self.client.signin_popup_callback().await?;
        Ok(response)
    }
}

// =============================================================================
// Read access
// =============================================================================

impl SessionController {
    /// Token present and not expired, evaluated now
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock_state().record.is_authenticated_now()
    }

    #[must_use]
    pub fn auth_status(&self) -> AuthStatus {
        self.lock_state().record.auth_status
    }

    #[must_use]
    pub fn status(&self) -> FlowStatus {
        self.lock_state().record.status
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock_state().record.token.clone()
    }

    #[must_use]
    pub fn id_token(&self) -> Option<String> {
        self.lock_state().record.id_token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.lock_state().record.user.clone()
    }

    /// Last unexpected identity client failure, if any
    #[must_use]
    pub fn login_error(&self) -> Option<IdentityError> {
        self.lock_state().login_error.clone()
    }

    /// Copy of the in-memory record
    #[must_use]
    pub fn record(&self) -> SessionRecord {
        self.lock_state().record.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        Self::capture(&state)
    }

    /// Subscribe to session changes, starting from the current snapshot
    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        // Hold the state lock so no change slips in between snapshot and subscription
        let state = self.lock_state();
        self.broadcaster.subscribe(Self::capture(&state))
    }

    #[must_use]
    pub const fn login_method(&self) -> LoginMethod {
        self.login_method
    }

    #[must_use]
    pub const fn logout_method(&self) -> LogoutMethod {
        self.logout_method
    }

    #[must_use]
    pub fn session_key(&self) -> &str {
        self.persisted.key()
    }
}

// =============================================================================
// Mutation helpers
// =============================================================================

impl SessionController {
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn capture(state: &SessionState) -> SessionSnapshot {
        SessionSnapshot::capture(
            &state.record,
            state.login_error.clone(),
            Utc::now().timestamp_millis(),
        )
    }

    /// Mutate the record in place, persist it and notify subscribers
    fn update(&self, mutate: impl FnOnce(&mut SessionRecord)) {
        let mut state = self.lock_state();
        mutate(&mut state.record);
        self.persist_and_publish(&state);
    }

    /// Overwrite the record, persist it and notify subscribers
    fn replace(&self, record: SessionRecord) {
        let mut state = self.lock_state();
        state.record = record;
        self.persist_and_publish(&state);
    }

    fn store_signin(&self, response: &SigninResponse) {
        let record = derive_session(response, Utc::now().timestamp_millis());
        LoggingHelper::log_session_derived(&record);
        self.replace(record);
    }

    fn persist_and_publish(&self, state: &SessionState) {
        self.persisted.write(&state.record);
        self.broadcaster.publish(Self::capture(state));
    }

    fn set_login_error(&self, error: IdentityError) {
        let mut state = self.lock_state();
        state.login_error = Some(error);
        self.broadcaster.publish(Self::capture(&state));
    }

    fn report_error(&self, context: &str, error: IdentityError) {
        LoggingHelper::log_identity_failure(context, &error);
        self.set_login_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::mock::MockIdentityClient;

    fn controller_with(client: MockIdentityClient, record: &SessionRecord) -> SessionController {
        let store = MemoryStore::with_value(
            DEFAULT_SESSION_KEY,
            &serde_json::to_string(record).unwrap(),
        );
        SessionController::new(Arc::new(client), Arc::new(store), ControllerOptions::default())
    }

    #[test]
    fn test_new_restores_persisted_record() {
        let record = SessionRecord {
            status: FlowStatus::LoginPending,
            ..Default::default()
        };
        let controller = controller_with(MockIdentityClient::new(), &record);

        assert_eq!(controller.status(), FlowStatus::LoginPending);
        assert_eq!(controller.session_key(), DEFAULT_SESSION_KEY);
        assert!(controller.login_error().is_none());
    }

    #[test]
    fn test_options_default_methods() {
        let options = ControllerOptions::default();
        assert_eq!(options.session_key, "IDPorten-AUTH");
        assert_eq!(options.login_method, LoginMethod::Redirect);
        assert_eq!(options.logout_method, LogoutMethod::Redirect);
    }

    #[tokio::test]
    async fn test_initialize_idle_settles_finished() {
        let controller = controller_with(MockIdentityClient::new(), &SessionRecord::default());

        controller.initialize().await;

        assert_eq!(controller.auth_status(), AuthStatus::Finished);
        assert_eq!(controller.status(), FlowStatus::Unknown);
    }

    #[tokio::test]
    async fn test_initialize_publishes_pending_then_finished() {
        let controller = controller_with(MockIdentityClient::new(), &SessionRecord::default());
        let mut subscription = controller.subscribe();

        controller.initialize().await;

        assert_eq!(
            subscription.changed().await.unwrap().auth_status,
            AuthStatus::Pending
        );
        assert_eq!(
            subscription.changed().await.unwrap().auth_status,
            AuthStatus::Finished
        );
    }

    #[tokio::test]
    async fn test_redirect_failure_keeps_login_pending() {
        let client = MockIdentityClient::new()
            .with_signin_redirect(Err(IdentityError::Navigation("blocked".to_string())));
        let controller = controller_with(client, &SessionRecord::default());

        controller.login(LoginMethod::Redirect).await;

        assert_eq!(controller.status(), FlowStatus::LoginPending);
        assert_eq!(
            controller.login_error(),
            Some(IdentityError::Navigation("blocked".to_string()))
        );
    }
}
