//! Turning identity client responses into session records

use crate::identity::IdentityError;
use crate::models::auth::SigninResponse;
use crate::models::{AuthStatus, FlowStatus, SessionRecord};

/// Sign-in processing messages that mean "nothing to complete"
///
/// They show up when the page is reloaded after a callback was already
/// consumed, or when no callback was ever started in this tab.
pub const BENIGN_SIGNIN_ERRORS: [&str; 2] =
    ["No matching state found in storage", "No state in response"];

/// Whether a sign-in processing failure should be treated as an idle outcome
#[must_use]
pub fn is_benign_signin_error(error: &IdentityError) -> bool {
    BENIGN_SIGNIN_ERRORS.contains(&error.message())
}

/// Build a fresh, settled session record from a sign-in response
///
/// `expires_at` arrives in seconds since epoch and is stored in milliseconds.
/// `is_authenticated` is evaluated against `now_ms`.
#[must_use]
pub fn derive_session(response: &SigninResponse, now_ms: i64) -> SessionRecord {
    let token = response.access_token.clone();
    let expires_at = response.expires_at_millis();
    let is_authenticated = token.is_some() && expires_at.is_some_and(|expires| expires > now_ms);

    SessionRecord {
        is_authenticated,
        user: response.profile.clone(),
        token,
        id_token: response.id_token.clone(),
        expires_at,
        auth_status: AuthStatus::Finished,
        status: FlowStatus::Finished,
    }
}
