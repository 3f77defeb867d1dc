//! Identity client trait

use super::IdentityError;
use crate::models::auth::{SigninResponse, SignoutResponse};
use async_trait::async_trait;

/// OIDC client operations the session controller relies on
///
/// Implementations wrap a real OIDC library (or a browser bridge). Redirect
/// calls are expected to hand control to the provider; the outcome is picked up
/// by `process_*_response` on the next start.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Complete a pending sign-in redirect
    ///
    /// Returns `Ok(None)` when there is nothing to complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the callback cannot be processed (missing or
    /// mismatching state, token exchange failure, ...).
    async fn process_signin_response(&self) -> Result<Option<SigninResponse>, IdentityError>;

    /// Complete a pending sign-out redirect
    ///
    /// # Errors
    ///
    /// Returns an error if the sign-out callback cannot be processed.
    async fn process_signout_response(&self) -> Result<SignoutResponse, IdentityError>;

    /// Start a sign-in by navigating to the provider
    ///
    /// # Errors
    ///
    /// Returns an error if the navigation cannot be started.
    async fn signin_redirect(&self) -> Result<(), IdentityError>;

    /// Run a sign-in in a popup window
    ///
    /// # Errors
    ///
    /// Returns an error if the popup flow fails or is closed.
    async fn signin_popup(&self) -> Result<SigninResponse, IdentityError>;

    /// Finish the popup sign-in on the opener side
    ///
    /// # Errors
    ///
    /// Returns an error if the popup callback cannot be processed.
    async fn signin_popup_callback(&self) -> Result<(), IdentityError>;

    /// Start a sign-out by navigating to the provider
    ///
    /// # Errors
    ///
    /// Returns an error if the navigation cannot be started.
    async fn signout_redirect(&self) -> Result<(), IdentityError>;

    /// Run a sign-out in a popup window
    ///
    /// # Errors
    ///
    /// Returns an error if the popup flow fails.
    async fn signout_popup(&self) -> Result<(), IdentityError>;
}
