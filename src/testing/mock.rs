//! Mock objects and fake implementations for testing
//!
//! [`MockIdentityClient`] answers every call with a scripted result and records
//! the order of calls, so controller flows can be checked without a provider.

use crate::identity::{IdentityClient, IdentityError};
use crate::models::auth::{SigninResponse, SignoutResponse};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

type Scripted<T> = Mutex<Result<T, IdentityError>>;

/// Scripted identity client
///
/// Defaults: no pending sign-in, clean sign-out, and every navigation or popup
/// call succeeds with an empty response.
pub struct MockIdentityClient {
    signin_response: Scripted<Option<SigninResponse>>,
    signout_response: Scripted<SignoutResponse>,
    signin_redirect: Scripted<()>,
    signin_popup: Scripted<SigninResponse>,
    signin_popup_callback: Scripted<()>,
    signout_redirect: Scripted<()>,
    signout_popup: Scripted<()>,
    signin_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockIdentityClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            signin_response: Mutex::new(Ok(None)),
            signout_response: Mutex::new(Ok(SignoutResponse::default())),
            signin_redirect: Mutex::new(Ok(())),
            signin_popup: Mutex::new(Ok(SigninResponse::default())),
            signin_popup_callback: Mutex::new(Ok(())),
            signout_redirect: Mutex::new(Ok(())),
            signout_popup: Mutex::new(Ok(())),
            signin_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script `process_signin_response`
    #[must_use]
    pub fn with_signin_response(
        mut self,
        result: Result<Option<SigninResponse>, IdentityError>,
    ) -> Self {
        self.signin_response = Mutex::new(result);
        self
    }

    /// Script `process_signin_response` to fail with `message`
    #[must_use]
    pub fn with_signin_failure(self, message: &str) -> Self {
        self.with_signin_response(Err(IdentityError::Signin(message.to_string())))
    }

    /// Script `process_signout_response`
    #[must_use]
    pub fn with_signout_response(mut self, result: Result<SignoutResponse, IdentityError>) -> Self {
        self.signout_response = Mutex::new(result);
        self
    }

    #[must_use]
    pub fn with_signin_redirect(mut self, result: Result<(), IdentityError>) -> Self {
        self.signin_redirect = Mutex::new(result);
        self
    }

    #[must_use]
    pub fn with_signin_popup(mut self, result: Result<SigninResponse, IdentityError>) -> Self {
        self.signin_popup = Mutex::new(result);
        self
    }

    #[must_use]
    pub fn with_signin_popup_callback(mut self, result: Result<(), IdentityError>) -> Self {
        self.signin_popup_callback = Mutex::new(result);
        self
    }

    #[must_use]
    pub fn with_signout_redirect(mut self, result: Result<(), IdentityError>) -> Self {
        self.signout_redirect = Mutex::new(result);
        self
    }

    #[must_use]
    pub fn with_signout_popup(mut self, result: Result<(), IdentityError>) -> Self {
        self.signout_popup = Mutex::new(result);
        self
    }

    /// Hold `process_signin_response` until `gate` is notified
    #[must_use]
    pub fn with_signin_gate(mut self, gate: Arc<Notify>) -> Self {
        self.signin_gate = Some(gate);
        self
    }

    /// Names of the calls made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn answer<T: Clone>(&self, name: &'static str, scripted: &Scripted<T>) -> Result<T, IdentityError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name);
        scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockIdentityClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityClient for MockIdentityClient {
    async fn process_signin_response(&self) -> Result<Option<SigninResponse>, IdentityError> {
        if let Some(gate) = &self.signin_gate {
            gate.notified().await;
        }
        self.answer("process_signin_response", &self.signin_response)
    }

    async fn process_signout_response(&self) -> Result<SignoutResponse, IdentityError> {
        self.answer("process_signout_response", &self.signout_response)
    }

    async fn signin_redirect(&self) -> Result<(), IdentityError> {
        self.answer("signin_redirect", &self.signin_redirect)
    }

    async fn signin_popup(&self) -> Result<SigninResponse, IdentityError> {
        self.answer("signin_popup", &self.signin_popup)
    }

    async fn signin_popup_callback(&self) -> Result<(), IdentityError> {
        self.answer("signin_popup_callback", &self.signin_popup_callback)
    }

    async fn signout_redirect(&self) -> Result<(), IdentityError> {
        self.answer("signout_redirect", &self.signout_redirect)
    }

    async fn signout_popup(&self) -> Result<(), IdentityError> {
        self.answer("signout_popup", &self.signout_popup)
    }
}
