//! Identity client payloads and sign-in/sign-out method selectors
//!
//! These types mirror what an OIDC client library hands back after processing a
//! redirect or popup. Field names follow the OIDC token response (`snake_case`).

use super::UserProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of a processed sign-in (redirect callback or popup)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SigninResponse {
    pub access_token: Option<String>,
    pub id_token: Option<String>,
    pub profile: Option<UserProfile>,
    /// Seconds since epoch
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SigninResponse {
    /// Expiry converted from seconds to epoch milliseconds
    #[must_use]
    pub fn expires_at_millis(&self) -> Option<i64> {
        self.expires_at.map(|seconds| seconds.saturating_mul(1000))
    }
}

/// Result of a processed sign-out redirect
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SignoutResponse {
    pub error: Option<String>,
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl SignoutResponse {
    /// Whether the provider reported a protocol-level error
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Error returned when a method name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} method: {value}")]
pub struct UnknownMethod {
    kind: &'static str,
    value: String,
}

/// How to start a sign-in
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginMethod {
    #[default]
    #[serde(rename = "loginRedirect")]
    Redirect,
    /// Best-effort; popup completion is not a guaranteed contract
    #[serde(rename = "loginPopup")]
    Popup,
}

impl LoginMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LoginMethod::Redirect => "loginRedirect",
            LoginMethod::Popup => "loginPopup",
        }
    }
}

impl fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "loginRedirect" => Ok(LoginMethod::Redirect),
            "loginPopup" => Ok(LoginMethod::Popup),
            other => Err(UnknownMethod {
                kind: "login",
                value: other.to_string(),
            }),
        }
    }
}

/// How to start a sign-out
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogoutMethod {
    #[default]
    #[serde(rename = "logoutRedirect")]
    Redirect,
    /// Best-effort; popup completion is not a guaranteed contract
    #[serde(rename = "logoutPopup")]
    Popup,
}

impl LogoutMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogoutMethod::Redirect => "logoutRedirect",
            LogoutMethod::Popup => "logoutPopup",
        }
    }
}

impl fmt::Display for LogoutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogoutMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "logoutRedirect" => Ok(LogoutMethod::Redirect),
            "logoutPopup" => Ok(LogoutMethod::Popup),
            other => Err(UnknownMethod {
                kind: "logout",
                value: other.to_string(),
            }),
        }
    }
}
