//! Errors surfaced by identity client implementations

/// Error reported by an [`IdentityClient`](super::IdentityClient) call
///
/// The payload is the client's message verbatim; some sign-in messages are
/// recognized as benign and absorbed by the session controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Processing a sign-in response failed
    #[error("{0}")]
    Signin(String),

    /// Processing a sign-out response failed
    #[error("{0}")]
    Signout(String),

    /// Starting a redirect navigation failed
    #[error("{0}")]
    Navigation(String),

    /// Popup window flow failed
    #[error("{0}")]
    Popup(String),

    /// Provider answered the sign-out with an explicit protocol error
    #[error("Signout rejected by provider: {error}")]
    SignoutRejected {
        error: String,
        description: Option<String>,
    },

    #[error("{0}")]
    Other(String),
}

impl IdentityError {
    /// Raw message as reported by the identity client
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            IdentityError::Signin(msg)
            | IdentityError::Signout(msg)
            | IdentityError::Navigation(msg)
            | IdentityError::Popup(msg)
            | IdentityError::Other(msg) => msg,
            IdentityError::SignoutRejected { error, .. } => error,
        }
    }

    /// Short name of the failing step, used in log lines
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            IdentityError::Signin(_) => "signin",
            IdentityError::Signout(_) => "signout",
            IdentityError::Navigation(_) => "navigation",
            IdentityError::Popup(_) => "popup",
            IdentityError::SignoutRejected { .. } => "signout_rejected",
            IdentityError::Other(_) => "other",
        }
    }
}
