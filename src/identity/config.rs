//! Configuration handed to the identity client factory
//!
//! Values are opaque to the session controller and passed through verbatim.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentityClientConfig {
    pub authority: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub post_logout_redirect_uri: Option<String>,
    pub response_type: String,
    pub scope: String,
    /// Any further client options (e.g. `acr_values`, `ui_locales`)
    pub extra_options: HashMap<String, String>,
}

impl Default for IdentityClientConfig {
    fn default() -> Self {
        Self {
            authority: String::new(),
            client_id: String::new(),
            redirect_uri: String::new(),
            post_logout_redirect_uri: None,
            response_type: "code".to_string(),
            scope: "openid profile".to_string(),
            extra_options: HashMap::new(),
        }
    }
}

impl IdentityClientConfig {
    /// Whether the minimum options for talking to a provider are present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.authority.is_empty() && !self.client_id.is_empty() && !self.redirect_uri.is_empty()
    }

    /// Look up an extra option by name
    #[must_use]
    pub fn extra_option(&self, name: &str) -> Option<&str> {
        self.extra_options.get(name).map(String::as_str)
    }
}
