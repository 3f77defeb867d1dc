use crate::identity::IdentityClientConfig;
use crate::models::auth::{LoginMethod, LogoutMethod};
use crate::session::persisted::DEFAULT_SESSION_KEY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SessionSettings {
    pub identity: IdentityClientConfig,
    pub storage: StorageSettings,
    pub methods: MethodSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Slot lives as long as the process
    #[default]
    Memory,
    /// Slot lives in a per-tab directory on disk
    File,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => f.write_str("memory"),
            StorageBackend::File => f.write_str("file"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            other => Err(format!("Unknown storage backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageSettings {
    /// Key of the storage slot holding the session record
    pub session_key: String,
    pub backend: StorageBackend,
    /// Base directory for the file backend; each tab gets a subdirectory
    pub directory: String,
    /// Resume an existing tab instead of starting a fresh one
    pub tab_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MethodSettings {
    pub login: LoginMethod,
    pub logout: LogoutMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            backend: StorageBackend::Memory,
            directory: ".idporten-session".to_string(),
            tab_id: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SessionSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// Also reads a `.env` file and initializes the logger at the configured level.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();

        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        Self::initialize_logging(&settings.logging);

        Ok(settings)
    }

    /// Parse settings from a TOML string, without touching files or the environment
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing fails
    pub fn from_toml(content: &str) -> Result<Self, basic_toml::Error> {
        basic_toml::from_str(content)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `IDPORTEN_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = Self::from_toml(&toml_content)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("IDPORTEN_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                settings = Self::from_toml(&secrets_toml_content)?;
                println!("✓ Overriding settings from {}", secrets_path.display());
            } else {
                println!(
                    "ℹ IDPORTEN_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_identity_env_overrides(&mut settings.identity);
        Self::apply_storage_env_overrides(&mut settings.storage);
        Self::apply_method_env_overrides(&mut settings.methods);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for identity client options
    pub fn apply_identity_env_overrides(identity: &mut IdentityClientConfig) {
        Self::apply_string_env_override("IDPORTEN_AUTHORITY", &mut identity.authority);
        Self::apply_string_env_override("IDPORTEN_CLIENT_ID", &mut identity.client_id);
        Self::apply_string_env_override("IDPORTEN_REDIRECT_URI", &mut identity.redirect_uri);
        Self::apply_string_env_override("IDPORTEN_SCOPE", &mut identity.scope);
        if let Ok(uri) = std::env::var("IDPORTEN_POST_LOGOUT_REDIRECT_URI") {
            identity.post_logout_redirect_uri = Some(uri);
        }
    }

    /// Apply environment overrides for storage settings
    pub fn apply_storage_env_overrides(storage: &mut StorageSettings) {
        Self::apply_string_env_override("SESSION_KEY", &mut storage.session_key);
        Self::apply_string_env_override("SESSION_STORAGE_DIR", &mut storage.directory);
        Self::apply_parsed_env_override("SESSION_STORAGE", &mut storage.backend);
        if let Ok(tab_id) = std::env::var("SESSION_TAB_ID") {
            storage.tab_id = Some(tab_id);
        }
    }

    /// Apply environment overrides for preferred login/logout methods
    pub fn apply_method_env_overrides(methods: &mut MethodSettings) {
        Self::apply_parsed_env_override("LOGIN_METHOD", &mut methods.login);
        Self::apply_parsed_env_override("LOGOUT_METHOD", &mut methods.logout);
    }

    /// Apply environment overrides for logging settings
    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Helper function to apply non-empty string environment variable overrides
    fn apply_string_env_override(env_var: &str, target: &mut String) {
        if let Ok(value) = std::env::var(env_var) {
            if !value.is_empty() {
                *target = value;
            }
        }
    }

    /// Helper function to apply parsed environment variable overrides; unparsable values are ignored
    fn apply_parsed_env_override<T: FromStr>(env_var: &str, target: &mut T) {
        if let Ok(value_str) = std::env::var(env_var) {
            match value_str.parse::<T>() {
                Ok(value) => *target = value,
                Err(_) => eprintln!("⚠️  Ignoring invalid value for {env_var}: {value_str}"),
            }
        }
    }

    /// Initialize the logger; a logger installed earlier wins
    fn initialize_logging(logging_settings: &LoggingSettings) {
        let result = env_logger::Builder::new()
            .parse_filters(&logging_settings.level)
            .try_init();
        if result.is_err() {
            log::debug!("Logger already initialized, keeping existing configuration");
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }
}
