//! Remote endpoint settings read from the process environment.

use crate::ConfigError;

/// Environment variable holding the Confluence REST API base URL.
pub const API_URL_VAR: &str = "GIT2SC_API_URL";

/// Environment variable holding the `username:password` pair.
pub const AUTH_VAR: &str = "GIT2SC_AUTH";

/// Basic authentication credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Account password or API token.
    pub password: String,
}

impl Credentials {
    /// Parse a `username:password` pair.
    ///
    /// The value is split once at the first colon, so the password itself
    /// may contain colons.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if there is no colon or the
    /// username is empty.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let (username, password) = value.split_once(':').ok_or_else(|| {
            ConfigError::Validation(format!("{AUTH_VAR} must have the form username:password"))
        })?;
        if username.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{AUTH_VAR} username cannot be empty"
            )));
        }
        Ok(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }
}

/// Connection settings for the Confluence REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// REST API base URL without trailing slash (e.g. `https://wiki.example.com/rest/api`).
    pub api_url: String,
    /// Basic auth credentials.
    pub credentials: Credentials,
}

impl RemoteConfig {
    /// Load settings from `GIT2SC_API_URL` and `GIT2SC_AUTH`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnv` for the first unset variable, or
    /// `ConfigError::Validation` if a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RemoteConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR).ok_or(ConfigError::MissingEnv(API_URL_VAR))?;
        let auth = lookup(AUTH_VAR).ok_or(ConfigError::MissingEnv(AUTH_VAR))?;

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "{API_URL_VAR} must start with http:// or https://"
            )));
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            credentials: Credentials::parse(&auth)?,
        })
    }
}
