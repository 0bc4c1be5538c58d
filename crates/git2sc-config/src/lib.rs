//! Configuration management for git2sc.
//!
//! Two sources feed the configuration:
//!
//! - The process environment supplies the connection settings
//!   (`GIT2SC_API_URL` and `GIT2SC_AUTH`), see [`RemoteConfig`].
//! - An optional `git2sc.toml` file, auto-discovered in the current directory
//!   and its parents, supplies directory sync and HTTP settings.
//!
//! CLI settings can be applied after load via [`CliSettings`].

mod remote;

pub use remote::{API_URL_VAR, AUTH_VAR, Credentials, RemoteConfig};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "git2sc.toml";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override target space key.
    pub space: Option<String>,
    /// Override local documentation directory.
    pub source_dir: Option<PathBuf>,
    /// Additional directory names to exclude.
    pub excluded_dirs: Vec<String>,
    /// Override parent page ID.
    pub parent_id: Option<String>,
    /// Abort the sync on the first failure.
    pub fail_fast: Option<bool>,
    /// Override prune flag.
    pub prune: Option<bool>,
}

/// What a multi-page operation does after a single page fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure and keep going.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sync section as parsed from TOML (paths are relative strings).
    sync: SyncConfigRaw,
    /// HTTP client configuration.
    pub http: HttpConfig,

    /// Resolved sync configuration (set after loading).
    #[serde(skip)]
    pub sync_resolved: SyncConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw sync configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SyncConfigRaw {
    space: Option<String>,
    source_dir: Option<String>,
    excluded_dirs: Vec<String>,
    parent_id: Option<String>,
    on_error: ErrorPolicy,
    prune: bool,
}

/// Resolved directory sync configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Target space key.
    pub space: Option<String>,
    /// Local documentation directory (absolute when loaded from a file).
    pub source_dir: PathBuf,
    /// Directory names pruned from traversal.
    pub excluded_dirs: Vec<String>,
    /// Page under which the tree is mirrored (defaults to the space homepage).
    pub parent_id: Option<String>,
    /// Failure handling during sync.
    pub on_error: ErrorPolicy,
    /// Delete remote pages that no longer have a local source.
    pub prune: bool,
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Global request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("{0} environmental variable not set")]
    MissingEnv(&'static str),
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `git2sc.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value is invalid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default_with_cwd())
        }
    }

    /// Apply CLI settings to the resolved configuration.
    pub fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let sync = &mut self.sync_resolved;
        if let Some(space) = &settings.space {
            sync.space = Some(space.clone());
        }
        if let Some(source_dir) = &settings.source_dir {
            sync.source_dir.clone_from(source_dir);
        }
        for dir in &settings.excluded_dirs {
            if !sync.excluded_dirs.contains(dir) {
                sync.excluded_dirs.push(dir.clone());
            }
        }
        if let Some(parent_id) = &settings.parent_id {
            sync.parent_id = Some(parent_id.clone());
        }
        if settings.fail_fast == Some(true) {
            sync.on_error = ErrorPolicy::Abort;
        }
        if let Some(prune) = settings.prune {
            sync.prune = prune;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        for dir in &self.sync_resolved.excluded_dirs {
            if dir.is_empty() || dir.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "sync.excluded_dirs entry {dir:?} must be a plain directory name"
                )));
            }
        }

        if let Some(space) = &self.sync_resolved.space
            && space.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "sync.space cannot be empty".to_owned(),
            ));
        }

        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            sync: SyncConfigRaw::default(),
            http: HttpConfig::default(),
            sync_resolved: SyncConfig {
                source_dir: base.to_path_buf(),
                ..SyncConfig::default()
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Resolve relative paths against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.sync;
        self.sync_resolved = SyncConfig {
            space: raw.space.clone(),
            source_dir: config_dir.join(raw.source_dir.as_deref().unwrap_or(".")),
            excluded_dirs: raw.excluded_dirs.clone(),
            parent_id: raw.parent_id.clone(),
            on_error: raw.on_error,
            prune: raw.prune,
        };
    }
}
