//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.sentimeter/config.toml` (user)
//! 3. `/etc/sentimeter/config.toml` (system)
//! 4. built-in defaults
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.sentimeter/secrets.toml` (user, must be 0600)
//! 2. `/etc/sentimeter/secrets.toml` (system, must be 0600)
//! 3. `GOOGLE_NL_API_KEY` environment variable
//!
//! [`AnalysisConfig`] is the mutable, caller-owned part: the pipeline reads
//! `prefer_remote` from it and clears the flag when the remote backend
//! cannot be constructed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backends::lexical::LexicalBackend;
use crate::cache::CacheConfig;
use crate::{Result, SentimeterError};

/// Default snapshot bucket name.
pub const DEFAULT_BUCKET: &str = "comment-snapshots";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub lexical: LexicalConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Per-session analysis preferences.
///
/// Owned by the caller and passed explicitly into the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Try the remote backend first (default: true).
    #[serde(default = "default_prefer_remote")]
    pub prefer_remote: bool,
    /// Bucket that snapshots are written to.
    #[serde(default = "default_bucket")]
    pub storage_bucket: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            prefer_remote: default_prefer_remote(),
            storage_bucket: default_bucket(),
        }
    }
}

fn default_prefer_remote() -> bool {
    true
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

/// Remote (Google Cloud Natural Language) backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// API base URL (default: https://language.googleapis.com).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "https://language.googleapis.com".to_string()
}

impl RemoteConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Local lexical backend settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexicalConfig {
    /// Optional JSON lexicon merged over the built-in one.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

impl LexicalConfig {
    /// Construct the lexical backend described by this config.
    pub fn build(&self) -> Result<LexicalBackend> {
        LexicalBackend::from_lexicon_path(self.lexicon_path.as_deref())
    }
}

/// Score cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_max_entries() -> u64 {
    10_000
}

fn default_ttl_secs() -> u64 {
    3600
}

impl CacheSettings {
    /// The cache configuration, if caching is enabled.
    pub fn to_config(&self) -> Option<CacheConfig> {
        self.enabled.then(|| {
            CacheConfig::new()
                .max_entries(self.max_entries)
                .ttl(Duration::from_secs(self.ttl_secs))
        })
    }
}

/// Snapshot storage settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding one directory per bucket.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl StorageConfig {
    /// Storage root, defaulting to `~/.sentimeter/snapshots`.
    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".sentimeter")
                .join("snapshots")
        })
    }
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub google: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Backend name → environment variable name mapping.
const BACKEND_ENV_VARS: &[(&str, &str)] = &[("google", "GOOGLE_NL_API_KEY")];

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first existing
    /// standard location is used, falling back to defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SentimeterError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            SentimeterError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SentimeterError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".sentimeter").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/sentimeter/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (backends may use env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".sentimeter").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/sentimeter/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SentimeterError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            SentimeterError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    pub fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            SentimeterError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(SentimeterError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Get API key for a backend, falling back to the corresponding environment variable.
    pub fn api_key(&self, backend: &str) -> Option<String> {
        let from_file = match backend {
            "google" => self.google.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone())
        .filter(|key| !key.trim().is_empty());

        from_file.or_else(|| {
            BACKEND_ENV_VARS
                .iter()
                .find(|(name, _)| *name == backend)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
        })
    }
}
