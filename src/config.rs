//! Configuration loading and validation.
//!
//! Loads `~/.penwright/config.toml` (or `$PENWRIGHT_CONFIG_PATH`, or an
//! explicit path). Precedence: env vars > `.env` credentials > config file >
//! defaults. A missing config file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::credentials::load_default_credentials;

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat-completions service settings (`[service]`).
    pub service: ServiceConfig,
    /// Logging settings (`[logging]`).
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with full precedence and validate it.
    ///
    /// `explicit` wins over `$PENWRIGHT_CONFIG_PATH` and the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if a config or credentials file exists but cannot be
    /// read or parsed, or if the result fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::config_path_with(|key| std::env::var(key).ok())?,
        };
        let mut config = Self::load_from_file(&path)?;

        let credentials = load_default_credentials().context("failed to load credentials")?;
        config.apply_overrides(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| credentials.get(key).map(str::to_owned))
        });

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file only, no overrides.
    fn load_from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
                    .with_context(|| format!("failed to parse config at {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config at {}: {e}",
                path.display()
            )),
        }
    }

    /// Resolve the config path using a custom env resolver.
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
        if let Some(p) = env("PENWRIGHT_CONFIG_PATH") {
            return Ok(PathBuf::from(p));
        }
        Ok(config_dir()?.join("config.toml"))
    }

    /// Apply overrides from a resolver (env > config > defaults).
    ///
    /// Takes a resolver function so tests never touch process env.
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("PENWRIGHT_BASE_URL") {
            self.service.base_url = v;
        }
        if let Some(v) = env("PENWRIGHT_MODEL") {
            self.service.model = v;
        }
        if let Some(v) = env("PENWRIGHT_API_KEY") {
            if !v.trim().is_empty() {
                self.service.api_key = Some(v);
            }
        }
        if let Some(v) = env("PENWRIGHT_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.service.timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "PENWRIGHT_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("PENWRIGHT_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has wrong field types.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }

    /// Check value ranges and the service URL.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.service.base_url)
            .with_context(|| format!("invalid service.base_url '{}'", self.service.base_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "service.base_url must use http or https, got '{}'",
                url.scheme()
            );
        }
        if self.service.model.trim().is_empty() {
            anyhow::bail!("service.model must not be empty");
        }
        if self.service.timeout_secs == 0 {
            anyhow::bail!("service.timeout_secs must be greater than zero");
        }
        if self.service.max_tokens == 0 {
            anyhow::bail!("service.max_tokens must be greater than zero");
        }
        if !(0.0..=2.0).contains(&self.service.temperature) {
            anyhow::bail!(
                "service.temperature must be within 0.0..=2.0, got {}",
                self.service.temperature
            );
        }
        Ok(())
    }
}

/// Resolve the config directory (`~/.penwright/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".penwright"))
}

// ── Service config ──────────────────────────────────────────────

/// Local OpenAI-compatible server used when no endpoint is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/v1";

/// OpenAI-compatible chat-completions service.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Bearer token. Prefer `PENWRIGHT_API_KEY` over storing it here.
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token limit.
    pub max_tokens: u32,
    /// Deadline for one request, in seconds.
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Request deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "__REDACTED__"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "glm-4-flash".to_string(),
            api_key: None,
            temperature: 0.8,
            max_tokens: 3000,
            timeout_secs: 60,
        }
    }
}

// ── Logging config ──────────────────────────────────────────────

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for rotated JSON logs; console only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
