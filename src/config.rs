//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! The proxy target is never written in the config file. It is read from
//! the variable named by `proxy.target_env` (default `VITE_API_URL`), looked
//! up in the env files and the process environment at startup.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::envfile::{EnvFiles, EnvMap};
use crate::proxy::{ProxyRule, DEFAULT_PREFIX};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub static_files: StaticFilesConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub env: EnvConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dev server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5173
}

fn default_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: default_cors(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Built application files
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default = "default_static_root")]
    pub root: PathBuf,

    #[serde(default = "default_index")]
    pub index: String,
}

fn default_static_root() -> PathBuf {
    PathBuf::from("dist")
}

fn default_index() -> String {
    "index.html".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: default_static_root(),
            index: default_index(),
        }
    }
}

impl StaticFilesConfig {
    /// Path of the app shell served for every matched route
    pub fn shell_path(&self) -> PathBuf {
        self.root.join(&self.index)
    }
}

/// Reverse-proxy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Name of the variable holding the target origin
    #[serde(default = "default_target_env")]
    pub target_env: String,

    #[serde(default = "default_change_origin")]
    pub change_origin: bool,

    #[serde(default)]
    pub secure: bool,

    /// Upstream timeout; unbounded when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_target_env() -> String {
    "VITE_API_URL".to_string()
}

fn default_change_origin() -> bool {
    true
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            target_env: default_target_env(),
            change_origin: default_change_origin(),
            secure: false,
            timeout_secs: None,
        }
    }
}

impl ProxyConfig {
    /// Look up the target origin in `env`.
    ///
    /// An unset or blank variable is a configuration error, not a silent
    /// pass-through.
    pub fn resolve_target(&self, env: &EnvMap) -> Result<String, ConfigError> {
        match env.get(&self.target_env).map(|v| v.trim()) {
            Some(target) if !target.is_empty() => Ok(target.to_string()),
            _ => Err(ConfigError::MissingTarget {
                var: self.target_env.clone(),
            }),
        }
    }

    /// Build the proxy rule with the target taken from `env`
    pub fn build_rule(&self, env: &EnvMap) -> Result<ProxyRule, ConfigError> {
        if !self.prefix.starts_with('/') || self.prefix.len() < 2 {
            return Err(ConfigError::InvalidPrefix(self.prefix.clone()));
        }

        let target = self.resolve_target(env)?;
        let rule = ProxyRule::new(self.prefix.clone(), &target).map_err(|e| {
            ConfigError::InvalidTarget {
                var: self.target_env.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(rule.change_origin(self.change_origin).secure(self.secure))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Where env files are read from
#[derive(Debug, Clone, Deserialize)]
pub struct EnvConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_env_dir")]
    pub dir: PathBuf,
}

fn default_mode() -> String {
    "development".to_string()
}

fn default_env_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            dir: default_env_dir(),
        }
    }
}

impl EnvConfig {
    pub fn files(&self) -> EnvFiles {
        EnvFiles::new(&self.dir, &self.mode)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// First config file found in the default locations
    pub fn discover() -> Option<PathBuf> {
        let config_paths = [
            Some(PathBuf::from("./branchfinder.toml")),
            dirs::config_dir().map(|p| p.join("branchfinder").join("config.toml")),
            Some(PathBuf::from("/etc/branchfinder/config.toml")),
        ];

        config_paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Load from default locations or environment
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::discover() {
            Some(path) => Self::load_with_env(&path),
            None => Ok(Self::from_env()),
        }
    }

    /// Build the proxy rule, reading env files and the process environment
    pub fn proxy_rule(&self) -> Result<ProxyRule, ConfigError> {
        let env = self.env.files().load_with_process_env()?;
        self.proxy.build_rule(&env)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("BRANCHFINDER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("BRANCHFINDER_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Ok(root) = std::env::var("BRANCHFINDER_STATIC_ROOT") {
            self.static_files.root = PathBuf::from(root);
        }

        if let Ok(level) = std::env::var("BRANCHFINDER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BRANCHFINDER_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Failed to read env file {path:?}: {error}")]
    EnvFile { path: PathBuf, error: String },

    #[error("Proxy target is not configured: set {var}")]
    MissingTarget { var: String },

    #[error("Invalid proxy target in {var}: {reason}")]
    InvalidTarget { var: String, reason: String },

    #[error("Proxy prefix must start with '/' and name a path: {0:?}")]
    InvalidPrefix(String),

    #[error("Unknown log format: {0}")]
    InvalidLogFormat(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# branchfinder dev server configuration
#
# Environment variables override these settings:
# - BRANCHFINDER_HOST
# - BRANCHFINDER_PORT
# - BRANCHFINDER_STATIC_ROOT
# - BRANCHFINDER_LOG_LEVEL
# - BRANCHFINDER_LOG_FORMAT

[server]
host = "localhost"
port = 5173

# Permissive CORS on every response from the dev server
cors = true

[static_files]
# Built application directory
root = "dist"

# App shell served for every matched route
index = "index.html"

[proxy]
# Requests whose path starts with this prefix are forwarded
prefix = "/api"

# Variable holding the target origin, e.g. in .env:
#   VITE_API_URL=https://bank.5xcamp.us
target_env = "VITE_API_URL"

# Rewrite the Host header to the target
change_origin = true

# Validate the target's TLS certificate
secure = false

# Upstream timeout in seconds (unbounded when unset)
# timeout_secs = 30

[env]
# Env files read: .env, .env.local, .env.<mode>, .env.<mode>.local
mode = "development"
dir = "."

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.addr(), "localhost:5173");
        assert!(config.server.cors);
        assert_eq!(config.proxy.prefix, "/api");
        assert_eq!(config.proxy.target_env, "VITE_API_URL");
        assert!(config.proxy.change_origin);
        assert!(!config.proxy.secure);
        assert_eq!(config.proxy.timeout(), None);
        assert_eq!(
            config.static_files.shell_path(),
            PathBuf::from("dist/index.html")
        );
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 5173);
        assert_eq!(config.proxy.prefix, "/api");
        assert_eq!(config.env.mode, "development");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [server]
            port = 8080

            [proxy]
            timeout_secs = 30

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.proxy.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[server\nport = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_resolve_target() {
        let proxy = ProxyConfig::default();
        let target = proxy
            .resolve_target(&env(&[("VITE_API_URL", "https://bank.5xcamp.us")]))
            .unwrap();
        assert_eq!(target, "https://bank.5xcamp.us");
    }

    #[test]
    fn test_missing_target_is_error() {
        let proxy = ProxyConfig::default();

        let err = proxy.resolve_target(&EnvMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTarget { ref var } if var == "VITE_API_URL"));

        let err = proxy
            .resolve_target(&env(&[("VITE_API_URL", "   ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingTarget { .. }));
    }

    #[test]
    fn test_build_rule() {
        let proxy = ProxyConfig {
            secure: true,
            ..Default::default()
        };
        let rule = proxy
            .build_rule(&env(&[("VITE_API_URL", "https://bank.5xcamp.us")]))
            .unwrap();

        assert_eq!(rule.prefix(), "/api");
        assert!(rule.is_secure());
        assert!(rule.changes_origin());
        assert_eq!(rule.target().host_str(), Some("bank.5xcamp.us"));
    }

    #[test]
    fn test_build_rule_invalid_target() {
        let err = ProxyConfig::default()
            .build_rule(&env(&[("VITE_API_URL", "bank.5xcamp.us")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTarget { .. }));
    }

    #[test]
    fn test_build_rule_invalid_prefix() {
        let proxy = ProxyConfig {
            prefix: "api".to_string(),
            ..Default::default()
        };
        let err = proxy
            .build_rule(&env(&[("VITE_API_URL", "https://bank.5xcamp.us")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix(_)));
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
