use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Backend connection settings as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiFileConfig {
    /// Scheme the client runs under ("https" or "http")
    pub scheme: Option<String>,
    /// Explicit backend base URL (e.g., "https://api.example.com/api")
    pub url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the stored session
    pub data_dir: ConfigValue<PathBuf>,
    /// Scheme used to pick the backend
    pub api_scheme: ConfigValue<String>,
    /// Explicit backend URL, overriding the scheme-based choice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<ConfigValue<String>>,
    /// Request timeout in seconds
    pub api_timeout_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    api: Option<ApiFileConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut api_scheme = ConfigValue::new("https".to_string(), ConfigSource::Default);
        let mut api_url = None;
        let mut api_timeout_secs = ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(api) = file_config.api {
                if let Some(scheme) = api.scheme {
                    api_scheme = ConfigValue::new(scheme, ConfigSource::File);
                }
                if let Some(url) = api.url {
                    api_url = Some(ConfigValue::new(url, ConfigSource::File));
                }
                if let Some(secs) = api.timeout_secs {
                    api_timeout_secs = ConfigValue::new(secs, ConfigSource::File);
                }
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("HPLUS_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(scheme) = std::env::var("HPLUS_API_SCHEME") {
            api_scheme = ConfigValue::new(scheme, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("HPLUS_API_URL") {
            api_url = Some(ConfigValue::new(url, ConfigSource::Environment));
        }
        if let Ok(secs) = std::env::var("HPLUS_API_TIMEOUT") {
            let secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HPLUS_API_TIMEOUT".to_string(), secs))?;
            api_timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            api_scheme,
            api_url,
            api_timeout_secs,
            config_file,
        })
    }

    /// Request timeout; zero disables it.
    pub fn timeout(&self) -> Option<Duration> {
        match self.api_timeout_secs.value {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/hplus/
    /// - macOS: ~/Library/Application Support/hplus/
    /// - Windows: %APPDATA%/hplus/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hplus")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/hplus/
    /// - macOS: ~/Library/Application Support/hplus/
    /// - Windows: %APPDATA%/hplus/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hplus")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
