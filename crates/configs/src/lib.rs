use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { field, reason: reason.into() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub startup: StartupConfig,
}

/// What the startup binary does before reporting the store ready.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupConfig {
    #[serde(default = "default_true")]
    pub ensure_created: bool,
    #[serde(default)]
    pub seed: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self { ensure_created: true, seed: false }
    }
}

/// How to reach the backing store. Shared read-only between store instances.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_true")]
    pub connect_lazy: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

const SUPPORTED_SCHEMES: [&str; 3] = ["postgres://", "postgresql://", "sqlite:"];

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            connect_lazy: true,
        }
    }
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_string(), source })?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to the environment when the
    /// file does not exist, then validate.
    pub fn load_and_validate() -> Result<Self, ConfigError> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Self::from_env()?
            }
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig::from_lookup(&lookup)?;
        let mut startup = StartupConfig::default();
        if let Some(v) = parse_var::<bool, _>(&lookup, "STARTUP_ENSURE_CREATED", "startup.ensure_created")? {
            startup.ensure_created = v;
        }
        if let Some(v) = parse_var::<bool, _>(&lookup, "STARTUP_SEED", "startup.seed")? {
            startup.seed = v;
        }
        Ok(Self { database, startup })
    }

    pub fn normalize_and_validate(&mut self) -> Result<(), ConfigError> {
        // A TOML file without a URL may still get one from the environment.
        self.database.normalize_from_env();
        self.database.validate()
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Self::default() }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::new(lookup("DATABASE_URL").unwrap_or_default());
        if let Some(v) = parse_var(&lookup, "DB_MAX_CONNECTIONS", "database.max_connections")? {
            cfg.max_connections = v;
        }
        if let Some(v) = parse_var(&lookup, "DB_MIN_CONNECTIONS", "database.min_connections")? {
            cfg.min_connections = v;
        }
        if let Some(v) = parse_var(&lookup, "DB_CONNECT_TIMEOUT_SECS", "database.connect_timeout_secs")? {
            cfg.connect_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", "database.acquire_timeout_secs")? {
            cfg.acquire_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "DB_SQLX_LOGGING", "database.sqlx_logging")? {
            cfg.sqlx_logging = v;
        }
        Ok(cfg)
    }

    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Missing("database.url"));
        }
        let lower = url.to_lowercase();
        if !SUPPORTED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
            return Err(ConfigError::invalid(
                "database.url",
                "must start with postgres://, postgresql:// or sqlite:",
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::invalid("database.min_connections", "must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(ConfigError::invalid(
                "database.max_connections",
                format!("{} is below min_connections {}", self.max_connections, self.min_connections),
            ));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(ConfigError::invalid("database timeouts", "must be a positive number of seconds"));
        }
        Ok(())
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.trim().to_lowercase().starts_with("sqlite:")
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::invalid(field, format!("cannot parse {key}={raw}"))),
    }
}
