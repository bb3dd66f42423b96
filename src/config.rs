use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_ENV: &str = "development";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOAST_DURATION_MS: u64 = 2500;
const DEFAULT_NEAR_CAPACITY_THRESHOLD: f64 = 0.9;
const CONFIG_DIR: &str = "config";
const SESSION_FILE_NAME: &str = ".warehouse-dashboard-session.json";

/// Dashboard configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Root URL of the inventory backend
    #[validate(custom = "validate_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (1 - 300)
    #[serde(default = "default_request_timeout_secs")]
    #[validate(custom = "validate_request_timeout")]
    pub request_timeout_secs: u64,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// How long a toast stays visible unless the caller overrides it
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Fraction of capacity at which a warehouse is flagged as near capacity
    #[serde(default = "default_near_capacity_threshold")]
    #[validate(custom = "validate_near_capacity_threshold")]
    pub near_capacity_threshold: f64,

    /// Where the session cookie is persisted between runs
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}

impl AppConfig {
    /// Creates a configuration pointing at `base_url` with every other value defaulted
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            request_timeout_secs: default_request_timeout_secs(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            toast_duration_ms: default_toast_duration_ms(),
            near_capacity_threshold: default_near_capacity_threshold(),
            session_file: None,
        }
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// Session file location: explicit setting, then `$HOME`, then the working directory.
    pub fn session_file_path(&self) -> PathBuf {
        if let Some(path) = &self.session_file {
            return path.clone();
        }
        env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SESSION_FILE_NAME)
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_toast_duration_ms() -> u64 {
    DEFAULT_TOAST_DURATION_MS
}

fn default_near_capacity_threshold() -> f64 {
    DEFAULT_NEAR_CAPACITY_THRESHOLD
}

fn validate_base_url(raw: &str) -> Result<(), ValidationError> {
    match url::Url::parse(raw) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => {
            let mut err = ValidationError::new("base_url");
            err.message = Some("base_url must be an absolute http(s) URL".into());
            Err(err)
        }
    }
}

fn validate_request_timeout(secs: u64) -> Result<(), ValidationError> {
    if secs == 0 || secs > 300 {
        let mut err = ValidationError::new("request_timeout_secs");
        err.message = Some("request_timeout_secs must be between 1 and 300".into());
        return Err(err);
    }
    Ok(())
}

fn validate_near_capacity_threshold(threshold: f64) -> Result<(), ValidationError> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        let mut err = ValidationError::new("near_capacity_threshold");
        err.message =
            Some("near_capacity_threshold must be a finite value in (0.0, 1.0]".into());
        return Err(err);
    }
    Ok(())
}

/// Initializes tracing using the provided log level as the default filter.
/// Output goes to stderr so printed tables stay clean.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("warehouse_dashboard={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .with_writer(std::io::stderr)
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Loads configuration from defaults, `config/` files and `APP__*` environment variables.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("environment", run_env.as_str())?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
