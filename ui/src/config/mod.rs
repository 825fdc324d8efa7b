use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

pub mod app;
pub mod limits;
pub mod validation;

pub use app::AppConfig;
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Configuration loaded on first access
static CONFIG: OnceLock<ConfigLoadResult> = OnceLock::new();

/// Result of the latest [`reload_config`], shadowing [`CONFIG`]
static RELOADABLE_CONFIG: OnceLock<RwLock<Option<&'static ConfigLoadResult>>> = OnceLock::new();

/// Path given to [`init_config`], reused by reloads
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Build the configuration from `path` (optional file) and the environment.
///
/// Environment variables override file values; nested keys use `__`, e.g.
/// `LOGGING__LEVEL=debug`. A `.env` file is honoured.
pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    dotenv::dotenv().ok();
    let env_source = Environment::default().separator("__");
    let file_source = File::from(path).required(false);

    let config = match Config::builder()
        .add_source(file_source)
        .add_source(env_source)
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check {} and your environment variables.",
                path.display()
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => ConfigLoadResult::Success(Box::new(app_config)),
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

fn config_path() -> &'static Path {
    CONFIG_PATH.get_or_init(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Choose the configuration file before the first [`get_config`] call.
/// Returns false when a path was already fixed.
pub fn init_config(path: Option<&Path>) -> bool {
    match path {
        Some(path) => CONFIG_PATH.set(path.to_path_buf()).is_ok(),
        None => true,
    }
}

pub fn get_config() -> &'static ConfigLoadResult {
    let reloadable = RELOADABLE_CONFIG.get_or_init(|| RwLock::new(None));
    if let Ok(guard) = reloadable.read() {
        if let Some(reloaded) = *guard {
            return reloaded;
        }
    }

    CONFIG.get_or_init(|| load_config_from(config_path()))
}

/// The loaded configuration, or defaults when loading failed.
pub fn get_config_or_default() -> &'static AppConfig {
    static FALLBACK: OnceLock<AppConfig> = OnceLock::new();
    match get_config() {
        ConfigLoadResult::Success(config) => config,
        ConfigLoadResult::LoadError(e) | ConfigLoadResult::DeserializeError(e) => {
            log::warn!("{e}. Using default configuration");
            FALLBACK.get_or_init(AppConfig::default)
        }
    }
}

/// Reload the configuration from file and environment, validating it.
pub fn reload_config() -> Result<(), String> {
    log::info!("Reloading configuration from files and environment variables");

    let fresh = match load_config_from(config_path()) {
        ConfigLoadResult::Success(config) => match config.validate() {
            Ok(()) => ConfigLoadResult::Success(config),
            Err(errors) => {
                let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
                ConfigLoadResult::DeserializeError(format!(
                    "Configuration validation failed:\n{}",
                    messages.join("\n\n")
                ))
            }
        },
        failed => failed,
    };

    let outcome = match &fresh {
        ConfigLoadResult::Success(_) => Ok(()),
        ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => {
            Err(msg.clone())
        }
    };

    let reloadable = RELOADABLE_CONFIG.get_or_init(|| RwLock::new(None));
    match reloadable.write() {
        Ok(mut guard) => {
            // Leaked so callers can keep handing out `&'static` references.
            *guard = Some(Box::leak(Box::new(fresh)));
        }
        Err(e) => {
            let error_msg = format!("Failed to acquire write lock for configuration reload: {e}");
            log::error!("{error_msg}");
            return Err(error_msg);
        }
    }

    match &outcome {
        Ok(()) => log::info!("Configuration reloaded successfully"),
        Err(msg) => log::error!("Configuration reload failed: {msg}"),
    }
    outcome
}

/// `[partials]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PartialsConfig {
    base_url: Option<String>,
}

impl PartialsConfig {
    /// `http(s)://` base or a directory containing `partials/`
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// `[settings]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SettingsConfig {
    path: Option<PathBuf>,
}

impl SettingsConfig {
    /// Settings file; the platform config dir is used when unset
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// `[logging]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
