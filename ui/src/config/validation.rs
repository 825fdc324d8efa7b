use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid page_size: {configured} (min: {min_limit}, max: {max_limit})")]
    PageSize {
        configured: usize,
        min_limit: usize,
        max_limit: usize,
    },
    #[error("Invalid resize_debounce_ms: {configured} (limit: {limit})")]
    ResizeDebounce { configured: u64, limit: u64 },
    #[error("Invalid {key}: {configured} (min: {min_limit}, max: {max_limit})")]
    Breakpoint {
        key: &'static str,
        configured: f64,
        min_limit: f64,
        max_limit: f64,
    },
    #[error("Invalid task_pool_size: {configured} (min: 1, max: {limit})")]
    TaskPoolSize { configured: usize, limit: usize },
    #[error("Invalid partials.base_url: '{configured}'")]
    PartialsBaseUrl { configured: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::PageSize {
                configured,
                min_limit,
                max_limit,
            } => format!(
                "Page size out of range!\n\n\
                Your configured value: {configured}\n\
                Valid range: {min_limit} - {max_limit}\n\n\
                Please update page_size in config.toml to a value between {min_limit} and {max_limit}."
            ),
            ConfigValidationError::ResizeDebounce { configured, limit } => format!(
                "Resize debounce too long!\n\n\
                Your configured value: {configured} ms\n\
                Maximum: {limit} ms\n\n\
                Please update resize_debounce_ms in config.toml."
            ),
            ConfigValidationError::Breakpoint {
                key,
                configured,
                min_limit,
                max_limit,
            } => format!(
                "Breakpoint out of range!\n\n\
                Your configured value: {configured}px\n\
                Valid range: {min_limit}px - {max_limit}px\n\n\
                Please update {key} in config.toml."
            ),
            ConfigValidationError::TaskPoolSize { configured, limit } => format!(
                "Task pool size out of range!\n\n\
                Your configured value: {configured}\n\
                Valid range: 1 - {limit}\n\n\
                Please update task_pool_size in config.toml."
            ),
            ConfigValidationError::PartialsBaseUrl { configured } => format!(
                "Partials base URL is empty or malformed!\n\n\
                Your configured value: '{configured}'\n\n\
                Use an http(s) URL or a directory path in [partials] base_url."
            ),
        }
    }
}

/// Configuration loading result
#[derive(Debug, Clone)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}
