use super::{LoggingConfig, PartialsConfig, SettingsConfig, limits::*, validation::ConfigValidationError};
use engine::datatable::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    page_size: Option<usize>,
    resize_debounce_ms: Option<u64>,
    mobile_breakpoint_px: Option<f64>,
    navigation_breakpoint_px: Option<f64>,
    task_pool_size: Option<usize>,
    /// Fallback viewport width when the host does not report one
    viewport_width_px: Option<f64>,

    #[serde(default)]
    partials: PartialsConfig,
    #[serde(default)]
    settings: SettingsConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let page_size = self.page_size();
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            errors.push(ConfigValidationError::PageSize {
                configured: page_size,
                min_limit: MIN_PAGE_SIZE,
                max_limit: MAX_PAGE_SIZE,
            });
        }

        if self.resize_debounce_ms() > MAX_RESIZE_DEBOUNCE_MS {
            errors.push(ConfigValidationError::ResizeDebounce {
                configured: self.resize_debounce_ms(),
                limit: MAX_RESIZE_DEBOUNCE_MS,
            });
        }

        for (key, value) in [
            ("mobile_breakpoint_px", self.mobile_breakpoint_px()),
            ("navigation_breakpoint_px", self.navigation_breakpoint_px()),
        ] {
            if !(MIN_BREAKPOINT_PX..=MAX_BREAKPOINT_PX).contains(&value) {
                errors.push(ConfigValidationError::Breakpoint {
                    key,
                    configured: value,
                    min_limit: MIN_BREAKPOINT_PX,
                    max_limit: MAX_BREAKPOINT_PX,
                });
            }
        }

        let pool = self.task_pool_size();
        if pool == 0 || pool > MAX_TASK_POOL_SIZE {
            errors.push(ConfigValidationError::TaskPoolSize {
                configured: pool,
                limit: MAX_TASK_POOL_SIZE,
            });
        }

        if let Some(base) = self.partials.base_url() {
            if base.trim().is_empty() {
                errors.push(ConfigValidationError::PartialsBaseUrl {
                    configured: base.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms())
    }

    pub fn resize_debounce_ms(&self) -> u64 {
        self.resize_debounce_ms.unwrap_or(150)
    }

    /// Widths at or below this are the mobile layout
    pub fn mobile_breakpoint_px(&self) -> f64 {
        self.mobile_breakpoint_px.unwrap_or(991.98)
    }

    /// Widths above this close the navigation overlay
    pub fn navigation_breakpoint_px(&self) -> f64 {
        self.navigation_breakpoint_px.unwrap_or(768.0)
    }

    pub fn task_pool_size(&self) -> usize {
        self.task_pool_size.unwrap_or(4)
    }

    pub fn viewport_width_px(&self) -> f64 {
        self.viewport_width_px.unwrap_or(1280.0)
    }

    pub fn partials(&self) -> &PartialsConfig {
        &self.partials
    }

    pub fn settings(&self) -> &SettingsConfig {
        &self.settings
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    fn parse(toml: &str) -> AppConfig {
        let config = assert_ok!(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml))
                .build()
        );
        assert_ok!(config.try_deserialize::<AppConfig>())
    }

    #[test]
    fn test_defaults() {
        let config = parse("");
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.resize_debounce(), Duration::from_millis(150));
        assert_eq!(config.mobile_breakpoint_px(), 991.98);
        assert_eq!(config.navigation_breakpoint_px(), 768.0);
        assert_eq!(config.task_pool_size(), 4);
        assert_none!(config.partials().base_url());
        assert_none!(config.settings().path());
        assert_eq!(config.logging().level(), "info");
        assert_ok!(config.validate());
    }

    #[test]
    fn test_sections_are_read() {
        let config = parse(
            r#"
            page_size = 25
            resize_debounce_ms = 300

            [partials]
            base_url = "https://sufee.io/admin"

            [settings]
            path = "/tmp/sufee.json"

            [logging]
            level = "debug"
            file = "dash.log"
            "#,
        );
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.resize_debounce_ms(), 300);
        assert_eq!(config.partials().base_url(), Some("https://sufee.io/admin"));
        assert_eq!(
            config.settings().path().map(|p| p.to_string_lossy().into_owned()),
            Some("/tmp/sufee.json".to_string())
        );
        assert_eq!(config.logging().level(), "debug");
        assert_eq!(config.logging().file(), Some("dash.log"));
    }

    #[test]
    fn test_out_of_range_values_are_reported() {
        let config = parse(
            r#"
            page_size = 0
            resize_debounce_ms = 10000
            mobile_breakpoint_px = 10.0
            task_pool_size = 0
            "#,
        );
        let errors = assert_err!(config.validate());
        assert_eq!(errors.len(), 4);
        assert_matches!(&errors[0], ConfigValidationError::PageSize { configured: 0, .. });
        assert!(errors[2].user_message().contains("mobile_breakpoint_px"));
    }
}
