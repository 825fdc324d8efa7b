use crate::app::event_bus::EventBus;
use crate::components::common::{Msg, NotificationMsg};
use engine::common::errors::{PartialError, SettingsError};
use std::fmt::Display;

/// Application-wide error type of the dashboard shell.
///
/// Component and page-module failures are reported through
/// [`ErrorReporter`] and never abort the page: a failing module only loses
/// its own components.
///
/// # Categories
///
/// - [`Component`] - a component could not bind to, or render into, the document
/// - [`State`] - lifecycle misuse, e.g. work arriving after teardown
/// - [`Config`] - configuration loading and validation
/// - [`Channel`] - internal message passing failed
/// - [`Partial`] - a page fragment could not be fetched
/// - [`Settings`] - the preference store could not be read or written
///
/// [`Component`]: AppError::Component
/// [`State`]: AppError::State
/// [`Config`]: AppError::Config
/// [`Channel`]: AppError::Channel
/// [`Partial`]: AppError::Partial
/// [`Settings`]: AppError::Settings
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Component(String),
    State(String),
    Config(String),
    Channel(String),
    Partial(String),
    Settings(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Component(msg) => write!(f, "Component Error: {msg}"),
            AppError::State(msg) => write!(f, "State Error: {msg}"),
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Channel(msg) => write!(f, "Channel Error: {msg}"),
            AppError::Partial(msg) => write!(f, "Partial Error: {msg}"),
            AppError::Settings(msg) => write!(f, "Settings Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<PartialError> for AppError {
    fn from(err: PartialError) -> Self {
        AppError::Partial(err.to_string())
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::Settings(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Component(format!("Invalid JSON: {err}"))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// How loudly an error is surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Logged at warn level, shown as a warning notification
    Warning,
    /// Logged at error level, shown as an error notification
    Error,
}

/// Context information for errors
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub user_message: String,
    pub technical_details: Option<String>,
    pub suggestion: Option<String>,
    pub severity: ErrorSeverity,
}

impl ErrorContext {
    /// Context with a generic message. Use [`ErrorContext::with_message`] for a specific one.
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            user_message: format!("An error occurred in {component}. Please try again."),
            technical_details: None,
            suggestion: None,
            severity: ErrorSeverity::Error,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.user_message = message.to_string();
        self
    }

    pub fn with_technical_details(mut self, details: &str) -> Self {
        self.technical_details = Some(details.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// An [`AppError`] together with the context it was reported in.
#[derive(Debug, Clone)]
pub struct ContextualError {
    pub error: AppError,
    pub context: ErrorContext,
}

impl ContextualError {
    pub fn new(error: AppError, context: ErrorContext) -> Self {
        Self { error, context }
    }
}

impl Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.context.user_message, self.error)
    }
}

/// Central error reporting: logs with context, then publishes a
/// notification on the event bus.
#[derive(Clone, Debug)]
pub struct ErrorReporter {
    bus: EventBus,
}

impl ErrorReporter {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn report_simple(&self, error: AppError, component: &str, operation: &str) {
        let context =
            ErrorContext::new(component, operation).with_technical_details(&error.to_string());
        self.report(error, context);
    }

    pub fn report(&self, error: AppError, context: ErrorContext) {
        let contextual_error = ContextualError::new(error.clone(), context.clone());
        let details = Self::format_additional_context(&context);

        match context.severity {
            ErrorSeverity::Warning => log::warn!(
                "[{}:{}] {}{}",
                context.component,
                context.operation,
                contextual_error,
                details
            ),
            ErrorSeverity::Error => log::error!(
                "[{}:{}] {}{}",
                context.component,
                context.operation,
                contextual_error,
                details
            ),
        }

        let notification = match context.severity {
            ErrorSeverity::Warning => NotificationMsg::ShowWarning(Self::format_user_message(&context)),
            ErrorSeverity::Error => {
                NotificationMsg::ShowError(Self::create_formatted_error(&error, &context))
            }
        };
        if self.bus.publish(Msg::Notification(notification)) == 0 {
            log::debug!("No notification subscribers for [{}:{}]", context.component, context.operation);
        }
    }

    /// A page module failed to produce its components.
    pub fn report_load_error(&self, module: &str, error: AppError) {
        let context = ErrorContext::new("PageLoader", "load_page_components")
            .with_message(&format!("Failed to load {module} components"))
            .with_technical_details(&error.to_string())
            .with_suggestion("The rest of the page is still usable")
            .with_severity(ErrorSeverity::Warning);
        self.report(error, context);
    }

    pub fn report_send_error(&self, context: &str, error: impl Display) {
        let app_error = AppError::Channel(format!("Failed to send {context}: {error}"));
        self.report_simple(app_error, "MessageChannel", "send_message");
    }

    fn format_additional_context(context: &ErrorContext) -> String {
        let mut parts = Vec::new();
        if let Some(ref technical_details) = context.technical_details {
            parts.push(format!("Technical: {technical_details}"));
        }
        if let Some(ref suggestion) = context.suggestion {
            parts.push(format!("Suggestion: {suggestion}"));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!(" | {}", parts.join(" | "))
        }
    }

    fn format_user_message(context: &ErrorContext) -> String {
        match context.suggestion {
            Some(ref suggestion) => format!("{}\n\n{suggestion}", context.user_message),
            None => context.user_message.clone(),
        }
    }

    fn create_formatted_error(error: &AppError, context: &ErrorContext) -> AppError {
        let mut formatted_message = format!("{}\n\n{}", Self::error_title(error), context.user_message);
        if let Some(ref technical) = context.technical_details {
            formatted_message.push_str(&format!("\n\nDetails: {technical}"));
        }
        if let Some(ref suggestion) = context.suggestion {
            formatted_message.push_str(&format!("\n\n{suggestion}"));
        }

        match error {
            AppError::Component(_) => AppError::Component(formatted_message),
            AppError::State(_) => AppError::State(formatted_message),
            AppError::Config(_) => AppError::Config(formatted_message),
            AppError::Channel(_) => AppError::Channel(formatted_message),
            AppError::Partial(_) => AppError::Partial(formatted_message),
            AppError::Settings(_) => AppError::Settings(formatted_message),
        }
    }

    fn error_title(error: &AppError) -> &'static str {
        match error {
            AppError::Component(_) => "Component Error",
            AppError::State(_) => "Application State Error",
            AppError::Config(_) => "Configuration Error",
            AppError::Channel(_) => "Communication Error",
            AppError::Partial(_) => "Page Fragment Error",
            AppError::Settings(_) => "Preferences Error",
        }
    }
}
