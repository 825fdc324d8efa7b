use thiserror::Error;

/// Errors raised while fetching HTML fragments.
///
/// None of these ever reach the page: [`crate::partials::PartialsClient`]
/// logs them and substitutes empty content. They exist so that sources can
/// be tested and so the log line says what actually went wrong.
#[derive(Debug, Error)]
pub enum PartialError {
    #[error("HTTP client creation failed: {reason}")]
    ClientCreation { reason: String },

    #[error("Invalid partial URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request failed: {url} - {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Errors raised by settings backends.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Failed to read settings from {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to write settings to {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Settings file {path} is corrupted: {reason}")]
    Corrupted { path: String, reason: String },
}

/// Errors raised while parsing a single validation rule token.
///
/// The parser never drops a token because of these; the rule is kept in a
/// malformed state that always fails, so a typo in markup shows up as an
/// invalid field instead of silently passing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("Rule '{rule}' requires an argument")]
    MissingArgument { rule: String },

    #[error("Rule '{rule}' expects a non-negative integer, got '{argument}'")]
    InvalidLength { rule: String, argument: String },

    #[error("Rule 'regex' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
