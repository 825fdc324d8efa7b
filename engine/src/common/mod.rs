pub mod errors;

pub use errors::{PartialError, RuleParseError, SettingsError};
