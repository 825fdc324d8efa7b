use crate::common::errors::RuleParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Source of the current values of every field in a form.
///
/// `confirmed:other` looks the sibling up through this; labels are optional
/// and only used for error messages.
pub trait FormValues {
    /// Raw (untrimmed) value of `field`, `None` when the form has no such field.
    fn value(&self, field: &str) -> Option<String>;

    /// Text of the `<label>` bound to `field`, if any.
    fn label(&self, _field: &str) -> Option<String> {
        None
    }
}

impl FormValues for std::collections::HashMap<String, String> {
    fn value(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

impl FormValues for indexmap::IndexMap<String, String> {
    fn value(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

/// A single parsed rule token.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    Min(usize),
    Max(usize),
    Email,
    Numeric,
    Alpha,
    Alphanumeric,
    Url,
    Confirmed(String),
    Pattern(Regex),
    /// Unrecognised rule name. Always passes.
    Unknown {
        name: String,
        argument: Option<String>,
    },
    /// Recognised name with an unusable argument. Always fails.
    Malformed {
        name: String,
        argument: Option<String>,
        error: RuleParseError,
    },
}

impl Rule {
    /// Parse one `name` or `name:argument` token. Only the first `:` splits,
    /// so patterns such as `regex:^\d{2}:\d{2}$` keep their colons.
    pub fn parse(token: &str) -> Rule {
        let token = token.trim();
        let (name, argument) = match token.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (token, None),
        };

        match Self::parse_known(name, argument) {
            Ok(Some(rule)) => rule,
            Ok(None) => {
                log::debug!("Unknown validation rule '{name}' passes by default");
                Rule::Unknown {
                    name: name.to_string(),
                    argument: argument.map(str::to_string),
                }
            }
            Err(error) => {
                log::warn!("Malformed validation rule '{token}': {error}");
                Rule::Malformed {
                    name: name.to_string(),
                    argument: argument.map(str::to_string),
                    error,
                }
            }
        }
    }

    fn parse_known(name: &str, argument: Option<&str>) -> Result<Option<Rule>, RuleParseError> {
        let rule = match name {
            "required" => Rule::Required,
            "min" => Rule::Min(Self::length_argument(name, argument)?),
            "max" => Rule::Max(Self::length_argument(name, argument)?),
            "email" => Rule::Email,
            "numeric" => Rule::Numeric,
            "alpha" => Rule::Alpha,
            "alphanumeric" => Rule::Alphanumeric,
            "url" => Rule::Url,
            "confirmed" => match argument {
                Some(other) if !other.is_empty() => Rule::Confirmed(other.to_string()),
                _ => {
                    return Err(RuleParseError::MissingArgument {
                        rule: name.to_string(),
                    });
                }
            },
            "regex" => {
                let pattern = argument.ok_or_else(|| RuleParseError::MissingArgument {
                    rule: name.to_string(),
                })?;
                let regex = Regex::new(pattern).map_err(|e| RuleParseError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
                Rule::Pattern(regex)
            }
            _ => return Ok(None),
        };
        Ok(Some(rule))
    }

    fn length_argument(name: &str, argument: Option<&str>) -> Result<usize, RuleParseError> {
        let argument = argument.ok_or_else(|| RuleParseError::MissingArgument {
            rule: name.to_string(),
        })?;
        argument
            .trim()
            .parse()
            .map_err(|_| RuleParseError::InvalidLength {
                rule: name.to_string(),
                argument: argument.to_string(),
            })
    }

    /// Rule name as written in markup.
    pub fn name(&self) -> &str {
        match self {
            Rule::Required => "required",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Email => "email",
            Rule::Numeric => "numeric",
            Rule::Alpha => "alpha",
            Rule::Alphanumeric => "alphanumeric",
            Rule::Url => "url",
            Rule::Confirmed(_) => "confirmed",
            Rule::Pattern(_) => "regex",
            Rule::Unknown { name, .. } | Rule::Malformed { name, .. } => name,
        }
    }

    /// Argument as written in markup, used in error messages.
    pub fn argument(&self) -> Option<String> {
        match self {
            Rule::Min(n) | Rule::Max(n) => Some(n.to_string()),
            Rule::Confirmed(other) => Some(other.clone()),
            Rule::Pattern(regex) => Some(regex.as_str().to_string()),
            Rule::Unknown { argument, .. } | Rule::Malformed { argument, .. } => argument.clone(),
            _ => None,
        }
    }

    /// Check `value` (already trimmed) against this rule.
    ///
    /// Format rules accept the empty string; only `required` rejects it.
    pub fn check(&self, value: &str, form: &dyn FormValues) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::Min(n) => value.chars().count() >= *n,
            Rule::Max(n) => value.chars().count() <= *n,
            Rule::Email => value.is_empty() || EMAIL_PATTERN.is_match(value),
            Rule::Numeric => value.chars().all(|c| c.is_ascii_digit()),
            Rule::Alpha => value.chars().all(|c| c.is_ascii_alphabetic()),
            Rule::Alphanumeric => value.chars().all(|c| c.is_ascii_alphanumeric()),
            Rule::Url => value.is_empty() || url::Url::parse(value).is_ok(),
            Rule::Confirmed(other) => form.value(other).is_some_and(|other| value == other),
            Rule::Pattern(regex) => value.is_empty() || regex.is_match(value),
            Rule::Unknown { .. } => true,
            Rule::Malformed { .. } => false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Rule::Unknown { .. })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument() {
            Some(argument) => write!(f, "{}:{}", self.name(), argument),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// Split a pipe-separated rule string into parsed rules, skipping empty tokens.
pub fn parse_rules(spec: &str) -> Vec<Rule> {
    spec.split('|')
        .filter(|token| !token.trim().is_empty())
        .map(Rule::parse)
        .collect()
}
