//! Declarative, rule-string driven field validation.
//!
//! Every field carries an ordered list of rules parsed from a pipe-separated
//! string such as `required|min:3|email`. Rules run in declaration order and
//! the first failure is the only error recorded for that field.

pub mod messages;
pub mod rules;

pub use messages::{error_message, field_label};
pub use rules::{FormValues, Rule, parse_rules};

use indexmap::IndexMap;
use std::fmt;

/// Core validation trait that all validators implement.
///
/// # Examples
///
/// ```ignore
/// use engine::validation::Validator;
///
/// struct NotBlank;
/// impl Validator<str> for NotBlank {
///     type Error = String;
///
///     fn validate(&self, input: &str) -> Result<(), Self::Error> {
///         if input.trim().is_empty() {
///             Err("Input cannot be empty".to_string())
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

/// The failure recorded for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FieldError {}

/// A field name paired with the form it lives in.
pub struct FieldInput<'a> {
    pub field: &'a str,
    pub form: &'a dyn FormValues,
}

/// Ordered rules of a single field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn parse(spec: &str) -> Self {
        Self {
            rules: parse_rules(spec),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl<'a> Validator<FieldInput<'a>> for FieldRules {
    type Error = FieldError;

    fn validate(&self, input: &FieldInput<'a>) -> Result<(), FieldError> {
        let raw = input.form.value(input.field).unwrap_or_default();
        let value = raw.trim();

        match self.rules.iter().find(|rule| !rule.check(value, input.form)) {
            Some(rule) => {
                let label_text = input.form.label(input.field);
                let label = field_label(input.field, label_text.as_deref());
                Err(FieldError {
                    field: input.field.to_string(),
                    rule: rule.name().to_string(),
                    message: error_message(&label, rule),
                })
            }
            None => Ok(()),
        }
    }
}

/// Errors of one full-form pass, in rule-set field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: IndexMap<String, FieldError>,
}

impl ValidationErrors {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.values()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.values().map(|e| e.message.clone()).collect()
    }

    pub fn insert(&mut self, error: FieldError) {
        self.errors.insert(error.field.clone(), error);
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldError> {
        self.errors.shift_remove(field)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

/// Rule set of a whole form.
#[derive(Debug, Clone, Default)]
pub struct FormRules {
    fields: IndexMap<String, FieldRules>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the rules of `field` from a pipe-separated string.
    pub fn add_rule(&mut self, field: &str, spec: &str) {
        self.fields.insert(field.to_string(), FieldRules::parse(spec));
    }

    pub fn remove_rule(&mut self, field: &str) -> bool {
        self.fields.shift_remove(field).is_some()
    }

    pub fn rules_for(&self, field: &str) -> Option<&[Rule]> {
        self.fields.get(field).map(FieldRules::rules)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate one field. Fields without rules always pass.
    pub fn validate_field(&self, field: &str, form: &dyn FormValues) -> Result<(), FieldError> {
        match self.fields.get(field) {
            Some(rules) => rules.validate(&FieldInput { field, form }),
            None => Ok(()),
        }
    }

    /// Validate every field that has rules and exists in `form`, from scratch.
    pub fn validate_form(&self, form: &dyn FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for (field, rules) in &self.fields {
            if form.value(field).is_none() {
                continue;
            }
            if let Err(error) = rules.validate(&FieldInput { field, form }) {
                errors.insert(error);
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn form(values: &[(&str, &str)]) -> HashMap<String, String> {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let mut rules = FormRules::new();
        rules.add_rule("username", "required|min:3");

        let errors = rules.validate_form(&form(&[("username", "")]));
        assert_eq!(errors.message("username"), Some("Username is required."));

        let errors = rules.validate_form(&form(&[("username", "ab")]));
        assert_eq!(
            errors.message("username"),
            Some("Username must be at least 3 characters.")
        );

        let errors = rules.validate_form(&form(&[("username", "abc")]));
        assert!(errors.is_valid());
    }

    #[test]
    fn test_value_is_trimmed_before_rules() {
        let mut rules = FormRules::new();
        rules.add_rule("username", "required|min:3");
        let errors = rules.validate_form(&form(&[("username", "   ab   ")]));
        assert_eq!(errors.get("username").map(|e| e.rule.as_str()), Some("min"));
    }

    #[test]
    fn test_full_pass_discards_previous_errors() {
        let mut rules = FormRules::new();
        rules.add_rule("email", "required|email");
        rules.add_rule("age", "numeric");

        let first = rules.validate_form(&form(&[("email", "nope"), ("age", "x")]));
        assert_eq!(first.len(), 2);

        let second = rules.validate_form(&form(&[("email", "a@b.co"), ("age", "x")]));
        assert_eq!(second.len(), 1);
        assert!(second.get("email").is_none());
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let mut rules = FormRules::new();
        rules.add_rule("ghost", "required");
        assert!(rules.validate_form(&form(&[])).is_valid());
    }

    #[test]
    fn test_errors_follow_rule_order() {
        let mut rules = FormRules::new();
        rules.add_rule("zeta", "required");
        rules.add_rule("alpha", "required");
        let errors = rules.validate_form(&form(&[("alpha", ""), ("zeta", "")]));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_add_rule_replaces_and_remove_rule_drops() {
        let mut rules = FormRules::new();
        rules.add_rule("code", "required");
        rules.add_rule("code", "numeric");
        assert_eq!(rules.rules_for("code").map(<[Rule]>::len), Some(1));
        assert!(rules.validate_field("code", &form(&[("code", "")])).is_ok());

        assert!(rules.remove_rule("code"));
        assert!(!rules.remove_rule("code"));
        assert!(rules.is_empty());
    }
}
