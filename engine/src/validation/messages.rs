use super::rules::Rule;

/// Human label of a field.
///
/// Prefers the bound `<label>` text (required-markers stripped); otherwise
/// turns the field name into words: `first_name` becomes `First name`.
pub fn field_label(field: &str, label_text: Option<&str>) -> String {
    if let Some(text) = label_text {
        let cleaned = text.replace('*', "");
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            return cleaned.to_string();
        }
    }

    let mut chars = field.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars
                .map(|c| if c == '_' || c == '-' { ' ' } else { c })
                .collect();
            format!("{}{rest}", first.to_uppercase())
        }
        None => String::new(),
    }
}

/// Message recorded when `rule` fails for the field labelled `label`.
pub fn error_message(label: &str, rule: &Rule) -> String {
    let argument = rule.argument().unwrap_or_default();
    match rule.name() {
        "required" => format!("{label} is required."),
        "min" => format!("{label} must be at least {argument} characters."),
        "max" => format!("{label} must not exceed {argument} characters."),
        "email" => format!("{label} must be a valid email address."),
        "numeric" => format!("{label} must be numeric."),
        "alpha" => format!("{label} must contain only letters."),
        "alphanumeric" => format!("{label} must contain only letters and numbers."),
        "url" => format!("{label} must be a valid URL."),
        "confirmed" => format!("{label} confirmation does not match."),
        "regex" => format!("{label} format is invalid."),
        _ => format!("{label} is invalid."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_markup() {
        assert_eq!(field_label("email", Some("Email address *")), "Email address");
    }

    #[test]
    fn test_label_from_field_name() {
        assert_eq!(field_label("first_name", None), "First name");
        assert_eq!(field_label("zip-code", Some("  * ")), "Zip code");
    }

    #[test]
    fn test_messages_include_argument() {
        assert_eq!(
            error_message("Username", &Rule::Min(3)),
            "Username must be at least 3 characters."
        );
        assert_eq!(
            error_message("Bio", &Rule::Max(140)),
            "Bio must not exceed 140 characters."
        );
        assert_eq!(
            error_message("Code", &Rule::parse("min:abc")),
            "Code must be at least abc characters."
        );
    }
}
