use crate::components::common::{Capabilities, Component};
use crate::dom::{Document, Element, NodeId, Selector};
use engine::validation::{FormRules, FormValues, ValidationErrors};

pub const ERROR_SUMMARY_TITLE: &str = "Please correct the following errors:";

/// Field values and labels read live from a form element.
pub struct DocumentForm<'a> {
    document: &'a Document,
    form: NodeId,
}

impl<'a> DocumentForm<'a> {
    pub fn new(document: &'a Document, form: NodeId) -> Self {
        Self { document, form }
    }

    fn field(&self, name: &str) -> Option<NodeId> {
        self.document
            .query_in(self.form, &Selector::attr_eq("name", name))
    }
}

impl FormValues for DocumentForm<'_> {
    fn value(&self, field: &str) -> Option<String> {
        self.field(field).map(|node| self.document.value(node))
    }

    fn label(&self, field: &str) -> Option<String> {
        let id = self.document.id_of(self.field(field)?)?;
        let label = self.document.query_in(
            self.form,
            &Selector::tag("label").and(Selector::attr_eq("for", &id)),
        )?;
        Some(self.document.text(label))
    }
}

/// Validation of one `form[data-validate]`.
#[derive(Debug)]
pub struct FormValidatorComponent {
    document: Document,
    form: NodeId,
    rules: FormRules,
    errors: ValidationErrors,
}

impl FormValidatorComponent {
    /// Collects rules from every named descendant carrying `data-validate`.
    pub fn new(document: Document, form: NodeId) -> Self {
        let mut rules = FormRules::new();
        for field in document.query_all_in(form, &Selector::attr("data-validate")) {
            let (Some(name), Some(spec)) = (
                document.attribute(field, "name"),
                document.data(field, "validate"),
            ) else {
                continue;
            };
            rules.add_rule(&name, &spec);
        }
        log::debug!("Form validator bound with {} field(s)", rules.fields().count());
        Self {
            document,
            form,
            rules,
            errors: ValidationErrors::default(),
        }
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn rules(&self) -> &FormRules {
        &self.rules
    }

    pub fn add_rule(&mut self, field: &str, spec: &str) {
        self.rules.add_rule(field, spec);
    }

    pub fn remove_rule(&mut self, field: &str) -> bool {
        self.clear_error(field);
        self.rules.remove_rule(field)
    }

    fn field_node(&self, field: &str) -> Option<NodeId> {
        self.document
            .query_in(self.form, &Selector::attr_eq("name", field))
    }

    /// Validates one field and updates its error mark.
    pub fn validate_field(&mut self, field: &str) -> bool {
        let result = self
            .rules
            .validate_field(field, &DocumentForm::new(&self.document, self.form));
        match result {
            Ok(()) => {
                self.clear_error(field);
                true
            }
            Err(error) => {
                self.show_field_error(field, &error.message);
                self.errors.insert(error);
                false
            }
        }
    }

    pub fn on_blur(&mut self, field: &str) -> bool {
        self.validate_field(field)
    }

    /// Typing into a field stores the value and drops its error mark.
    pub fn on_input(&mut self, field: &str, value: &str) {
        if let Some(node) = self.field_node(field) {
            self.document.set_value(node, value);
        }
        self.clear_error(field);
    }

    /// Full pass from scratch; marks every failing field.
    pub fn validate_form(&mut self) -> bool {
        self.clear_all_errors();
        self.errors = self
            .rules
            .validate_form(&DocumentForm::new(&self.document, self.form));
        let failures: Vec<(String, String)> = self
            .errors
            .iter()
            .map(|error| (error.field.clone(), error.message.clone()))
            .collect();
        for (field, message) in failures {
            self.show_field_error(&field, &message);
        }
        self.errors.is_valid()
    }

    /// Returns whether the submission has to be stopped.
    pub fn submit(&mut self) -> bool {
        if self.validate_form() {
            self.remove_summary();
            return false;
        }
        log::debug!("Form submission blocked by {} error(s)", self.errors.len());
        self.display_summary();
        true
    }

    pub fn reset_validation(&mut self) {
        self.clear_all_errors();
        self.remove_summary();
        self.errors.clear();
    }

    fn show_field_error(&self, field: &str, message: &str) {
        let Some(node) = self.field_node(field) else {
            return;
        };
        self.clear_field_mark(node);
        self.document.add_class(node, "is-invalid");
        if let Some(parent) = self.document.parent(node) {
            self.document.append_child(
                parent,
                Element::new("div")
                    .with_class("invalid-feedback")
                    .with_text(message),
            );
        }
    }

    fn clear_error(&mut self, field: &str) {
        self.errors.remove(field);
        if let Some(node) = self.field_node(field) {
            self.clear_field_mark(node);
        }
    }

    fn clear_field_mark(&self, node: NodeId) {
        self.document.remove_class(node, "is-invalid");
        let feedback = self
            .document
            .parent(node)
            .and_then(|parent| {
                self.document
                    .query_in(parent, &Selector::class("invalid-feedback"))
            });
        if let Some(feedback) = feedback {
            self.document.remove(feedback);
        }
    }

    fn clear_all_errors(&self) {
        for node in self
            .document
            .query_all_in(self.form, &Selector::class("is-invalid"))
        {
            self.clear_field_mark(node);
        }
    }

    fn display_summary(&self) {
        self.remove_summary();
        let items = self
            .errors
            .messages()
            .into_iter()
            .map(|message| Element::new("li").with_text(&message));
        let summary = Element::new("div")
            .with_class("alert alert-danger")
            .with_child(Element::new("strong").with_text(ERROR_SUMMARY_TITLE))
            .with_child(Element::new("ul").with_class("mb-0 mt-2").with_children(items));
        self.document.prepend_child(self.form, summary);
    }

    fn remove_summary(&self) {
        if let Some(existing) = self
            .document
            .query_in(self.form, &Selector::class("alert-danger"))
        {
            self.document.remove(existing);
        }
    }
}

impl Component for FormValidatorComponent {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESTROY
    }

    fn destroy(&mut self) {
        self.reset_validation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    fn group(id: &str, label: &str, rules: &str) -> Element {
        Element::new("div")
            .with_class("mb-3")
            .with_child(Element::new("label").with_attr("for", id).with_text(label))
            .with_child(
                Element::new("input")
                    .with_id(id)
                    .with_attr("name", id)
                    .with_attr("data-validate", rules),
            )
    }

    fn signup() -> (Document, FormValidatorComponent) {
        let doc = Document::from_body(
            Element::new("body").with_child(
                Element::new("form")
                    .with_attr("data-validate", "")
                    .with_child(group("email", "Email *", "required|email"))
                    .with_child(group("password", "Password", "required|min:8"))
                    .with_child(group("password_confirmation", "Repeat", "confirmed:password")),
            ),
        );
        let form = assert_some!(doc.query(&Selector::tag("form")));
        let validator = FormValidatorComponent::new(doc.clone(), form);
        (doc, validator)
    }

    fn input(doc: &Document, name: &str) -> NodeId {
        assert_some!(doc.query(&Selector::attr_eq("name", name)))
    }

    #[test]
    fn test_collects_rules_from_markup() {
        let (_, validator) = signup();
        let fields: Vec<&str> = validator.rules().fields().collect();
        assert_eq!(fields, vec!["email", "password", "password_confirmation"]);
    }

    #[test]
    fn test_blur_marks_field_with_label_message() {
        let (doc, mut validator) = signup();
        validator.on_input("email", "not-an-email");
        assert!(!validator.on_blur("email"));

        let email = input(&doc, "email");
        assert!(doc.has_class(email, "is-invalid"));
        let feedback = assert_some!(doc.query(&Selector::class("invalid-feedback")));
        assert_eq!(doc.text(feedback), "Email must be a valid email address.");

        validator.on_input("email", "a@b.co");
        assert!(!doc.has_class(email, "is-invalid"));
        assert_none!(doc.query(&Selector::class("invalid-feedback")));
        assert!(validator.on_blur("email"));
    }

    #[test]
    fn test_submit_blocks_and_summarises() {
        let (doc, mut validator) = signup();
        validator.on_input("email", "");
        validator.on_input("password", "short");
        validator.on_input("password_confirmation", "other");

        assert!(validator.submit());
        assert_eq!(validator.errors().len(), 3);
        let form = validator.form();
        let summary = assert_some!(doc.children(form).first().copied());
        assert!(doc.has_class(summary, "alert-danger"));
        let items = doc.query_all_in(summary, &Selector::tag("li"));
        assert_eq!(doc.text(items[0]), "Email is required.");
        assert_eq!(doc.text(items[1]), "Password must be at least 8 characters.");
        assert_eq!(doc.text(items[2]), "Repeat confirmation does not match.");

        assert!(validator.submit());
        assert_eq!(doc.query_all(&Selector::class("alert-danger")).len(), 1);
        assert_eq!(doc.query_all(&Selector::class("invalid-feedback")).len(), 3);
    }

    #[test]
    fn test_valid_submit_clears_everything() {
        let (doc, mut validator) = signup();
        assert!(validator.submit());

        validator.on_input("email", "user@example.com");
        validator.on_input("password", "correct horse");
        validator.on_input("password_confirmation", "correct horse");
        assert!(!validator.submit());
        assert!(validator.errors().is_valid());
        assert_none!(doc.query(&Selector::class("alert-danger")));
        assert_none!(doc.query(&Selector::class("is-invalid")));
    }

    #[test]
    fn test_programmatic_rules_and_reset() {
        let (doc, mut validator) = signup();
        assert!(validator.remove_rule("password_confirmation"));
        assert!(!validator.remove_rule("missing"));
        validator.add_rule("password", "required");
        validator.on_input("email", "user@example.com");
        validator.on_input("password", "x");
        assert!(!validator.submit());

        validator.on_input("email", "");
        assert!(validator.submit());
        validator.destroy();
        assert!(validator.errors().is_empty());
        assert_none!(doc.query(&Selector::class("alert-danger")));
        assert_none!(doc.query(&Selector::class("is-invalid")));
    }
}
