use crate::app::event_bus::EventBus;
use crate::components::common::{Capabilities, Component, Msg, SearchActivityMsg};
use crate::dom::{Document, Element, NodeId, Selector};

/// Pages offered as suggestions while typing.
pub const SUGGESTION_CATALOGUE: [&str; 11] = [
    "Dashboard",
    "Charts - Chart.js",
    "Charts - Flot",
    "Forms - Basic",
    "Forms - Advanced",
    "Tables - Basic",
    "Tables - Data",
    "UI Elements - Buttons",
    "UI Elements - Cards",
    "UI Elements - Alerts",
    "Widgets",
];

pub const MAX_SUGGESTIONS: usize = 5;
pub const MIN_SUGGESTION_QUERY: usize = 2;

/// Case-insensitive substring matches from the catalogue, at most five.
pub fn generate_suggestions(query: &str) -> Vec<&'static str> {
    let needle = query.to_lowercase();
    SUGGESTION_CATALOGUE
        .iter()
        .copied()
        .filter(|item| item.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Header search box.
#[derive(Debug)]
pub struct Search {
    document: Document,
    bus: EventBus,
    trigger: Option<NodeId>,
    form: Option<NodeId>,
    input: Option<NodeId>,
    is_open: bool,
}

impl Search {
    pub fn new(document: Document, bus: EventBus) -> Self {
        let mut search = Self {
            document,
            bus,
            trigger: None,
            form: None,
            input: None,
            is_open: false,
        };
        search.bind();
        search
    }

    pub fn bind(&mut self) -> bool {
        self.trigger = self.document.get_element_by_id("searchToggle");
        self.form = self.document.query(&Selector::class("search-form"));
        self.input = self.form.and_then(|form| {
            ["search", "text"].iter().find_map(|kind| {
                self.document.query_in(
                    form,
                    &Selector::tag("input").and(Selector::attr_eq("type", kind)),
                )
            })
        });
        self.is_bound()
    }

    pub fn is_bound(&self) -> bool {
        self.trigger.is_some() && self.form.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn query(&self) -> String {
        self.input
            .map(|input| self.document.value(input))
            .unwrap_or_default()
    }

    pub fn open(&mut self) {
        let (Some(trigger), Some(form)) = (self.trigger, self.form) else {
            return;
        };
        self.document.remove_class(form, "d-none");
        self.document.add_class(trigger, "d-none");
        self.is_open = true;
        self.bus.publish(Msg::SearchActivity(SearchActivityMsg::Opened));
    }

    pub fn close(&mut self) {
        let (Some(trigger), Some(form)) = (self.trigger, self.form) else {
            return;
        };
        self.document.add_class(form, "d-none");
        self.document.remove_class(trigger, "d-none");
        self.is_open = false;
        if let Some(input) = self.input {
            self.document.set_value(input, "");
        }
        self.hide_suggestions();
        self.bus.publish(Msg::SearchActivity(SearchActivityMsg::Closed));
    }

    /// Keyboard shortcut entry point.
    pub fn focus(&mut self) {
        if !self.is_open {
            self.open();
        }
    }

    /// Form submission. Returns the query when one was published.
    pub fn perform(&mut self) -> Option<String> {
        let query = self.query().trim().to_string();
        if query.is_empty() {
            return None;
        }
        self.bus.publish(Msg::SearchActivity(SearchActivityMsg::Performed {
            query: query.clone(),
        }));
        Some(query)
    }

    /// Typing into the box; returns the suggestions now shown.
    pub fn handle_input(&mut self, value: &str) -> Vec<&'static str> {
        if let Some(input) = self.input {
            self.document.set_value(input, value);
        }
        if value.chars().count() < MIN_SUGGESTION_QUERY {
            self.hide_suggestions();
            return Vec::new();
        }
        let suggestions = generate_suggestions(value);
        self.render_suggestions(&suggestions);
        suggestions
    }

    /// Picking a suggestion fills the box and searches.
    pub fn choose_suggestion(&mut self, suggestion: &str) -> Option<String> {
        if let Some(input) = self.input {
            self.document.set_value(input, suggestion);
        }
        self.hide_suggestions();
        self.perform()
    }

    fn render_suggestions(&self, suggestions: &[&str]) {
        self.hide_suggestions();
        let Some(form) = self.form else {
            return;
        };
        if suggestions.is_empty() {
            return;
        }

        let items = suggestions.iter().map(|suggestion| {
            Element::new("li").with_child(
                Element::new("a")
                    .with_class("d-block px-3 py-2 text-decoration-none")
                    .with_attr("href", "#")
                    .with_attr("data-suggestion", suggestion)
                    .with_text(suggestion),
            )
        });
        let container = Element::new("div")
            .with_class("search-suggestions")
            .with_child(Element::new("ul").with_class("list-unstyled mb-0").with_children(items));

        self.document.set_style(form, "position", "relative");
        self.document.append_child(form, container);
    }

    fn hide_suggestions(&self) {
        for container in self.document.query_all(&Selector::class("search-suggestions")) {
            self.document.remove(container);
        }
    }

    pub fn handle_document_click(&mut self, target: NodeId) {
        if !self.is_open {
            return;
        }
        let inside = |node: Option<NodeId>| node.is_some_and(|n| self.document.contains(n, target));
        if !inside(self.form) && !inside(self.trigger) {
            self.close();
        }
    }
}

impl Component for Search {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESTROY | Capabilities::EVENTS
    }

    fn destroy(&mut self) {
        if self.is_open {
            self.close();
        }
        self.hide_suggestions();
    }

    fn handle_event(&mut self, msg: &Msg) {
        if msg.loaded_partial() == Some("header") {
            log::debug!("Header partial loaded, rebinding search");
            self.bind();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    fn header() -> Element {
        Element::new("header")
            .with_child(Element::new("button").with_id("searchToggle"))
            .with_child(
                Element::new("form")
                    .with_class("search-form d-none")
                    .with_child(Element::new("input").with_attr("type", "search")),
            )
    }

    fn search(document: &Document) -> (Search, std::sync::mpsc::Receiver<Msg>) {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        (Search::new(document.clone(), bus), rx)
    }

    #[test]
    fn test_suggestions_filter_and_cap() {
        assert_eq!(generate_suggestions("chart"), vec!["Charts - Chart.js", "Charts - Flot"]);
        assert_eq!(generate_suggestions("e").len(), MAX_SUGGESTIONS);
        assert!(generate_suggestions("zzz").is_empty());
    }

    #[test]
    fn test_open_close_toggles_visibility() {
        let doc = Document::from_body(Element::new("body").with_child(header()));
        let (mut search, rx) = search(&doc);
        let form = assert_some!(doc.query(&Selector::class("search-form")));
        let trigger = assert_some!(doc.get_element_by_id("searchToggle"));

        search.open();
        assert!(!doc.has_class(form, "d-none"));
        assert!(doc.has_class(trigger, "d-none"));

        search.handle_input("Tab");
        search.close();
        assert!(doc.has_class(form, "d-none"));
        assert_eq!(search.query(), "");
        assert_none!(doc.query(&Selector::class("search-suggestions")));

        let events: Vec<Msg> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                Msg::SearchActivity(SearchActivityMsg::Opened),
                Msg::SearchActivity(SearchActivityMsg::Closed)
            ]
        );
    }

    #[test]
    fn test_perform_trims_and_ignores_blank() {
        let doc = Document::from_body(Element::new("body").with_child(header()));
        let (mut search, rx) = search(&doc);

        search.handle_input("   ");
        assert_none!(search.perform());
        search.handle_input("  tables ");
        assert_eq!(search.perform().as_deref(), Some("tables"));
        assert_eq!(
            assert_ok!(rx.try_recv()),
            Msg::SearchActivity(SearchActivityMsg::Performed {
                query: "tables".to_string()
            })
        );
    }

    #[test]
    fn test_suggestions_render_only_from_two_chars() {
        let doc = Document::from_body(Element::new("body").with_child(header()));
        let (mut search, _rx) = search(&doc);

        assert!(search.handle_input("f").is_empty());
        assert_none!(doc.query(&Selector::class("search-suggestions")));

        assert_eq!(search.handle_input("fo").len(), 2);
        let links = doc.query_all(&Selector::attr("data-suggestion"));
        assert_eq!(links.len(), 2);
        assert_eq!(doc.text(links[0]), "Forms - Basic");

        assert_eq!(search.choose_suggestion("Forms - Advanced").as_deref(), Some("Forms - Advanced"));
        assert_none!(doc.query(&Selector::class("search-suggestions")));
    }

    #[test]
    fn test_late_bind_on_header_partial() {
        let doc = Document::new();
        let (mut search, _rx) = search(&doc);
        search.open();
        assert!(!search.is_open());

        assert_some!(doc.append_child(doc.body(), header()));
        search.handle_event(&Msg::PartialActivity(
            crate::components::common::PartialActivityMsg::Loaded {
                name: "header".to_string(),
                partial_id: 1,
            },
        ));
        search.focus();
        assert!(search.is_open());
    }
}
