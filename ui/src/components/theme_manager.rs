use crate::app::event_bus::EventBus;
use crate::components::common::{Component, Msg, ThemeActivityMsg};
use crate::dom::{Document, NodeId, Selector};
use engine::settings::{SettingsStore, Theme};

/// Light/dark theme switching, persisted through the settings store.
#[derive(Debug)]
pub struct ThemeManager {
    document: Document,
    bus: EventBus,
    settings: SettingsStore,
    current: Theme,
    toggle: Option<NodeId>,
}

impl ThemeManager {
    pub fn new(document: Document, bus: EventBus, settings: SettingsStore) -> Self {
        let current = settings.theme().unwrap_or_default();
        let toggle = document.query(&Selector::attr("data-theme-toggle"));
        let manager = Self {
            document,
            bus,
            settings,
            current,
            toggle,
        };
        manager.apply_theme(current);
        manager
    }

    pub fn current_theme(&self) -> Theme {
        self.current
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.current.toggled());
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.current = theme;
        self.apply_theme(theme);
        self.settings.set_theme(theme);
        log::info!("Theme set to {theme}");
        self.bus
            .publish(Msg::ThemeActivity(ThemeActivityMsg::Changed { theme }));
    }

    /// Follow the OS preference unless the user picked a theme.
    pub fn handle_system_preference(&mut self, prefers_dark: bool) {
        if self.settings.theme().is_some() {
            return;
        }
        let theme = if prefers_dark { Theme::Dark } else { Theme::Light };
        self.current = theme;
        self.apply_theme(theme);
    }

    fn apply_theme(&self, theme: Theme) {
        let root = self.document.root();
        self.document.set_attribute(root, "data-bs-theme", theme.as_str());
        self.document
            .set_class(root, "dark-theme", theme == Theme::Dark);
        self.update_toggle(theme);
    }

    fn update_toggle(&self, theme: Theme) {
        let Some(toggle) = self.toggle else {
            return;
        };
        let Some(icon) = self.document.query_in(toggle, &Selector::tag("i")) else {
            return;
        };
        let (icon_class, title) = match theme {
            Theme::Dark => ("fa fa-sun", "Switch to light mode"),
            Theme::Light => ("fa fa-moon", "Switch to dark mode"),
        };
        self.document.set_class_name(icon, icon_class);
        self.document.set_attribute(toggle, "title", title);
    }
}

impl Component for ThemeManager {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use claims::*;

    fn page() -> Document {
        Document::from_body(
            Element::new("body").with_child(
                Element::new("button")
                    .with_attr("data-theme-toggle", "")
                    .with_child(Element::new("i")),
            ),
        )
    }

    #[test]
    fn test_defaults_to_light() {
        let doc = page();
        let manager = ThemeManager::new(doc.clone(), EventBus::new(), SettingsStore::in_memory());
        assert_eq!(manager.current_theme(), Theme::Light);
        assert_eq!(doc.attribute(doc.root(), "data-bs-theme").as_deref(), Some("light"));
        let icon = assert_some!(doc.query(&Selector::tag("i")));
        assert!(doc.has_class(icon, "fa-moon"));
    }

    #[test]
    fn test_toggle_persists_and_publishes() {
        let doc = page();
        let bus = EventBus::new();
        let rx = bus.subscribe();
        let settings = SettingsStore::in_memory();
        let mut manager = ThemeManager::new(doc.clone(), bus, settings.clone());

        manager.toggle_theme();
        assert_eq!(settings.theme(), Some(Theme::Dark));
        assert!(doc.has_class(doc.root(), "dark-theme"));
        let toggle = assert_some!(doc.query(&Selector::attr("data-theme-toggle")));
        assert_eq!(doc.attribute(toggle, "title").as_deref(), Some("Switch to light mode"));
        assert_eq!(
            assert_ok!(rx.try_recv()),
            Msg::ThemeActivity(ThemeActivityMsg::Changed { theme: Theme::Dark })
        );

        let reopened = ThemeManager::new(doc.clone(), EventBus::new(), settings);
        assert_eq!(reopened.current_theme(), Theme::Dark);
    }

    #[test]
    fn test_system_preference_only_without_saved_choice() {
        let doc = page();
        let settings = SettingsStore::in_memory();
        let mut manager = ThemeManager::new(doc.clone(), EventBus::new(), settings.clone());

        manager.handle_system_preference(true);
        assert_eq!(manager.current_theme(), Theme::Dark);
        assert_none!(settings.theme());

        manager.set_theme(Theme::Light);
        manager.handle_system_preference(true);
        assert_eq!(manager.current_theme(), Theme::Light);
        assert!(!doc.has_class(doc.root(), "dark-theme"));
    }
}
