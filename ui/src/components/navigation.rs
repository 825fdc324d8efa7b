use crate::app::event_bus::EventBus;
use crate::components::common::{Capabilities, Component, Msg, SidebarActivityMsg, Viewport};
use crate::dom::{Document, NodeId, Selector};

/// Widths above this close the navigation overlay.
pub const NAVIGATION_BREAKPOINT_PX: f64 = 768.0;

const TOGGLE_IDS: [&str; 3] = ["sidebarToggleDesktop", "sidebarToggle", "sidebarToggleMobile"];
const COLLAPSE_TARGET_ATTR: &str = "data-custom-collapse-target";

/// Sidebar navigation: mobile open/close, accordion submenus and the
/// active-page link.
///
/// Binds lazily: when the sidebar markup arrives later as a partial, the
/// `sidebar` partial-loaded event triggers a rebind.
#[derive(Debug)]
pub struct Navigation {
    document: Document,
    bus: EventBus,
    current_page: Option<String>,
    breakpoint: f64,
    viewport: Viewport,
    menu_toggle: Option<NodeId>,
    sidebar: Option<NodeId>,
    is_open: bool,
}

impl Navigation {
    pub fn new(document: Document, bus: EventBus, breakpoint: f64, viewport: Viewport) -> Self {
        let current_page = document.data(document.body(), "page");
        let mut navigation = Self {
            document,
            bus,
            current_page,
            breakpoint,
            viewport,
            menu_toggle: None,
            sidebar: None,
            is_open: false,
        };
        navigation.bind();
        navigation
    }

    /// Resolve the toggle and sidebar; returns whether both were found.
    pub fn bind(&mut self) -> bool {
        self.menu_toggle = TOGGLE_IDS
            .iter()
            .find_map(|id| self.document.get_element_by_id(id));
        self.sidebar = self
            .document
            .get_element_by_id("sidebar")
            .or_else(|| self.document.query(&Selector::class("sidebar")));

        let Some(sidebar) = self.sidebar.filter(|_| self.menu_toggle.is_some()) else {
            return false;
        };

        self.convert_collapse_attributes(sidebar);
        self.initialize_submenus(sidebar);
        self.mark_active_link();
        true
    }

    pub fn is_bound(&self) -> bool {
        self.menu_toggle.is_some() && self.sidebar.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Bootstrap's own collapse handling is replaced by ours.
    fn convert_collapse_attributes(&self, sidebar: NodeId) {
        let toggles = self
            .document
            .query_all_in(sidebar, &Selector::attr_eq("data-bs-toggle", "collapse"));
        for toggle in toggles {
            if let Some(target) = self.document.attribute(toggle, "data-bs-target") {
                self.document.set_attribute(toggle, COLLAPSE_TARGET_ATTR, &target);
                self.document.remove_attribute(toggle, "data-bs-toggle");
                self.document.remove_attribute(toggle, "data-bs-target");
            }
        }
    }

    fn initialize_submenus(&self, sidebar: NodeId) {
        for collapse in self.document.query_all_in(sidebar, &Selector::class("collapse")) {
            let expanded = self.document.has_class(collapse, "show");
            if !expanded {
                self.document.set_style(collapse, "display", "none");
            }
            if let Some(toggle) = self.toggle_for(collapse) {
                self.document
                    .set_attribute(toggle, "aria-expanded", if expanded { "true" } else { "false" });
            }
        }
    }

    fn toggle_for(&self, collapse: NodeId) -> Option<NodeId> {
        let id = self.document.id_of(collapse)?;
        self.document
            .query(&Selector::attr_eq(COLLAPSE_TARGET_ATTR, &format!("#{id}")))
    }

    fn set_toggle_icon(&self, class: &str) {
        let Some(toggle) = self.menu_toggle else {
            return;
        };
        if let Some(icon) = self.document.query_in(toggle, &Selector::tag("i")) {
            self.document.set_class_name(icon, class);
        }
    }

    pub fn toggle_sidebar(&mut self) {
        if self.is_open {
            self.close_sidebar();
        } else {
            self.open_sidebar();
        }
    }

    pub fn open_sidebar(&mut self) {
        if !self.is_bound() {
            return;
        }
        self.document.add_class(self.document.body(), "open");
        self.is_open = true;
        self.set_toggle_icon("fa fa-times");
        self.bus.publish(Msg::SidebarActivity(SidebarActivityMsg::Opened));
    }

    pub fn close_sidebar(&mut self) {
        if !self.is_bound() {
            return;
        }
        self.document.remove_class(self.document.body(), "open");
        self.is_open = false;
        self.set_toggle_icon("fa fa-bars");
        self.bus.publish(Msg::SidebarActivity(SidebarActivityMsg::Closed));
    }

    /// Click on a submenu toggle whose target is `selector` (`#id`).
    pub fn toggle_collapse(&mut self, selector: &str) {
        let Some(id) = selector.strip_prefix('#') else {
            return;
        };
        let Some(collapse) = self.document.get_element_by_id(id) else {
            return;
        };

        if let Some(nav) = self.document.closest(collapse, &Selector::class("sidebar-nav")) {
            let open = Selector::class("collapse").and(Selector::class("show"));
            for other in self.document.query_all_in(nav, &open) {
                if other != collapse {
                    self.close_collapse(other);
                }
            }
        }

        if self.document.has_class(collapse, "show") {
            self.close_collapse(collapse);
        } else {
            self.open_collapse(collapse);
        }
    }

    fn open_collapse(&self, collapse: NodeId) {
        self.document.set_style(collapse, "display", "block");
        self.document.add_class(collapse, "show");
        if let Some(toggle) = self.toggle_for(collapse) {
            self.document.set_attribute(toggle, "aria-expanded", "true");
            self.document.remove_class(toggle, "collapsed");
        }
        let target = format!("#{}", self.document.id_of(collapse).unwrap_or_default());
        self.bus
            .publish(Msg::SidebarActivity(SidebarActivityMsg::SubmenuOpened { target }));
    }

    fn close_collapse(&self, collapse: NodeId) {
        self.document.remove_class(collapse, "show");
        self.document.set_style(collapse, "display", "none");
        if let Some(toggle) = self.toggle_for(collapse) {
            self.document.set_attribute(toggle, "aria-expanded", "false");
            self.document.add_class(toggle, "collapsed");
        }
        let target = format!("#{}", self.document.id_of(collapse).unwrap_or_default());
        self.bus
            .publish(Msg::SidebarActivity(SidebarActivityMsg::SubmenuClosed { target }));
    }

    /// Highlight the link whose `data-page` is the current page and expand
    /// its submenu. Returns the highlighted link.
    pub fn mark_active_link(&self) -> Option<NodeId> {
        let page = self.current_page.as_deref()?;
        let sidebar = self.sidebar?;
        let links = Selector::class("nav-link").and(Selector::attr("data-page"));
        for link in self.document.query_all_in(sidebar, &links) {
            self.document.remove_class(link, "active");
        }

        let active = self.document.query_in(
            sidebar,
            &Selector::class("nav-link").and(Selector::attr_eq("data-page", page)),
        )?;
        self.document.add_class(active, "active");

        if let Some(collapse) = self.document.closest(active, &Selector::class("collapse")) {
            self.document.add_class(collapse, "show");
            self.document.set_style(collapse, "display", "block");
            if let Some(toggle) = self.toggle_for(collapse) {
                self.document.set_attribute(toggle, "aria-expanded", "true");
                self.document.remove_class(toggle, "collapsed");
            }
        }
        Some(active)
    }

    /// Outside clicks close the overlay on narrow screens.
    pub fn handle_document_click(&mut self, target: NodeId) {
        if !self.is_open || self.viewport.width > self.breakpoint {
            return;
        }
        let inside = |node: Option<NodeId>| node.is_some_and(|n| self.document.contains(n, target));
        if !inside(self.sidebar) && !inside(self.menu_toggle) {
            self.close_sidebar();
        }
    }
}

impl Component for Navigation {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESTROY | Capabilities::RESIZE | Capabilities::EVENTS
    }

    fn destroy(&mut self) {
        let body = self.document.body();
        self.document.remove_class(body, "open");
        self.document.remove_class(body, "sidebar-overlay");
        self.is_open = false;
    }

    fn handle_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let Some(sidebar) = self.sidebar else {
            return;
        };
        let body = self.document.body();
        if viewport.width <= self.breakpoint {
            self.document.add_class(sidebar, "mobile");
            if self.is_open {
                self.document.add_class(body, "sidebar-overlay");
            }
        } else {
            self.document.remove_class(sidebar, "mobile");
            self.document.remove_class(body, "sidebar-overlay");
            if self.is_open {
                self.close_sidebar();
            }
        }
    }

    fn handle_event(&mut self, msg: &Msg) {
        if msg.loaded_partial() == Some("sidebar") {
            log::debug!("Sidebar partial loaded, rebinding navigation");
            self.bind();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use claims::*;

    fn sidebar_markup() -> Element {
        Element::new("aside").with_id("sidebar").with_class("sidebar").with_child(
            Element::new("ul")
                .with_class("sidebar-nav")
                .with_child(
                    Element::new("a")
                        .with_class("nav-link")
                        .with_attr("data-page", "dashboard"),
                )
                .with_child(
                    Element::new("a")
                        .with_id("formsToggle")
                        .with_attr("data-bs-toggle", "collapse")
                        .with_attr("data-bs-target", "#formsMenu"),
                )
                .with_child(
                    Element::new("div").with_id("formsMenu").with_class("collapse").with_child(
                        Element::new("a")
                            .with_class("nav-link active")
                            .with_attr("data-page", "forms"),
                    ),
                )
                .with_child(
                    Element::new("a")
                        .with_attr("data-bs-toggle", "collapse")
                        .with_attr("data-bs-target", "#chartsMenu"),
                )
                .with_child(Element::new("div").with_id("chartsMenu").with_class("collapse")),
        )
    }

    fn page(page: &str, with_sidebar: bool) -> Document {
        let mut body = Element::new("body").with_attr("data-page", page).with_child(
            Element::new("button")
                .with_id("sidebarToggle")
                .with_child(Element::new("i").with_class("fa fa-bars")),
        );
        if with_sidebar {
            body = body.with_child(sidebar_markup());
        }
        Document::from_body(body)
    }

    fn navigation(document: &Document) -> (Navigation, std::sync::mpsc::Receiver<Msg>) {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        let nav = Navigation::new(document.clone(), bus, NAVIGATION_BREAKPOINT_PX, Viewport::new(600.0));
        (nav, rx)
    }

    #[test]
    fn test_unbound_without_sidebar_is_noop() {
        let doc = page("forms", false);
        let (mut nav, rx) = navigation(&doc);
        assert!(!nav.is_bound());
        nav.open_sidebar();
        assert!(!nav.is_open());
        assert!(!doc.has_class(doc.body(), "open"));
        assert_err!(rx.try_recv());
    }

    #[test]
    fn test_open_close_updates_body_and_icon() {
        let doc = page("dashboard", true);
        let (mut nav, rx) = navigation(&doc);

        nav.toggle_sidebar();
        assert!(doc.has_class(doc.body(), "open"));
        let icon = assert_some!(doc.query(&Selector::tag("i")));
        assert!(doc.has_class(icon, "fa-times"));
        assert!(!doc.has_class(icon, "fa-bars"));
        assert_eq!(assert_ok!(rx.try_recv()), Msg::SidebarActivity(SidebarActivityMsg::Opened));

        nav.toggle_sidebar();
        assert!(!doc.has_class(doc.body(), "open"));
        assert!(doc.has_class(icon, "fa-bars"));
        assert_eq!(assert_ok!(rx.try_recv()), Msg::SidebarActivity(SidebarActivityMsg::Closed));
    }

    #[test]
    fn test_active_link_expands_its_submenu() {
        let doc = page("forms", true);
        let (nav, _rx) = navigation(&doc);

        let active = assert_some!(nav.mark_active_link());
        assert_eq!(doc.attribute(active, "data-page").as_deref(), Some("forms"));
        let menu = assert_some!(doc.get_element_by_id("formsMenu"));
        assert!(doc.has_class(menu, "show"));

        let dashboard_link = assert_some!(doc.query(&Selector::attr_eq("data-page", "dashboard")));
        assert!(!doc.has_class(dashboard_link, "active"));

        let toggle = assert_some!(doc.get_element_by_id("formsToggle"));
        assert_eq!(doc.attribute(toggle, "aria-expanded").as_deref(), Some("true"));
        assert_none!(doc.attribute(toggle, "data-bs-toggle"));
    }

    #[test]
    fn test_accordion_closes_siblings() {
        let doc = page("dashboard", true);
        let (mut nav, rx) = navigation(&doc);
        let forms = assert_some!(doc.get_element_by_id("formsMenu"));
        let charts = assert_some!(doc.get_element_by_id("chartsMenu"));

        nav.toggle_collapse("#formsMenu");
        assert!(doc.has_class(forms, "show"));
        nav.toggle_collapse("#chartsMenu");
        assert!(doc.has_class(charts, "show"));
        assert!(!doc.has_class(forms, "show"));
        assert_eq!(doc.style(forms, "display").as_deref(), Some("none"));

        let events: Vec<Msg> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                Msg::SidebarActivity(SidebarActivityMsg::SubmenuOpened { target: "#formsMenu".to_string() }),
                Msg::SidebarActivity(SidebarActivityMsg::SubmenuClosed { target: "#formsMenu".to_string() }),
                Msg::SidebarActivity(SidebarActivityMsg::SubmenuOpened { target: "#chartsMenu".to_string() }),
            ]
        );
    }

    #[test]
    fn test_late_bind_on_sidebar_partial() {
        let doc = page("forms", false);
        let (mut nav, _rx) = navigation(&doc);
        assert!(!nav.is_bound());

        assert_some!(doc.append_child(doc.body(), sidebar_markup()));
        nav.handle_event(&Msg::PartialActivity(
            crate::components::common::PartialActivityMsg::Loaded {
                name: "sidebar".to_string(),
                partial_id: 0,
            },
        ));
        assert!(nav.is_bound());
        let menu = assert_some!(doc.get_element_by_id("formsMenu"));
        assert!(doc.has_class(menu, "show"));
    }

    #[test]
    fn test_outside_click_and_wide_resize_close() {
        let doc = page("dashboard", true);
        let (mut nav, _rx) = navigation(&doc);
        let outside = assert_some!(doc.append_child(doc.body(), Element::new("main")));
        let link = assert_some!(doc.query(&Selector::class("nav-link")));

        nav.open_sidebar();
        nav.handle_document_click(link);
        assert!(nav.is_open());
        nav.handle_document_click(outside);
        assert!(!nav.is_open());

        nav.open_sidebar();
        nav.handle_resize(Viewport::new(1024.0));
        assert!(!nav.is_open());
        let sidebar = assert_some!(doc.get_element_by_id("sidebar"));
        assert!(!doc.has_class(sidebar, "mobile"));
    }
}
