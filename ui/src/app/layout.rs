use crate::app::event_bus::EventBus;
use crate::components::common::{Msg, SidebarActivityMsg, Viewport};
use crate::dom::{Document, Element, NodeId, Selector};
use engine::settings::SettingsStore;

pub const DEFAULT_MOBILE_BREAKPOINT_PX: f64 = 991.98;

const SIDEBAR_ID: &str = "sidebar";
const MOBILE_TOGGLE_ID: &str = "sidebarToggle";
const COLLAPSED_CLASS: &str = "sidebar-collapsed";
const BACKDROP_CLASS: &str = "sidebar-backdrop";

/// Page-level sidebar state: desktop collapse, mobile overlay and the
/// transitions between the two when the viewport crosses the breakpoint.
pub struct LayoutController {
    document: Document,
    bus: EventBus,
    settings: SettingsStore,
    breakpoint: f64,
    is_mobile: bool,
    is_collapsed: bool,
}

impl LayoutController {
    pub fn new(
        document: Document,
        bus: EventBus,
        settings: SettingsStore,
        breakpoint: f64,
        viewport: Viewport,
    ) -> Self {
        Self {
            document,
            bus,
            settings,
            breakpoint,
            is_mobile: viewport.is_mobile(breakpoint),
            is_collapsed: false,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    fn sidebar(&self) -> Option<NodeId> {
        self.document.get_element_by_id(SIDEBAR_ID)
    }

    pub fn is_mobile_sidebar_open(&self) -> bool {
        self.sidebar()
            .is_some_and(|sidebar| self.document.has_class(sidebar, "show"))
    }

    /// Desktop only; persists the new state.
    pub fn toggle_sidebar_collapse(&mut self) {
        if self.is_mobile {
            return;
        }
        self.is_collapsed = !self.is_collapsed;
        let body = self.document.body();
        self.document
            .set_class(body, COLLAPSED_CLASS, self.is_collapsed);
        self.settings.set_sidebar_collapsed(self.is_collapsed);
        self.bus
            .publish(Msg::SidebarActivity(SidebarActivityMsg::Toggle {
                collapsed: self.is_collapsed,
            }));
    }

    /// Mobile only.
    pub fn toggle_mobile_sidebar(&mut self) {
        if !self.is_mobile {
            return;
        }
        if self.is_mobile_sidebar_open() {
            self.close_mobile_sidebar();
        } else {
            self.open_mobile_sidebar();
        }
    }

    pub fn open_mobile_sidebar(&mut self) {
        let Some(sidebar) = self.sidebar() else {
            return;
        };
        let backdrop = self.get_or_create_backdrop();
        self.document.add_class(sidebar, "show");
        if let Some(backdrop) = backdrop {
            self.document.add_class(backdrop, "show");
        }
        self.document
            .set_style(self.document.body(), "overflow", "hidden");
    }

    pub fn close_mobile_sidebar(&mut self) {
        let Some(sidebar) = self.sidebar() else {
            return;
        };
        self.document.remove_class(sidebar, "show");
        if let Some(backdrop) = self.document.query(&Selector::class(BACKDROP_CLASS)) {
            self.document.remove_class(backdrop, "show");
        }
        self.document.set_style(self.document.body(), "overflow", "");
    }

    fn get_or_create_backdrop(&self) -> Option<NodeId> {
        self.document
            .query(&Selector::class(BACKDROP_CLASS))
            .or_else(|| {
                self.document.append_child(
                    self.document.body(),
                    Element::new("div").with_class(BACKDROP_CLASS),
                )
            })
    }

    /// Apply the persisted collapse preference; desktop only.
    pub fn restore_sidebar_state(&mut self) {
        if self.is_mobile {
            return;
        }
        if self.settings.sidebar_collapsed() {
            self.document
                .add_class(self.document.body(), COLLAPSED_CLASS);
            self.is_collapsed = true;
        }
    }

    /// Re-evaluate the viewport class after a resize.
    pub fn handle_responsive(&mut self, viewport: Viewport) {
        let was_mobile = self.is_mobile;
        self.is_mobile = viewport.is_mobile(self.breakpoint);

        if !was_mobile && self.is_mobile {
            log::debug!("Switched to mobile layout at {}px", viewport.width);
            self.document
                .remove_class(self.document.body(), COLLAPSED_CLASS);
            self.close_mobile_sidebar();
        }

        if was_mobile && !self.is_mobile {
            log::debug!("Switched to desktop layout at {}px", viewport.width);
            self.close_mobile_sidebar();
            self.restore_sidebar_state();
        }
    }

    /// On mobile a click outside the open sidebar closes it.
    pub fn handle_document_click(&mut self, target: NodeId) {
        if !self.is_mobile || !self.is_mobile_sidebar_open() {
            return;
        }
        let inside = |id: &str| {
            self.document
                .get_element_by_id(id)
                .is_some_and(|node| self.document.contains(node, target))
        };
        if !inside(SIDEBAR_ID) && !inside(MOBILE_TOGGLE_ID) {
            self.close_mobile_sidebar();
        }
    }
}
