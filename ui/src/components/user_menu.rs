use crate::components::common::{Capabilities, Component};
use crate::dom::{Document, NodeId, Selector};

/// What a user-menu link asks the host to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Profile,
    Settings,
    /// The host confirms before navigating away.
    Logout,
    /// Plain link navigation.
    Follow,
}

impl MenuAction {
    pub fn from_attribute(action: Option<&str>) -> Self {
        match action {
            Some("profile") => MenuAction::Profile,
            Some("settings") => MenuAction::Settings,
            Some("logout") => MenuAction::Logout,
            _ => MenuAction::Follow,
        }
    }

    pub fn target_path(&self) -> Option<&'static str> {
        match self {
            MenuAction::Profile => Some("/profile"),
            MenuAction::Settings => Some("/settings"),
            MenuAction::Logout => Some("/logout"),
            MenuAction::Follow => None,
        }
    }
}

/// User dropdown in the header.
#[derive(Debug)]
pub struct UserMenu {
    document: Document,
    toggle: Option<NodeId>,
    menu: Option<NodeId>,
    is_open: bool,
}

impl UserMenu {
    pub fn new(document: Document) -> Self {
        let toggle = document
            .query(&Selector::class("user-area"))
            .and_then(|area| document.query_in(area, &Selector::class("dropdown-toggle")));
        let menu = document.query(&Selector::class("user-menu"));
        Self {
            document,
            toggle,
            menu,
            is_open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn open(&mut self) {
        let Some(toggle) = self.toggle else {
            return;
        };
        self.document.add_class(toggle, "show");
        if let Some(menu) = self.menu {
            self.document.add_class(menu, "show");
        }
        self.is_open = true;
    }

    pub fn close(&mut self) {
        let Some(toggle) = self.toggle else {
            return;
        };
        self.document.remove_class(toggle, "show");
        if let Some(menu) = self.menu {
            self.document.remove_class(menu, "show");
        }
        self.is_open = false;
    }

    /// Click inside the menu on `link`; closes the menu.
    pub fn handle_menu_click(&mut self, link: NodeId) -> MenuAction {
        let action = self
            .document
            .closest(link, &Selector::class("nav-link"))
            .and_then(|link| self.document.data(link, "action"));
        let action = MenuAction::from_attribute(action.as_deref());
        self.close();
        action
    }

    pub fn handle_document_click(&mut self, target: NodeId) {
        if !self.is_open {
            return;
        }
        let inside = |node: Option<NodeId>| node.is_some_and(|n| self.document.contains(n, target));
        if !inside(self.toggle) && !inside(self.menu) {
            self.close();
        }
    }
}

impl Component for UserMenu {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESTROY
    }

    fn destroy(&mut self) {
        self.close();
    }
}
