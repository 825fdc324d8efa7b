use crate::error::AppError;
use engine::settings::Theme;
use std::any::Any;

/// Messages published on the application event bus.
///
/// Each variant mirrors one of the dashboard's custom events; see
/// [`Msg::event_name`].
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    SidebarActivity(SidebarActivityMsg),
    SearchActivity(SearchActivityMsg),
    ThemeActivity(ThemeActivityMsg),
    PartialActivity(PartialActivityMsg),
    Notification(NotificationMsg),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SidebarActivityMsg {
    /// Desktop collapse state changed.
    Toggle { collapsed: bool },
    Opened,
    Closed,
    SubmenuOpened { target: String },
    SubmenuClosed { target: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchActivityMsg {
    Opened,
    Closed,
    Performed { query: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThemeActivityMsg {
    Changed { theme: Theme },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartialActivityMsg {
    Loaded { name: String, partial_id: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationMsg {
    ShowError(AppError),
    ShowWarning(String),
}

impl Msg {
    pub fn event_name(&self) -> &'static str {
        match self {
            Msg::SidebarActivity(SidebarActivityMsg::Toggle { .. }) => "sidebarToggle",
            Msg::SidebarActivity(SidebarActivityMsg::Opened) => "sidebar:opened",
            Msg::SidebarActivity(SidebarActivityMsg::Closed) => "sidebar:closed",
            Msg::SidebarActivity(SidebarActivityMsg::SubmenuOpened { .. }) => "submenu:opened",
            Msg::SidebarActivity(SidebarActivityMsg::SubmenuClosed { .. }) => "submenu:closed",
            Msg::SearchActivity(SearchActivityMsg::Opened) => "search:opened",
            Msg::SearchActivity(SearchActivityMsg::Closed) => "search:closed",
            Msg::SearchActivity(SearchActivityMsg::Performed { .. }) => "search:performed",
            Msg::ThemeActivity(ThemeActivityMsg::Changed { .. }) => "theme:changed",
            Msg::PartialActivity(PartialActivityMsg::Loaded { .. }) => "partialLoaded",
            Msg::Notification(_) => "notification",
        }
    }

    /// Name of the fragment when this is a partial-loaded event.
    pub fn loaded_partial(&self) -> Option<&str> {
        match self {
            Msg::PartialActivity(PartialActivityMsg::Loaded { name, .. }) => Some(name),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Optional hooks a component takes part in.
    ///
    /// Read once when the component is registered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u8 {
        const DESTROY = 1 << 0;
        const RESIZE = 1 << 1;
        const EVENTS = 1 << 2;
    }
}

/// Current window geometry in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Self { width }
    }

    pub fn is_mobile(&self, breakpoint: f64) -> bool {
        self.width <= breakpoint
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0)
    }
}

/// Upcast to [`Any`] so the registry can hand out concrete types.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A live dashboard component.
///
/// Hooks are no-ops by default; a component opts in by overriding them and
/// listing the matching flag in [`Component::capabilities`]. The registry
/// only calls hooks whose flag was declared at registration.
pub trait Component: AsAny + Send {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Release document bindings and restore any markup the component changed.
    fn destroy(&mut self) {}

    fn handle_resize(&mut self, _viewport: Viewport) {}

    fn handle_event(&mut self, _msg: &Msg) {}
}
