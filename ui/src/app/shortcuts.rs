/// A key event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl/Cmd+K
    FocusSearch,
    /// Escape closes the mobile overlay and the search form.
    Dismiss,
    /// Ctrl+\
    ToggleSidebar,
}

impl Shortcut {
    /// `None` for keys without a binding; the host keeps the default action.
    pub fn from_key(key: &KeyPress) -> Option<Self> {
        match key.key.as_str() {
            "k" | "K" if key.ctrl || key.meta => Some(Shortcut::FocusSearch),
            "Escape" => Some(Shortcut::Dismiss),
            "\\" if key.ctrl => Some(Shortcut::ToggleSidebar),
            _ => None,
        }
    }

    /// Whether the host should suppress its own handling of the key.
    pub fn prevents_default(self) -> bool {
        !matches!(self, Shortcut::Dismiss)
    }
}
