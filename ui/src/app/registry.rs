use crate::components::common::{AsAny, Capabilities, Component, Msg, Viewport};
use indexmap::IndexMap;

struct Entry {
    component: Box<dyn Component>,
    capabilities: Capabilities,
}

impl Entry {
    fn new(component: Box<dyn Component>) -> Self {
        let capabilities = component.capabilities();
        Self {
            component,
            capabilities,
        }
    }

    fn destroy(&mut self, name: &str) {
        if self.capabilities.contains(Capabilities::DESTROY) {
            log::debug!("Destroying component '{name}'");
            self.component.destroy();
        }
    }
}

/// Live components keyed by name.
///
/// Iteration, resize fan-out and teardown follow the order in which names
/// were first registered.
#[derive(Default)]
pub struct ComponentRegistry {
    entries: IndexMap<String, Entry>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component` under `name`. A previous instance under the
    /// same name is destroyed first; returns whether one existed.
    pub fn add_component(&mut self, name: &str, component: Box<dyn Component>) -> bool {
        let entry = Entry::new(component);
        match self.entries.get_mut(name) {
            Some(previous) => {
                log::info!("Replacing component '{name}'");
                previous.destroy(name);
                *previous = entry;
                true
            }
            None => {
                log::debug!("Registered component '{name}' ({:?})", entry.capabilities);
                self.entries.insert(name.to_string(), entry);
                false
            }
        }
    }

    pub fn get_component(&self, name: &str) -> Option<&dyn Component> {
        self.entries.get(name).map(|entry| entry.component.as_ref())
    }

    pub fn get_component_mut(&mut self, name: &str) -> Option<&mut dyn Component> {
        match self.entries.get_mut(name) {
            Some(entry) => Some(entry.component.as_mut()),
            None => None,
        }
    }

    /// Typed access; `None` when absent or of another type.
    pub fn get<T: Component>(&self, name: &str) -> Option<&T> {
        let entry = self.entries.get(name)?;
        AsAny::as_any(entry.component.as_ref()).downcast_ref::<T>()
    }

    pub fn get_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        let entry = self.entries.get_mut(name)?;
        AsAny::as_any_mut(entry.component.as_mut()).downcast_mut::<T>()
    }

    pub fn capabilities(&self, name: &str) -> Option<Capabilities> {
        self.entries.get(name).map(|entry| entry.capabilities)
    }

    /// Destroy and unregister; returns whether `name` was registered.
    pub fn remove_component(&mut self, name: &str) -> bool {
        match self.entries.shift_remove(name) {
            Some(mut entry) => {
                entry.destroy(name);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call `handle_resize` on resize-capable components; returns how many.
    pub fn handle_resize(&mut self, viewport: Viewport) -> usize {
        let mut handled = 0;
        for (name, entry) in self.entries.iter_mut() {
            if entry.capabilities.contains(Capabilities::RESIZE) {
                log::trace!("Resizing '{name}' to {}px", viewport.width);
                entry.component.handle_resize(viewport);
                handled += 1;
            }
        }
        handled
    }

    /// Deliver `msg` to components that listen for events.
    pub fn dispatch(&mut self, msg: &Msg) -> usize {
        let mut delivered = 0;
        for entry in self.entries.values_mut() {
            if entry.capabilities.contains(Capabilities::EVENTS) {
                entry.component.handle_event(msg);
                delivered += 1;
            }
        }
        delivered
    }

    /// Destroy every component and empty the registry. Safe to repeat.
    pub fn destroy(&mut self) {
        for (name, mut entry) in self.entries.drain(..) {
            entry.destroy(&name);
        }
    }
}
