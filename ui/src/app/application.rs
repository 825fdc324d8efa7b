//! The page runtime: builds the shell components, dispatches page modules,
//! and routes resize, keyboard and click input to whoever owns it.

use crate::app::debounce::Debouncer;
use crate::app::event_bus::EventBus;
use crate::app::events::AppEvent;
use crate::app::layout::{DEFAULT_MOBILE_BREAKPOINT_PX, LayoutController};
use crate::app::page_loader::{LoadContext, ModuleCatalog, PageType};
use crate::app::registry::ComponentRegistry;
use crate::app::shortcuts::{KeyPress, Shortcut};
use crate::app::task_manager::TaskManager;
use crate::components::common::{Capabilities, Component, Msg, Viewport};
use crate::components::navigation::{NAVIGATION_BREAKPOINT_PX, Navigation};
use crate::components::partials_loader::PartialsLoader;
use crate::components::search::Search;
use crate::components::theme_manager::ThemeManager;
use crate::components::user_menu::UserMenu;
use crate::config::AppConfig;
use crate::dom::{Document, NodeId};
use crate::error::{AppError, AppResult, ErrorReporter};
use engine::datatable::DEFAULT_PAGE_SIZE;
use engine::partials::PartialsClient;
use engine::settings::SettingsStore;
use engine::taskpool::TaskPool;
use futures::future::join_all;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);
pub const DEFAULT_TASK_POOL_SIZE: usize = 4;

/// Runtime knobs, usually taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub viewport: Viewport,
    pub page_size: usize,
    pub resize_debounce: Duration,
    pub mobile_breakpoint: f64,
    pub navigation_breakpoint: f64,
    pub task_pool_size: usize,
    /// Overrides `data-page` on the body.
    pub page_type: Option<PageType>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            page_size: DEFAULT_PAGE_SIZE,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT_PX,
            navigation_breakpoint: NAVIGATION_BREAKPOINT_PX,
            task_pool_size: DEFAULT_TASK_POOL_SIZE,
            page_type: None,
        }
    }
}

impl AppOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            viewport: Viewport::new(config.viewport_width_px()),
            page_size: config.page_size(),
            resize_debounce: config.resize_debounce(),
            mobile_breakpoint: config.mobile_breakpoint_px(),
            navigation_breakpoint: config.navigation_breakpoint_px(),
            task_pool_size: config.task_pool_size(),
            page_type: None,
        }
    }

    pub fn with_page_type(mut self, page_type: PageType) -> Self {
        self.page_type = Some(page_type);
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }
}

/// Owns every live component of one page view.
///
/// All state changes happen on the owner's thread: background loads and the
/// resize debouncer only send [`AppEvent`]s, and bus messages are queued
/// until [`App::tick`] applies them. [`App::init`] must run inside a tokio
/// runtime.
pub struct App {
    document: Document,
    settings: SettingsStore,
    options: AppOptions,
    page_type: PageType,
    viewport: Viewport,

    bus: EventBus,
    bus_rx: Receiver<Msg>,
    tx_to_app: Sender<AppEvent>,
    rx_from_tasks: Receiver<AppEvent>,
    error_reporter: ErrorReporter,

    registry: ComponentRegistry,
    catalog: ModuleCatalog,
    task_manager: TaskManager,
    layout: LayoutController,
    debouncer: Debouncer,

    lifecycle: CancellationToken,
    pending: Vec<JoinHandle<Option<()>>>,
    initialized: bool,
    destroyed: bool,
}

impl App {
    pub fn new(document: Document, settings: SettingsStore, options: AppOptions) -> Self {
        let bus = EventBus::new();
        let bus_rx = bus.subscribe();
        let (tx_to_app, rx_from_tasks) = mpsc::channel();
        let error_reporter = ErrorReporter::new(bus.clone());
        let task_manager = TaskManager::new(
            TaskPool::new(options.task_pool_size),
            tx_to_app.clone(),
            error_reporter.clone(),
        );
        let page_type = options
            .page_type
            .unwrap_or_else(|| PageType::from_document(&document));
        let layout = LayoutController::new(
            document.clone(),
            bus.clone(),
            settings.clone(),
            options.mobile_breakpoint,
            options.viewport,
        );

        Self {
            viewport: options.viewport,
            debouncer: Debouncer::new(options.resize_debounce),
            document,
            settings,
            page_type,
            bus,
            bus_rx,
            tx_to_app,
            rx_from_tasks,
            error_reporter,
            registry: ComponentRegistry::new(),
            catalog: ModuleCatalog::default(),
            task_manager,
            layout,
            lifecycle: CancellationToken::new(),
            pending: Vec::new(),
            initialized: false,
            destroyed: false,
            options,
        }
    }

    pub fn with_catalog(mut self, catalog: ModuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Build the shell, apply the layout and start the page modules.
    /// Returns `false` when the app was already initialized or destroyed.
    pub fn init(&mut self) -> bool {
        match self.try_init() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{e}, ignoring");
                false
            }
        }
    }

    /// Like [`App::init`], but says why a second or post-teardown call was refused.
    pub fn try_init(&mut self) -> AppResult<()> {
        if self.destroyed {
            return Err(AppError::State("init called after destroy".to_string()));
        }
        if self.initialized {
            return Err(AppError::State("init called twice".to_string()));
        }
        self.initialized = true;
        log::info!("Initializing {} page", self.page_type);

        self.init_core_components();
        self.layout.restore_sidebar_state();
        self.layout.handle_responsive(self.viewport);
        self.load_page_components();
        Ok(())
    }

    fn init_core_components(&mut self) {
        let navigation = Navigation::new(
            self.document.clone(),
            self.bus.clone(),
            self.options.navigation_breakpoint,
            self.viewport,
        );
        let search = Search::new(self.document.clone(), self.bus.clone());
        let user_menu = UserMenu::new(self.document.clone());
        let theme = ThemeManager::new(self.document.clone(), self.bus.clone(), self.settings.clone());

        self.registry.add_component("navigation", Box::new(navigation));
        self.registry.add_component("search", Box::new(search));
        self.registry.add_component("userMenu", Box::new(user_menu));
        self.registry.add_component("theme", Box::new(theme));
    }

    fn load_page_components(&mut self) {
        let modules = self.catalog.modules_for(self.page_type);
        if modules.is_empty() {
            log::debug!("No page modules for {}", self.page_type);
            return;
        }
        log::info!("Loading {} page module(s) for {}", modules.len(), self.page_type);

        let ctx = LoadContext {
            document: self.document.clone(),
            bus: self.bus.clone(),
            page_size: self.options.page_size,
        };
        for module in modules {
            let handle = self
                .task_manager
                .load_module(module, ctx.clone(), &self.lifecycle);
            self.pending.push(handle);
        }
    }

    /// Await every page-module load started so far, then apply the results.
    pub async fn wait_for_page_components(&mut self) -> usize {
        let handles = std::mem::take(&mut self.pending);
        for result in join_all(handles).await {
            if let Err(e) = result {
                log::error!("Page module task failed: {e}");
            }
        }
        self.tick()
    }

    /// Fill `[data-partial]` placeholders, then let components react.
    pub async fn load_partials(&mut self, client: PartialsClient) -> usize {
        let loader = PartialsLoader::new(client, self.document.clone(), self.bus.clone());
        let loaded = loader.load_all_partials().await;
        self.tick();
        loaded
    }

    /// Apply everything queued so far: finished loads, settled resizes and
    /// bus messages. Messages published while dispatching wait for the next
    /// tick. Returns how many items were applied.
    pub fn tick(&mut self) -> usize {
        let events: Vec<AppEvent> = self.rx_from_tasks.try_iter().collect();
        let messages: Vec<Msg> = self.bus_rx.try_iter().collect();
        let processed = events.len() + messages.len();

        for event in events {
            self.apply_event(event);
        }
        if !self.destroyed {
            for msg in &messages {
                self.registry.dispatch(msg);
            }
        }
        processed
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ResizeSettled(width) => {
                if self.destroyed {
                    return;
                }
                self.apply_resize(Viewport::new(width));
            }
            AppEvent::ModuleLoaded { module, components } => {
                if self.destroyed {
                    let late = AppError::State(format!("load of '{module}' finished after destroy"));
                    log::debug!("{late}, discarding");
                    for (_, mut component) in components {
                        if component.capabilities().contains(Capabilities::DESTROY) {
                            component.destroy();
                        }
                    }
                    return;
                }
                log::info!("Module '{module}' loaded {} component(s)", components.len());
                for (name, component) in components {
                    self.registry.add_component(&name, component);
                }
            }
            AppEvent::ModuleFailed { module, error } => {
                log::debug!("Module '{module}' failed: {error}");
            }
        }
    }

    fn apply_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout.handle_responsive(viewport);
        let notified = self.registry.handle_resize(viewport);
        log::debug!("Resize to {}px delivered to {notified} component(s)", viewport.width);
    }

    /// Raw window resize; coalesced by the debouncer and applied by a later
    /// [`App::tick`].
    pub fn on_window_resize(&self, width: f64) -> Option<JoinHandle<bool>> {
        if self.destroyed {
            return None;
        }
        let tx = self.tx_to_app.clone();
        Some(self.debouncer.trigger(move || {
            if tx.send(AppEvent::ResizeSettled(width)).is_err() {
                log::debug!("App gone before resize to {width}px settled");
            }
        }))
    }

    /// Returns whether the host should suppress the key's default action.
    pub fn handle_key(&mut self, key: &KeyPress) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(shortcut) = Shortcut::from_key(key) else {
            return false;
        };
        log::debug!("Shortcut {shortcut:?}");

        match shortcut {
            Shortcut::FocusSearch => {
                if let Some(search) = self.registry.get_mut::<Search>("search") {
                    search.focus();
                }
            }
            Shortcut::Dismiss => {
                if self.layout.is_mobile() && self.layout.is_mobile_sidebar_open() {
                    self.layout.close_mobile_sidebar();
                }
                if let Some(search) = self.registry.get_mut::<Search>("search") {
                    if search.is_open() {
                        search.close();
                    }
                }
            }
            Shortcut::ToggleSidebar => {
                if self.layout.is_mobile() {
                    self.layout.toggle_mobile_sidebar();
                } else {
                    self.layout.toggle_sidebar_collapse();
                }
            }
        }
        shortcut.prevents_default()
    }

    /// Click anywhere on the page; closes whatever the click landed outside of.
    pub fn handle_document_click(&mut self, target: NodeId) {
        if self.destroyed {
            return;
        }
        self.layout.handle_document_click(target);
        if let Some(search) = self.registry.get_mut::<Search>("search") {
            search.handle_document_click(target);
        }
        if let Some(menu) = self.registry.get_mut::<UserMenu>("userMenu") {
            menu.handle_document_click(target);
        }
        if let Some(navigation) = self.registry.get_mut::<Navigation>("navigation") {
            navigation.handle_document_click(target);
        }
    }

    pub fn toggle_sidebar_collapse(&mut self) {
        self.layout.toggle_sidebar_collapse();
    }

    pub fn toggle_mobile_sidebar(&mut self) {
        self.layout.toggle_mobile_sidebar();
    }

    /// Tear everything down. Loads still running are abandoned and loads
    /// that already finished but were not applied are destroyed unseen.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        log::info!("Destroying app with {} component(s)", self.registry.len());

        self.lifecycle.cancel();
        self.debouncer.cancel();
        self.task_manager.shutdown();
        self.registry.destroy();
        self.tick();
    }

    pub fn add_component(&mut self, name: &str, component: Box<dyn Component>) -> bool {
        self.registry.add_component(name, component)
    }

    pub fn get_component(&self, name: &str) -> Option<&dyn Component> {
        self.registry.get_component(name)
    }

    pub fn get<T: Component>(&self, name: &str) -> Option<&T> {
        self.registry.get(name)
    }

    pub fn get_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        self.registry.get_mut(name)
    }

    pub fn remove_component(&mut self, name: &str) -> bool {
        self.registry.remove_component(name)
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn layout(&self) -> &LayoutController {
        &self.layout
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn error_reporter(&self) -> &ErrorReporter {
        &self.error_reporter
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pending_loads(&self) -> usize {
        self.pending.iter().filter(|handle| !handle.is_finished()).count()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.lifecycle.cancel();
    }
}
