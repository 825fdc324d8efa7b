use async_trait::async_trait;
use claims::*;
use engine::settings::{SettingsStore, Theme};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use sufee::app::application::{App, AppOptions};
use sufee::app::page_loader::{LoadContext, LoadedComponents, ModuleCatalog, PageModule, PageType};
use sufee::components::common::{Capabilities, Component, NotificationMsg, Viewport};
use sufee::components::theme_manager::ThemeManager;
use sufee::dom::{Document, Selector};
use sufee::error::AppResult;
use sufee::fixture::PageFixture;
use sufee::{AppError, Msg};

mod helpers {
    use super::*;

    /// Counts its hooks so tests can see what the registry called.
    pub struct Recorder {
        pub destroyed: Arc<AtomicBool>,
        pub resizes: Arc<AtomicUsize>,
    }

    impl Component for Recorder {
        fn capabilities(&self) -> Capabilities {
            Capabilities::DESTROY | Capabilities::RESIZE
        }

        fn destroy(&mut self) {
            self.destroyed.store(true, Ordering::SeqCst);
        }

        fn handle_resize(&mut self, _viewport: Viewport) {
            self.resizes.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Page module yielding one [`Recorder`] after `delay`.
    pub struct RecorderModule {
        pub name: &'static str,
        pub delay: Duration,
        pub destroyed: Arc<AtomicBool>,
        pub resizes: Arc<AtomicUsize>,
    }

    impl RecorderModule {
        pub fn new(name: &'static str, delay: Duration) -> Self {
            Self {
                name,
                delay,
                destroyed: Arc::new(AtomicBool::new(false)),
                resizes: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl PageModule for RecorderModule {
        fn name(&self) -> &str {
            self.name
        }

        async fn load(&self, _ctx: LoadContext) -> AppResult<LoadedComponents> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![(
                self.name.to_string(),
                Box::new(Recorder {
                    destroyed: self.destroyed.clone(),
                    resizes: self.resizes.clone(),
                }) as Box<dyn Component>,
            )])
        }
    }

    pub struct FailingModule;

    #[async_trait]
    impl PageModule for FailingModule {
        fn name(&self) -> &str {
            "broken"
        }

        async fn load(&self, _ctx: LoadContext) -> AppResult<LoadedComponents> {
            Err(AppError::Component("chart library missing".to_string()))
        }
    }

    pub fn options(width: f64) -> AppOptions {
        AppOptions::default().with_viewport(Viewport::new(width))
    }

    pub fn sample(page: PageType) -> Document {
        PageFixture::sample(page).into_document()
    }

    pub async fn settle(app: &App) {
        for _ in 0..100 {
            if app.pending_loads() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

use helpers::*;

#[tokio::test]
async fn test_tables_page_registers_shell_and_tables() {
    let mut app = App::new(sample(PageType::Tables), SettingsStore::in_memory(), options(1280.0));
    assert!(app.init());
    app.wait_for_page_components().await;

    assert_eq!(
        app.registry().names(),
        vec!["navigation", "search", "userMenu", "theme", "table-0"]
    );
    assert_eq!(app.page_type(), PageType::Tables);
}

#[tokio::test]
async fn test_dashboard_page_loads_only_widgets() {
    let mut app = App::new(sample(PageType::Dashboard), SettingsStore::in_memory(), options(1280.0));
    app.init();
    app.wait_for_page_components().await;

    assert!(app.registry().contains("widgets"));
    assert!(!app.registry().contains("charts"));
    assert!(app.registry().get_component("table-0").is_none());
}

#[tokio::test]
async fn test_failing_module_only_loses_its_own_components() {
    let healthy = Arc::new(RecorderModule::new("recorder", Duration::ZERO));
    let mut catalog = ModuleCatalog::empty();
    catalog.register(PageType::Dashboard, Arc::new(FailingModule));
    catalog.register(PageType::Dashboard, healthy.clone());

    let mut app = App::new(sample(PageType::Dashboard), SettingsStore::in_memory(), options(1280.0))
        .with_catalog(catalog);
    let notifications = app.bus().subscribe();
    app.init();
    app.wait_for_page_components().await;

    assert!(app.registry().contains("recorder"));
    assert!(!app.registry().contains("broken"));
    assert!(app.registry().contains("navigation"));

    let warned = notifications.try_iter().any(|msg| {
        matches!(
            msg,
            Msg::Notification(NotificationMsg::ShowWarning(text))
                if text.starts_with("Failed to load broken components")
        )
    });
    assert!(warned);
}

#[tokio::test(start_paused = true)]
async fn test_destroy_discards_finished_but_unapplied_loads() {
    let module = Arc::new(RecorderModule::new("late", Duration::ZERO));
    let mut catalog = ModuleCatalog::empty();
    catalog.register(PageType::Forms, module.clone());

    let mut app = App::new(sample(PageType::Forms), SettingsStore::in_memory(), options(1280.0))
        .with_catalog(catalog);
    app.init();
    settle(&app).await;
    assert_eq!(app.pending_loads(), 0);

    app.destroy();
    assert!(app.is_destroyed());
    assert!(app.registry().is_empty());
    assert!(module.destroyed.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_destroy_abandons_running_loads() {
    let module = Arc::new(RecorderModule::new("slow", Duration::from_secs(5)));
    let mut catalog = ModuleCatalog::empty();
    catalog.register(PageType::Charts, module.clone());

    let mut app = App::new(sample(PageType::Charts), SettingsStore::in_memory(), options(1280.0))
        .with_catalog(catalog);
    app.init();
    app.destroy();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(app.tick(), 0);
    assert!(app.registry().is_empty());
    assert!(!module.destroyed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_init_after_destroy_is_refused() {
    let mut app = App::new(sample(PageType::Default), SettingsStore::in_memory(), options(1280.0));
    app.destroy();
    assert!(!app.init());
    assert!(!app.is_initialized());
}

#[tokio::test(start_paused = true)]
async fn test_resize_burst_is_applied_once() {
    let module = Arc::new(RecorderModule::new("recorder", Duration::ZERO));
    let mut catalog = ModuleCatalog::empty();
    catalog.register(PageType::Dashboard, module.clone());

    let mut app = App::new(sample(PageType::Dashboard), SettingsStore::in_memory(), options(1280.0))
        .with_catalog(catalog);
    app.init();
    app.wait_for_page_components().await;

    let handles: Vec<_> = [1200.0, 900.0, 640.0]
        .into_iter()
        .map(|width| assert_some!(app.on_window_resize(width)))
        .collect();
    let mut fired = Vec::new();
    for handle in handles {
        fired.push(assert_ok!(handle.await));
    }
    assert_eq!(fired, vec![false, false, true]);

    app.tick();
    assert_eq!(app.viewport(), Viewport::new(640.0));
    assert!(app.layout().is_mobile());
    assert_eq!(module.resizes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_resize_after_destroy_is_ignored() {
    let mut app = App::new(sample(PageType::Default), SettingsStore::in_memory(), options(1280.0));
    app.init();
    app.destroy();
    assert_none!(app.on_window_resize(500.0));
}

#[tokio::test(start_paused = true)]
async fn test_breakpoint_transitions_manage_sidebar_state() {
    let settings = SettingsStore::in_memory();
    settings.set_sidebar_collapsed(true);
    let doc = sample(PageType::Default);
    let mut app = App::new(doc.clone(), settings, options(1280.0));
    app.init();

    let body = doc.body();
    let sidebar = assert_some!(doc.get_element_by_id("sidebar"));
    assert!(doc.has_class(body, "sidebar-collapsed"));

    // desktop -> mobile drops the collapse class
    assert_ok!(assert_some!(app.on_window_resize(800.0)).await);
    app.tick();
    assert!(app.layout().is_mobile());
    assert!(!doc.has_class(body, "sidebar-collapsed"));

    app.toggle_mobile_sidebar();
    assert!(doc.has_class(sidebar, "show"));
    assert_eq!(doc.style(body, "overflow").as_deref(), Some("hidden"));

    // mobile -> desktop closes the overlay and restores the preference
    assert_ok!(assert_some!(app.on_window_resize(1440.0)).await);
    app.tick();
    assert!(!app.layout().is_mobile());
    assert!(!doc.has_class(sidebar, "show"));
    assert_none!(doc.style(body, "overflow"));
    assert!(doc.has_class(body, "sidebar-collapsed"));
}

#[tokio::test]
async fn test_click_outside_closes_mobile_sidebar() {
    let doc = sample(PageType::Default);
    let mut app = App::new(doc.clone(), SettingsStore::in_memory(), options(600.0));
    app.init();

    let sidebar = assert_some!(doc.get_element_by_id("sidebar"));
    let link = assert_some!(doc.query_in(sidebar, &Selector::class("nav-link")));
    let main = assert_some!(doc.query(&Selector::tag("main")));

    app.toggle_mobile_sidebar();
    app.handle_document_click(link);
    assert!(doc.has_class(sidebar, "show"));

    app.handle_document_click(main);
    assert!(!doc.has_class(sidebar, "show"));
}

#[tokio::test]
async fn test_preferences_survive_a_reload() {
    let dir = assert_ok!(tempfile::tempdir());
    let path = dir.path().join("settings.json");

    {
        let settings = SettingsStore::from_path_or_memory(Some(&path));
        let mut app = App::new(sample(PageType::Default), settings, options(1280.0));
        app.init();
        app.toggle_sidebar_collapse();
        assert_some!(app.get_mut::<ThemeManager>("theme")).toggle_theme();
        app.destroy();
    }

    let settings = SettingsStore::from_path_or_memory(Some(&path));
    assert!(settings.sidebar_collapsed());
    assert_eq!(settings.theme(), Some(Theme::Dark));

    let doc = sample(PageType::Default);
    let mut app = App::new(doc.clone(), settings, options(1280.0));
    app.init();
    assert!(doc.has_class(doc.body(), "sidebar-collapsed"));
    assert_eq!(
        doc.attribute(doc.root(), "data-bs-theme").as_deref(),
        Some("dark")
    );
    assert_eq!(
        assert_some!(app.get::<ThemeManager>("theme")).current_theme(),
        Theme::Dark
    );
}
