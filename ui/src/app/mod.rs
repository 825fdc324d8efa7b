//! # Application Module
//!
//! Page lifecycle for the dashboard runtime.
//!
//! - [`application`] - the [`App`](application::App) shell: init, tick, destroy
//! - [`registry`] - live components by name, with captured capabilities
//! - [`event_bus`] - app-scoped publish/subscribe for [`Msg`](crate::Msg)
//! - [`page_loader`] - page types and the modules each one loads
//! - [`task_manager`] - background module loads tied to the app lifecycle
//! - [`layout`] - sidebar collapse, mobile overlay and breakpoint transitions
//! - [`debounce`] - trailing-edge resize debouncing
//! - [`shortcuts`] - keyboard bindings
//!
//! ## Usage
//!
//! ```no_run
//! use sufee::app::application::{App, AppOptions};
//! use sufee::dom::Document;
//! use engine::settings::SettingsStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut app = App::new(Document::new(), SettingsStore::in_memory(), AppOptions::default());
//!     app.init();
//!     app.wait_for_page_components().await;
//!     app.destroy();
//! }
//! ```

pub mod application;
pub mod debounce;
pub mod event_bus;
pub mod events;
pub mod layout;
pub mod page_loader;
pub mod registry;
pub mod shortcuts;
pub mod task_manager;
