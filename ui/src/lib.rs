//! # Sufee
//!
//! Headless runtime for the Sufee admin dashboard. A page is held as an
//! in-memory [`dom::Document`]; the runtime binds components to it, reacts to
//! resize, keyboard and click input, loads page-specific modules in the
//! background and tears everything down deterministically.
//!
//! ## Modules
//!
//! - [`app`] - page lifecycle, component registry, event bus, layout
//! - [`components`] - shell widgets, page modules and the partials loader
//! - [`config`] - layered configuration
//! - [`dom`] - document model and selector helpers
//! - [`error`] - error types and centralized error reporting
//! - [`fixture`] - serialized pages for the CLI and tests
//! - [`logger`] - logging setup
//!
//! Table, validation, settings and partial-fetching logic live in the
//! `engine` crate.

pub mod app;

pub mod components;
pub mod config;
pub mod dom;
pub mod error;
pub mod fixture;
pub mod logger;

// Re-export commonly used types for easier access in tests
pub use error::AppError;

pub use components::common::Msg;
