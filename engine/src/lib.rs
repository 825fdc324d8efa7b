//! # Sufee Engine
//!
//! UI-agnostic core of the Sufee dashboard runtime. Everything in here works on
//! plain data (rows of strings, rule strings, key/value settings) so that the
//! application shell in the `ui` crate only has to bind it to the document.
//!
//! ## Modules
//!
//! - [`datatable`] - Client-side search, dual-mode sort and pagination over a row snapshot
//! - [`validation`] - Rule grammar (`required|min:3|email`) and field validation
//! - [`settings`] - Persisted settings store with injectable backends
//! - [`partials`] - Fetching and caching of HTML fragments
//! - [`taskpool`] - Bounded async task pool
//! - [`common`] - Shared error types

pub mod common;
pub mod datatable;
pub mod partials;
pub mod settings;
pub mod taskpool;
pub mod validation;
