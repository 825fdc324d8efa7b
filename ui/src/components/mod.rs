// Core
pub mod common;

// Shell components, built on every page
pub mod navigation;
pub mod search;
pub mod theme_manager;
pub mod user_menu;

// Page modules
pub mod chart_manager;
pub mod data_table;
pub mod form_validator;
pub mod widgets;

// Fragment loading
pub mod partials_loader;
