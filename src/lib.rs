//! Folio - a terminal reader for multi-chapter documentation
//!
//! Folio opens a markdown document as a navigable page: a chapter sidebar
//! with a single active chapter and section, in-page search with
//! highlighting, per-topic reading progress and a persisted light/dark
//! theme.

pub mod app;
pub mod config;
pub mod document;
pub mod nav;
pub mod progress;
pub mod search;
pub mod storage;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
