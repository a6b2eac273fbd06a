//! Submenu and Widget view-switching application.
//!
//! The library holds everything that runs without hardware: the GUI
//! service the application is built against, the Submenu and Widget
//! views, the view dispatcher and the application itself. The embedded
//! binary (`main.rs`, `embedded` feature) wires it to buttons and an
//! SSD1306 panel.
//!
//! Usage: `cargo test` on the host.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod error;
pub mod gui;

pub mod ui {
    pub mod input_logic;
}

pub use app::{submenu_and_widget_app_main, App, AppState, MenuItem, ViewIndex};
pub use error::Error;
pub use gui::{Gui, RECORD_GUI};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
