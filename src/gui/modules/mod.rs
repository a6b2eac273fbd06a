//! Ready-made views.
//!
//! - [`submenu::Submenu`]: scrolling list of selectable items
//! - [`widget::Widget`]: text and buttons laid out freely

pub mod submenu;
pub mod widget;

pub use submenu::Submenu;
pub use widget::{Align, Font, Widget};
