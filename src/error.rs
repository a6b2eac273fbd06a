//! Unified error type for the GUI layer and the application.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // GUI service
    /// No record is published under the requested name.
    RecordNotFound,

    /// Another view dispatcher already owns the GUI view port.
    GuiBusy,

    // View dispatcher
    /// A view is already registered under this id.
    DuplicateView(u32),

    /// No view is registered under this id.
    UnknownView(u32),

    /// The dispatcher's view table is full.
    TooManyViews,

    /// The custom event queue is full.
    EventQueueFull,

    // Modules
    /// The submenu cannot take more items.
    TooManyItems,

    /// The widget cannot take more elements.
    TooManyElements,

    /// A label or text does not fit its fixed-size buffer.
    TextTooLong,

    // Hardware
    /// I²C transaction to the display failed.
    Display,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RecordNotFound => f.write_str("record not found"),
            Error::GuiBusy => f.write_str("gui view port already in use"),
            Error::DuplicateView(id) => write!(f, "view {id} already registered"),
            Error::UnknownView(id) => write!(f, "view {id} not registered"),
            Error::TooManyViews => f.write_str("view table full"),
            Error::EventQueueFull => f.write_str("custom event queue full"),
            Error::TooManyItems => f.write_str("submenu full"),
            Error::TooManyElements => f.write_str("widget full"),
            Error::TextTooLong => f.write_str("text too long"),
            Error::Display => f.write_str("display error"),
        }
    }
}
