//! Application-wide constants and compile-time configuration.
//!
//! Display geometry, container capacities, input timing and pin
//! assignments live here so they can be tuned in one place.

// Display

/// Display width in pixels (SSD1306 128×64).
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels.
pub const DISPLAY_HEIGHT: u32 = 64;

/// Framebuffer size in bytes (1 bit per pixel).
pub const CANVAS_BUFFER_SIZE: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;

// View dispatcher

/// Maximum number of view ids a dispatcher can hold.
pub const MAX_VIEWS: usize = 8;

/// Depth of the custom event queue.
/// Every input turn drains it, so a handful of slots is plenty.
pub const CUSTOM_EVENT_QUEUE_DEPTH: usize = 8;

// Submenu

/// Maximum number of items in one submenu.
pub const SUBMENU_MAX_ITEMS: usize = 8;

/// Maximum item label / header length (bytes).
pub const SUBMENU_LABEL_LEN: usize = 32;

/// Item rows visible at once below the header.
pub const SUBMENU_VISIBLE_ROWS: usize = 4;

/// Height of one submenu row (pixels).
pub const SUBMENU_ROW_HEIGHT: u32 = 16;

// Widget

/// Maximum number of elements in one widget.
pub const WIDGET_MAX_ELEMENTS: usize = 8;

/// Maximum text length of a string element (bytes).
pub const WIDGET_TEXT_LEN: usize = 64;

/// Maximum button label length (bytes).
pub const WIDGET_BUTTON_LABEL_LEN: usize = 16;

// Input

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 20;

/// Hold time after which a press becomes a Long press (ms).
pub const LONG_PRESS_MS: u64 = 300;

/// Interval between Repeat events while a key stays held (ms).
pub const REPEAT_INTERVAL_MS: u64 = 150;

/// Depth of the button → UI event channel.
pub const INPUT_CHANNEL_DEPTH: usize = 8;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button UP      → P0.11
//   Button DOWN    → P0.12
//   Button LEFT    → P0.24
//   Button RIGHT   → P0.25
//   Button OK      → P1.08
//   Button BACK    → P1.07
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
