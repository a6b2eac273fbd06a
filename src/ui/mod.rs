//! Hardware front-end - OLED display + physical buttons.
//!
//! The application itself lives in the library and only sees the GUI
//! service. This module feeds it key events from the buttons and puts
//! finished frames on the panel.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×64 OLED via I²C
//! - **Buttons**: 6 tactile switches with debouncing (UP, DOWN, LEFT, RIGHT, OK, BACK)

pub mod buttons;
pub mod display;
