//! GPIO button input with async debouncing.
//!
//! Six physical buttons (active-low with internal pull-up), one per
//! [`InputKey`]. Each button is handled by an async task that waits for a
//! GPIO edge, debounces it and turns the press into the event sequence
//! the GUI expects:
//!
//!   Press, [Long, Repeat...], Release, [Short]
//!
//! Short is only sent when no Long was.

use defmt::debug;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Instant, Timer};

use submenu_widget::config::{
    BUTTON_DEBOUNCE_MS, INPUT_CHANNEL_DEPTH, LONG_PRESS_MS, REPEAT_INTERVAL_MS,
};
use submenu_widget::gui::input::{InputEvent, InputKey, InputType};
use submenu_widget::ui::input_logic::{is_long_press, release_events};

pub type InputSender = Sender<'static, CriticalSectionRawMutex, InputEvent, INPUT_CHANNEL_DEPTH>;

/// Run a single button loop.
///
/// Waits for the pin to go low (pressed), debounces, then reports the
/// press until the pin goes high again.
pub async fn button_task(pin: AnyPin, key: InputKey, tx: InputSender) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        // Wait for falling edge (button press, active-low).
        btn.wait_for_falling_edge().await;

        // Debounce: wait and re-check.
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        if !btn.is_low() {
            continue;
        }

        debug!("Button: {} pressed", key);
        tx.send(InputEvent::new(key, InputType::Press)).await;

        let pressed_at = Instant::now();
        let mut long_sent = false;
        loop {
            let wait = if long_sent {
                REPEAT_INTERVAL_MS
            } else {
                LONG_PRESS_MS
            };
            match select(btn.wait_for_high(), Timer::after(Duration::from_millis(wait))).await {
                Either::First(()) => break,
                Either::Second(()) => {
                    if long_sent {
                        tx.send(InputEvent::new(key, InputType::Repeat)).await;
                    } else if is_long_press(pressed_at.elapsed().as_millis(), LONG_PRESS_MS) {
                        tx.send(InputEvent::new(key, InputType::Long)).await;
                        long_sent = true;
                    }
                }
            }
        }

        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        for &kind in release_events(long_sent) {
            tx.send(InputEvent::new(key, kind)).await;
        }
        debug!("Button: {} released (long={})", key, long_sent);
    }
}
