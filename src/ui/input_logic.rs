use crate::gui::input::InputType;

/// Move selection cursor one item up, wrapping to the last item.
pub fn select_prev(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        0
    } else if selected == 0 || selected >= item_count {
        item_count - 1
    } else {
        selected - 1
    }
}

/// Move selection cursor one item down, wrapping to the first item.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected + 1 < item_count {
        selected + 1
    } else {
        0
    }
}

/// First visible row so that `selected` stays inside a window of
/// `visible` rows.
pub fn scroll_window(selected: usize, window: usize, visible: usize) -> usize {
    if visible == 0 || selected < window {
        selected
    } else if selected >= window + visible {
        selected + 1 - visible
    } else {
        window
    }
}

/// Whether a key held for `held_ms` has crossed the long-press threshold.
pub fn is_long_press(held_ms: u64, threshold_ms: u64) -> bool {
    held_ms >= threshold_ms
}

/// Events emitted when a key is let go.
pub fn release_events(long_sent: bool) -> &'static [InputType] {
    if long_sent {
        &[InputType::Release]
    } else {
        &[InputType::Release, InputType::Short]
    }
}
