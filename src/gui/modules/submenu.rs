//! Submenu - a vertical list of labelled items.
//!
//! Up/Down move the cursor (wrapping at both ends), Ok activates the
//! item under the cursor. Back is left to the dispatcher.

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_6X13_BOLD};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};

use crate::config::{
    DISPLAY_HEIGHT, SUBMENU_LABEL_LEN, SUBMENU_MAX_ITEMS, SUBMENU_ROW_HEIGHT, SUBMENU_VISIBLE_ROWS,
};
use crate::error::Error;
use crate::gui::canvas::Canvas;
use crate::gui::input::{InputEvent, InputKey, InputType};
use crate::gui::view::{Callback, InputResult, SubmenuItemCallback, View};
use crate::ui::input_logic::{scroll_window, select_next, select_prev};

/// Width of the highlight bar; the rest is left for the scrollbar.
const ITEM_WIDTH: u32 = 123;

/// One entry of a [`Submenu`].
pub struct SubmenuItem<C> {
    label: String<SUBMENU_LABEL_LEN>,
    index: u32,
    callback: SubmenuItemCallback<C>,
}

impl<C> SubmenuItem<C> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

pub struct Submenu<C> {
    items: Vec<SubmenuItem<C>, SUBMENU_MAX_ITEMS>,
    header: Option<String<SUBMENU_LABEL_LEN>>,
    position: usize,
    window: usize,
}

impl<C> Submenu<C> {
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            header: None,
            position: 0,
            window: 0,
        }
    }

    /// Append an item. Activating it calls `callback(context, index)`.
    pub fn add_item(
        &mut self,
        label: &str,
        index: u32,
        callback: SubmenuItemCallback<C>,
    ) -> Result<(), Error> {
        let label = String::try_from(label).map_err(|_| Error::TextTooLong)?;
        self.items
            .push(SubmenuItem {
                label,
                index,
                callback,
            })
            .map_err(|_| Error::TooManyItems)?;
        Ok(())
    }

    /// Remove every item and the header; the cursor goes back to the top.
    pub fn reset(&mut self) {
        self.items.clear();
        self.header = None;
        self.position = 0;
        self.window = 0;
    }

    /// Show `header` above the items.
    pub fn set_header(&mut self, header: &str) -> Result<(), Error> {
        self.header = Some(String::try_from(header).map_err(|_| Error::TextTooLong)?);
        self.window = scroll_window(self.position, self.window, self.visible_rows());
        Ok(())
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Move the cursor to the item registered with `index`, if any.
    pub fn set_selected_item(&mut self, index: u32) {
        if let Some(position) = self.items.iter().position(|item| item.index == index) {
            self.position = position;
            self.window = scroll_window(position, self.window, self.visible_rows());
        }
    }

    /// Index of the item under the cursor.
    pub fn selected_item(&self) -> Option<u32> {
        self.items.get(self.position).map(|item| item.index)
    }

    pub fn items(&self) -> &[SubmenuItem<C>] {
        &self.items
    }

    /// First item row currently on screen.
    pub fn window_position(&self) -> usize {
        self.window
    }

    fn visible_rows(&self) -> usize {
        if self.header.is_some() {
            SUBMENU_VISIBLE_ROWS - 1
        } else {
            SUBMENU_VISIBLE_ROWS
        }
    }

    fn move_cursor(&mut self, key: InputKey) {
        let count = self.items.len();
        self.position = match key {
            InputKey::Up => select_prev(self.position, count),
            _ => select_next(self.position, count),
        };
        self.window = scroll_window(self.position, self.window, self.visible_rows());
    }

    fn draw_scrollbar(&self, canvas: &mut Canvas, top: i32) {
        let count = self.items.len() as u32;
        let visible = self.visible_rows() as u32;
        if count <= visible {
            return;
        }
        let track = DISPLAY_HEIGHT as i32 - top;
        let x = ITEM_WIDTH as i32 + 3;
        let _ = Line::new(Point::new(x, top), Point::new(x, DISPLAY_HEIGHT as i32 - 1))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(canvas);

        let thumb = (track as u32 / count).max(2);
        let thumb_top = top + (self.position as u32 * track as u32 / count) as i32;
        let _ = Rectangle::new(Point::new(x - 1, thumb_top), Size::new(3, thumb))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(canvas);
    }
}

impl<C> Default for Submenu<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> View<C> for Submenu<C> {
    fn draw(&self, canvas: &mut Canvas) {
        let mut top = 0;
        if let Some(header) = &self.header {
            let style = MonoTextStyle::new(&FONT_6X13_BOLD, BinaryColor::On);
            let _ = Text::with_baseline(header, Point::new(4, 1), style, Baseline::Top).draw(canvas);
            top = SUBMENU_ROW_HEIGHT as i32;
        }

        let rows = self
            .items
            .iter()
            .enumerate()
            .skip(self.window)
            .take(self.visible_rows());
        for (row, (position, item)) in rows.enumerate() {
            let y = top + row as i32 * SUBMENU_ROW_HEIGHT as i32;
            let selected = position == self.position;
            let color = if selected {
                let bar = Rectangle::new(Point::new(0, y), Size::new(ITEM_WIDTH, SUBMENU_ROW_HEIGHT - 1));
                let _ = RoundedRectangle::with_equal_corners(bar, Size::new(2, 2))
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(canvas);
                BinaryColor::Off
            } else {
                BinaryColor::On
            };
            let style = MonoTextStyle::new(&FONT_6X10, color);
            let _ = Text::with_baseline(&item.label, Point::new(6, y + 3), style, Baseline::Top)
                .draw(canvas);
        }

        self.draw_scrollbar(canvas, top);
    }

    fn input(&mut self, event: &InputEvent) -> InputResult<C> {
        match (event.key, event.kind) {
            (InputKey::Up | InputKey::Down, InputType::Short | InputType::Repeat) => {
                self.move_cursor(event.key);
                InputResult::Consumed
            }
            (InputKey::Ok, InputType::Short) => match self.items.get(self.position) {
                Some(item) => {
                    debug!("submenu: item {} activated", item.index);
                    InputResult::Callback(Callback::SubmenuItem {
                        callback: item.callback,
                        index: item.index,
                    })
                }
                None => InputResult::Consumed,
            },
            _ => InputResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        activated: heapless::Vec<u32, 8>,
    }

    fn record(recorder: &mut Recorder, index: u32) {
        recorder.activated.push(index).unwrap();
    }

    fn menu_with(labels: &[&str]) -> Submenu<Recorder> {
        let mut menu = Submenu::new();
        for (i, label) in labels.iter().enumerate() {
            menu.add_item(label, i as u32 + 1, record).unwrap();
        }
        menu
    }

    fn press(menu: &mut Submenu<Recorder>, key: InputKey) -> InputResult<Recorder> {
        menu.input(&InputEvent::short(key))
    }

    #[test]
    fn items_are_kept_in_order() {
        let menu = menu_with(&["Option 1", "Option 2", "Option 3"]);
        let labels: heapless::Vec<&str, 3> = menu.items().iter().map(|i| i.label()).collect();
        assert_eq!(labels.as_slice(), &["Option 1", "Option 2", "Option 3"]);
        assert_eq!(menu.items()[2].index(), 3);
        assert_eq!(menu.selected_item(), Some(1));
    }

    #[test]
    fn add_item_rejects_overflow_and_long_labels() {
        let mut menu: Submenu<Recorder> = Submenu::new();
        for i in 0..SUBMENU_MAX_ITEMS as u32 {
            menu.add_item("x", i, record).unwrap();
        }
        assert_eq!(menu.add_item("y", 99, record), Err(Error::TooManyItems));

        let mut menu: Submenu<Recorder> = Submenu::new();
        let long = "a label that is much too long for the buffer";
        assert_eq!(menu.add_item(long, 0, record), Err(Error::TextTooLong));
        assert!(menu.items().is_empty());
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut menu = menu_with(&["a", "b", "c"]);
        assert!(press(&mut menu, InputKey::Up).is_consumed());
        assert_eq!(menu.selected_item(), Some(3));
        press(&mut menu, InputKey::Down);
        assert_eq!(menu.selected_item(), Some(1));
        press(&mut menu, InputKey::Down);
        assert_eq!(menu.selected_item(), Some(2));
    }

    #[test]
    fn repeat_moves_cursor_but_press_does_not() {
        let mut menu = menu_with(&["a", "b", "c"]);
        menu.input(&InputEvent::new(InputKey::Down, InputType::Press));
        assert_eq!(menu.selected_item(), Some(1));
        menu.input(&InputEvent::new(InputKey::Down, InputType::Repeat));
        assert_eq!(menu.selected_item(), Some(2));
    }

    #[test]
    fn ok_activates_selected_item() {
        let mut menu = menu_with(&["a", "b", "c"]);
        press(&mut menu, InputKey::Down);

        let mut recorder = Recorder::default();
        match press(&mut menu, InputKey::Ok) {
            InputResult::Callback(callback) => callback.invoke(&mut recorder),
            _ => panic!("expected a callback"),
        }
        assert_eq!(recorder.activated.as_slice(), &[2]);
    }

    #[test]
    fn ok_long_and_back_are_not_handled() {
        let mut menu = menu_with(&["a"]);
        assert!(!menu.input(&InputEvent::long(InputKey::Ok)).is_consumed());
        assert!(!press(&mut menu, InputKey::Back).is_consumed());
        assert!(!press(&mut menu, InputKey::Left).is_consumed());
    }

    #[test]
    fn ok_on_empty_menu_is_swallowed() {
        let mut menu: Submenu<Recorder> = Submenu::new();
        assert!(matches!(press(&mut menu, InputKey::Ok), InputResult::Consumed));
    }

    #[test]
    fn window_follows_cursor() {
        let mut menu = menu_with(&["1", "2", "3", "4", "5", "6"]);
        for _ in 0..4 {
            press(&mut menu, InputKey::Down);
        }
        assert_eq!(menu.selected_item(), Some(5));
        assert_eq!(menu.window_position(), 1);

        press(&mut menu, InputKey::Down);
        press(&mut menu, InputKey::Down);
        assert_eq!(menu.selected_item(), Some(1));
        assert_eq!(menu.window_position(), 0);
    }

    #[test]
    fn header_shrinks_window() {
        let mut menu = menu_with(&["1", "2", "3", "4"]);
        menu.set_header("Pick one").unwrap();
        menu.set_selected_item(4);
        assert_eq!(menu.window_position(), 1);
        assert_eq!(menu.header(), Some("Pick one"));
    }

    #[test]
    fn set_selected_item_ignores_unknown_index() {
        let mut menu = menu_with(&["a", "b"]);
        menu.set_selected_item(2);
        menu.set_selected_item(42);
        assert_eq!(menu.selected_item(), Some(2));
    }

    #[test]
    fn reset_clears_everything() {
        let mut menu = menu_with(&["a", "b"]);
        menu.set_header("h").unwrap();
        press(&mut menu, InputKey::Down);
        menu.reset();
        assert!(menu.items().is_empty());
        assert_eq!(menu.header(), None);
        assert_eq!(menu.selected_item(), None);
    }

    #[test]
    fn draw_highlights_selected_row() {
        let menu = menu_with(&["Option 1", "Option 2", "Option 3"]);
        let mut canvas = Canvas::new();
        menu.draw(&mut canvas);

        let first = Rectangle::new(Point::new(0, 0), Size::new(ITEM_WIDTH, 15));
        let second = Rectangle::new(Point::new(0, 16), Size::new(ITEM_WIDTH, 15));
        // The highlight bar lights most of its row; plain text lights little.
        assert!(canvas.lit_pixels_in(&first) > canvas.lit_pixels_in(&second) * 3);
        assert!(canvas.lit_pixels_in(&second) > 0);
        // No row below the third item.
        let fourth = Rectangle::new(Point::new(0, 48), Size::new(ITEM_WIDTH, 16));
        assert_eq!(canvas.lit_pixels_in(&fourth), 0);
    }

    #[test]
    fn draw_shows_scrollbar_only_when_needed() {
        let short = menu_with(&["a", "b"]);
        let mut canvas = Canvas::new();
        short.draw(&mut canvas);
        let bar = Rectangle::new(Point::new(ITEM_WIDTH as i32 + 2, 0), Size::new(3, 64));
        assert_eq!(canvas.lit_pixels_in(&bar), 0);

        let long = menu_with(&["1", "2", "3", "4", "5"]);
        canvas.clear();
        long.draw(&mut canvas);
        assert!(canvas.lit_pixels_in(&bar) > 0);
    }
}
