//! Widget - a free-form panel built from text and button elements.
//!
//! Buttons sit on the bottom row and are bound to the Left, Ok and Right
//! keys. Every input type on a bound key reaches the button callback, so
//! the application decides what a Press, Short or Long means.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_5X7, FONT_5X8, FONT_6X13_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::{String, Vec};

use crate::config::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, WIDGET_BUTTON_LABEL_LEN, WIDGET_MAX_ELEMENTS, WIDGET_TEXT_LEN,
};
use crate::error::Error;
use crate::gui::canvas::Canvas;
use crate::gui::input::{InputEvent, InputKey};
use crate::gui::view::{ButtonCallback, Callback, GuiButtonType, InputResult, View};

const BUTTON_HEIGHT: u32 = 12;

/// Anchor of a text element relative to its point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// Bold, for headlines.
    Primary,
    Secondary,
    Keyboard,
    BigNumbers,
}

impl Font {
    fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Font::Primary => &FONT_6X13_BOLD,
            Font::Secondary => &FONT_5X8,
            Font::Keyboard => &FONT_5X7,
            Font::BigNumbers => &FONT_10X20,
        }
    }

    fn line_height(self) -> u32 {
        self.mono().character_size.height
    }
}

/// Placement shared by the text elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextPlacement {
    pub x: u8,
    pub y: u8,
    pub horizontal: Align,
    pub vertical: Align,
    pub font: Font,
}

pub enum WidgetElement<C> {
    /// Text that may span several `\n`-separated lines.
    StringMultiline {
        placement: TextPlacement,
        text: String<WIDGET_TEXT_LEN>,
    },
    /// A single line of text.
    String {
        placement: TextPlacement,
        text: String<WIDGET_TEXT_LEN>,
    },
    Button {
        button: GuiButtonType,
        label: String<WIDGET_BUTTON_LABEL_LEN>,
        callback: ButtonCallback<C>,
    },
}

pub struct Widget<C> {
    elements: Vec<WidgetElement<C>, WIDGET_MAX_ELEMENTS>,
}

impl<C> Widget<C> {
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Remove every element.
    pub fn reset(&mut self) {
        self.elements.clear();
    }

    pub fn add_string_multiline_element(
        &mut self,
        x: u8,
        y: u8,
        horizontal: Align,
        vertical: Align,
        font: Font,
        text: &str,
    ) -> Result<(), Error> {
        let text = String::try_from(text).map_err(|_| Error::TextTooLong)?;
        self.push(WidgetElement::StringMultiline {
            placement: TextPlacement {
                x,
                y,
                horizontal,
                vertical,
                font,
            },
            text,
        })
    }

    pub fn add_string_element(
        &mut self,
        x: u8,
        y: u8,
        horizontal: Align,
        vertical: Align,
        font: Font,
        text: &str,
    ) -> Result<(), Error> {
        let text = String::try_from(text).map_err(|_| Error::TextTooLong)?;
        self.push(WidgetElement::String {
            placement: TextPlacement {
                x,
                y,
                horizontal,
                vertical,
                font,
            },
            text,
        })
    }

    /// Add a button on the bottom row. Input on its key is routed to
    /// `callback`.
    pub fn add_button_element(
        &mut self,
        button: GuiButtonType,
        label: &str,
        callback: ButtonCallback<C>,
    ) -> Result<(), Error> {
        let label = String::try_from(label).map_err(|_| Error::TextTooLong)?;
        self.push(WidgetElement::Button {
            button,
            label,
            callback,
        })
    }

    pub fn elements(&self) -> &[WidgetElement<C>] {
        &self.elements
    }

    /// Text of every string element, in insertion order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements.iter().filter_map(|element| match element {
            WidgetElement::StringMultiline { text, .. } | WidgetElement::String { text, .. } => {
                Some(text.as_str())
            }
            WidgetElement::Button { .. } => None,
        })
    }

    /// Label of the button at `button`, if one was added.
    pub fn button_label(&self, button: GuiButtonType) -> Option<&str> {
        self.find_button(button).map(|(label, _)| label)
    }

    fn find_button(&self, wanted: GuiButtonType) -> Option<(&str, ButtonCallback<C>)> {
        self.elements.iter().find_map(|element| match element {
            WidgetElement::Button {
                button,
                label,
                callback,
            } if *button == wanted => Some((label.as_str(), *callback)),
            _ => None,
        })
    }

    fn push(&mut self, element: WidgetElement<C>) -> Result<(), Error> {
        self.elements
            .push(element)
            .map_err(|_| Error::TooManyElements)
    }
}

impl<C> Default for Widget<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn button_for_key(key: InputKey) -> Option<GuiButtonType> {
    match key {
        InputKey::Left => Some(GuiButtonType::Left),
        InputKey::Ok => Some(GuiButtonType::Center),
        InputKey::Right => Some(GuiButtonType::Right),
        _ => None,
    }
}

fn horizontal_alignment(align: Align) -> Alignment {
    match align {
        Align::Right => Alignment::Right,
        Align::Center => Alignment::Center,
        _ => Alignment::Left,
    }
}

fn draw_text(canvas: &mut Canvas, placement: &TextPlacement, text: &str, multiline: bool) {
    let font = placement.font;
    let character_style = MonoTextStyle::new(font.mono(), BinaryColor::On);
    let alignment = horizontal_alignment(placement.horizontal);
    let anchor = Point::new(placement.x as i32, placement.y as i32);

    if multiline {
        // Lay the block out from its top edge so vertical anchoring covers
        // every line, not just the first.
        let lines = text.split('\n').count() as i32;
        let height = lines * font.line_height() as i32;
        let top = match placement.vertical {
            Align::Center => anchor.y - height / 2,
            Align::Bottom => anchor.y - height,
            _ => anchor.y,
        };
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Top)
            .build();
        let _ = Text::with_text_style(
            text,
            Point::new(anchor.x, top),
            character_style,
            text_style,
        )
        .draw(canvas);
    } else {
        let baseline = match placement.vertical {
            Align::Center => Baseline::Middle,
            Align::Bottom => Baseline::Bottom,
            _ => Baseline::Top,
        };
        let line = text.split('\n').next().unwrap_or("");
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(baseline)
            .build();
        let _ = Text::with_text_style(line, anchor, character_style, text_style).draw(canvas);
    }
}

fn draw_button(canvas: &mut Canvas, button: GuiButtonType, label: &str) {
    let font = Font::Secondary.mono();
    let width = label.len() as u32 * font.character_size.width + 8;
    let top = (DISPLAY_HEIGHT - BUTTON_HEIGHT) as i32;
    let left = match button {
        GuiButtonType::Left => 0,
        GuiButtonType::Center => (DISPLAY_WIDTH as i32 - width as i32) / 2,
        GuiButtonType::Right => DISPLAY_WIDTH as i32 - width as i32,
    };

    let frame = Rectangle::new(Point::new(left, top), Size::new(width, BUTTON_HEIGHT));
    let _ = RoundedRectangle::with_equal_corners(frame, Size::new(3, 3))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(canvas);

    let style = MonoTextStyle::new(font, BinaryColor::Off);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let _ = Text::with_text_style(label, frame.center(), style, text_style).draw(canvas);
}

impl<C> View<C> for Widget<C> {
    fn draw(&self, canvas: &mut Canvas) {
        for element in &self.elements {
            match element {
                WidgetElement::StringMultiline { placement, text } => {
                    draw_text(canvas, placement, text, true)
                }
                WidgetElement::String { placement, text } => {
                    draw_text(canvas, placement, text, false)
                }
                WidgetElement::Button { button, label, .. } => draw_button(canvas, *button, label),
            }
        }
    }

    fn input(&mut self, event: &InputEvent) -> InputResult<C> {
        let Some(button) = button_for_key(event.key) else {
            return InputResult::Ignored;
        };
        match self.find_button(button) {
            Some((_, callback)) => {
                trace!("widget: {:?} button got {:?}", button, event.kind);
                InputResult::Callback(Callback::Button {
                    callback,
                    button,
                    kind: event.kind,
                })
            }
            None => InputResult::Ignored,
        }
    }
}
