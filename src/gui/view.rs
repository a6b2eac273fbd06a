//! The view abstraction shared by all GUI modules.
//!
//! Views are owned by the application context `C`. A view never calls
//! back into `C` while it is borrowed: input handling returns the
//! callback to run, and the dispatcher invokes it with `&mut C` once the
//! view borrow has ended.

use super::canvas::Canvas;
use super::input::{InputEvent, InputType};

/// Activation callback of a submenu item: `(context, item index)`.
pub type SubmenuItemCallback<C> = fn(&mut C, u32);

/// Callback of a widget button: `(context, button, input type)`.
pub type ButtonCallback<C> = fn(&mut C, GuiButtonType, InputType);

/// Position of a widget button on the bottom row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuiButtonType {
    Left,
    Center,
    Right,
}

/// A deferred call into the application context.
pub enum Callback<C> {
    SubmenuItem {
        callback: SubmenuItemCallback<C>,
        index: u32,
    },
    Button {
        callback: ButtonCallback<C>,
        button: GuiButtonType,
        kind: InputType,
    },
}

impl<C> Callback<C> {
    pub fn invoke(self, context: &mut C) {
        match self {
            Callback::SubmenuItem { callback, index } => callback(context, index),
            Callback::Button {
                callback,
                button,
                kind,
            } => callback(context, button, kind),
        }
    }
}

/// Outcome of offering an input event to a view.
pub enum InputResult<C> {
    /// Not handled; the dispatcher may apply its own navigation.
    Ignored,
    /// Handled inside the view.
    Consumed,
    /// Handled, and the application callback must run.
    Callback(Callback<C>),
}

impl<C> InputResult<C> {
    pub fn is_consumed(&self) -> bool {
        !matches!(self, InputResult::Ignored)
    }
}

/// Something the dispatcher can show and route input to.
pub trait View<C> {
    /// Paint the view. The canvas is already cleared.
    fn draw(&self, canvas: &mut Canvas);

    fn input(&mut self, event: &InputEvent) -> InputResult<C>;

    /// Called when the view becomes the displayed one.
    fn enter(&mut self) {}

    /// Called when the view stops being displayed.
    fn exit(&mut self) {}
}
