//! GUI service - the host side the application is built against.
//!
//! The service is published as a named record. Applications open the
//! record, attach a [`view_dispatcher::ViewDispatcher`] to its single
//! view port and let the dispatcher paint the current view into the
//! shared [`canvas::Canvas`]. The display front-end picks finished frames
//! up with [`Gui::take_frame`].
//!
//! ## Components
//!
//! - **Canvas**: 128×64 1-bpp frame
//! - **Input**: key events and input sources
//! - **View dispatcher**: view registry, custom event queue, run loop
//! - **Modules**: Submenu and Widget views

pub mod canvas;
pub mod input;
pub mod modules;
pub mod view;
pub mod view_dispatcher;

use core::cell::{Cell, RefCell};

use canvas::Canvas;

use crate::error::Error;

/// Record name under which the GUI service is published.
pub const RECORD_GUI: &str = "gui";

/// Layer a view dispatcher occupies once attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewDispatcherType {
    /// Below system overlays (status bar stays visible).
    Desktop,
    /// Framed window.
    Window,
    /// Whole screen.
    Fullscreen,
}

/// The GUI service. Owned by the firmware (or a test) and shared by
/// reference with applications.
pub struct Gui {
    canvas: RefCell<Canvas>,
    open_handles: Cell<u8>,
    view_port: Cell<Option<ViewDispatcherType>>,
    frame_pending: Cell<bool>,
}

impl Gui {
    pub const fn new() -> Self {
        Self {
            canvas: RefCell::new(Canvas::new()),
            open_handles: Cell::new(0),
            view_port: Cell::new(None),
            frame_pending: Cell::new(false),
        }
    }

    /// Open the record `name`. Only [`RECORD_GUI`] is published.
    pub fn open_record(&self, name: &str) -> Result<GuiHandle<'_>, Error> {
        if name != RECORD_GUI {
            warn!("gui: no record named {}", name);
            return Err(Error::RecordNotFound);
        }
        self.open_handles.set(self.open_handles.get().saturating_add(1));
        debug!("gui: record opened ({} open)", self.open_handles.get());
        Ok(GuiHandle { gui: self })
    }

    /// Number of record handles currently open.
    pub fn open_handles(&self) -> u8 {
        self.open_handles.get()
    }

    /// Claim the view port for a dispatcher.
    pub fn add_view_port(&self, layer: ViewDispatcherType) -> Result<(), Error> {
        if self.view_port.get().is_some() {
            return Err(Error::GuiBusy);
        }
        self.view_port.set(Some(layer));
        info!("gui: view port attached ({:?})", layer);
        Ok(())
    }

    /// Release the view port. Drops the last frame so a stale picture is
    /// never presented after the owner is gone.
    pub fn remove_view_port(&self) {
        if self.view_port.take().is_some() {
            info!("gui: view port detached");
        }
        self.canvas.borrow_mut().clear();
        self.frame_pending.set(true);
    }

    /// Layer of the attached dispatcher, if any.
    pub fn view_port(&self) -> Option<ViewDispatcherType> {
        self.view_port.get()
    }

    /// Clear the canvas, let `paint` draw a frame and mark it pending.
    pub fn draw_frame<F>(&self, paint: F)
    where
        F: FnOnce(&mut Canvas),
    {
        let mut canvas = self.canvas.borrow_mut();
        canvas.clear();
        paint(&mut canvas);
        self.frame_pending.set(true);
    }

    /// Hand the pending frame (if any) to `present`, once.
    pub fn take_frame<R, F>(&self, present: F) -> Option<R>
    where
        F: FnOnce(&Canvas) -> R,
    {
        if !self.frame_pending.replace(false) {
            return None;
        }
        Some(present(&self.canvas.borrow()))
    }

    /// Read access to the current frame, pending or not.
    pub fn with_canvas<R, F>(&self, read: F) -> R
    where
        F: FnOnce(&Canvas) -> R,
    {
        read(&self.canvas.borrow())
    }

    fn release(&self) {
        self.open_handles.set(self.open_handles.get().saturating_sub(1));
        debug!("gui: record closed ({} open)", self.open_handles.get());
    }
}

impl Default for Gui {
    fn default() -> Self {
        Self::new()
    }
}

/// An open handle on the GUI record. Released on drop.
pub struct GuiHandle<'a> {
    gui: &'a Gui,
}

impl<'a> GuiHandle<'a> {
    pub fn gui(&self) -> &'a Gui {
        self.gui
    }

    /// Release the record explicitly.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for GuiHandle<'_> {
    fn drop(&mut self) {
        self.gui.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    #[test]
    fn open_and_close_record() {
        let gui = Gui::new();
        let first = gui.open_record(RECORD_GUI).unwrap();
        let second = gui.open_record(RECORD_GUI).unwrap();
        assert_eq!(gui.open_handles(), 2);
        first.close();
        assert_eq!(gui.open_handles(), 1);
        drop(second);
        assert_eq!(gui.open_handles(), 0);
    }

    #[test]
    fn unknown_record_is_rejected() {
        let gui = Gui::new();
        assert_eq!(gui.open_record("storage").err(), Some(Error::RecordNotFound));
        assert_eq!(gui.open_handles(), 0);
    }

    #[test]
    fn view_port_is_exclusive() {
        let gui = Gui::new();
        gui.add_view_port(ViewDispatcherType::Fullscreen).unwrap();
        assert_eq!(
            gui.add_view_port(ViewDispatcherType::Window),
            Err(Error::GuiBusy)
        );
        assert_eq!(gui.view_port(), Some(ViewDispatcherType::Fullscreen));

        gui.remove_view_port();
        assert_eq!(gui.view_port(), None);
        gui.add_view_port(ViewDispatcherType::Window).unwrap();
    }

    #[test]
    fn frames_are_taken_once() {
        let gui = Gui::new();
        assert_eq!(gui.take_frame(|c| c.lit_pixels()), None);

        gui.draw_frame(|canvas| {
            Pixel(Point::new(3, 4), BinaryColor::On).draw(canvas).unwrap();
        });
        assert_eq!(gui.take_frame(|c| c.lit_pixels()), Some(1));
        assert_eq!(gui.take_frame(|c| c.lit_pixels()), None);
        assert!(gui.with_canvas(|c| c.pixel(3, 4)));
    }

    #[test]
    fn draw_frame_starts_from_blank() {
        let gui = Gui::new();
        gui.draw_frame(|canvas| {
            Pixel(Point::new(0, 0), BinaryColor::On).draw(canvas).unwrap();
        });
        gui.draw_frame(|_| {});
        assert!(gui.with_canvas(|c| c.is_blank()));
    }

    #[test]
    fn removing_view_port_blanks_the_frame() {
        let gui = Gui::new();
        gui.add_view_port(ViewDispatcherType::Fullscreen).unwrap();
        gui.draw_frame(|canvas| {
            Pixel(Point::new(1, 1), BinaryColor::On).draw(canvas).unwrap();
        });
        gui.remove_view_port();
        assert_eq!(gui.take_frame(|c| c.is_blank()), Some(true));
    }
}
