//! Submenu and Widget application.
//!
//! Shows a menu of three options. Choosing one fills the panel with
//! "Option N selected" and a center "Back" button; short-pressing that
//! button returns to the menu. Back from any screen exits.
//!
//! All view switches go through the dispatcher's custom event queue. The
//! event value is the [`ViewIndex`] to show.

use crate::error::Error;
use crate::gui::input::{InputSource, InputType};
use crate::gui::modules::{Align, Font, Submenu, Widget};
use crate::gui::view::{GuiButtonType, View};
use crate::gui::view_dispatcher::{self, RunState, ViewContext, ViewDispatcher};
use crate::gui::{Gui, GuiHandle, ViewDispatcherType, RECORD_GUI};


/// Ids the views are registered under. Also the custom event payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum ViewIndex {
    Submenu = 0,
    Widget1 = 1,
    Widget2 = 2,
    Widget3 = 3,
}

impl ViewIndex {
    /// Number of view ids. Custom events must stay below this.
    pub const COUNT: u32 = 4;
}

impl TryFrom<u32> for ViewIndex {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Error> {
        match value {
            0 => Ok(ViewIndex::Submenu),
            1 => Ok(ViewIndex::Widget1),
            2 => Ok(ViewIndex::Widget2),
            3 => Ok(ViewIndex::Widget3),
            other => Err(Error::UnknownView(other)),
        }
    }
}

/// Indices of the menu entries. `Back` is reserved and never added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum MenuItem {
    Back = 0,
    Option1 = 1,
    Option2 = 2,
    Option3 = 3,
}

impl MenuItem {
    pub const OPTIONS: [MenuItem; 3] = [MenuItem::Option1, MenuItem::Option2, MenuItem::Option3];

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(MenuItem::Back),
            1 => Some(MenuItem::Option1),
            2 => Some(MenuItem::Option2),
            3 => Some(MenuItem::Option3),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Back => "Back",
            MenuItem::Option1 => "Option 1",
            MenuItem::Option2 => "Option 2",
            MenuItem::Option3 => "Option 3",
        }
    }

    /// Panel an option leads to and the text shown there.
    fn panel(self) -> Option<(ViewIndex, &'static str)> {
        match self {
            MenuItem::Back => None,
            MenuItem::Option1 => Some((ViewIndex::Widget1, "Option 1 selected")),
            MenuItem::Option2 => Some((ViewIndex::Widget2, "Option 2 selected")),
            MenuItem::Option3 => Some((ViewIndex::Widget3, "Option 3 selected")),
        }
    }
}

/// The app's two view objects. All three widget ids resolve to `Widget`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Submenu,
    Widget,
}

/// Screen the application is on, derived from the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppState {
    /// Allocated, nothing shown yet.
    Idle,
    ShowingMenu,
    ShowingPanel1,
    ShowingPanel2,
    ShowingPanel3,
    /// Back was pressed; the run loop is over.
    Terminated,
}

pub struct App<'g> {
    view_dispatcher: ViewDispatcher<App<'g>, AppView>,
    widget: Widget<App<'g>>,
    submenu: Submenu<App<'g>>,
    gui: GuiHandle<'g>,
}

impl<'g> App<'g> {
    /// Open the GUI record, build both views and register them.
    /// Nothing is shown until [`App::start`].
    pub fn alloc(gui: &'g Gui) -> Result<Self, Error> {
        let gui = gui.open_record(RECORD_GUI)?;

        let mut submenu = Submenu::new();
        for item in MenuItem::OPTIONS {
            submenu.add_item(item.label(), item as u32, app_submenu_callback)?;
        }

        let widget = Widget::new();

        let mut view_dispatcher = ViewDispatcher::new();
        attach_views(&mut view_dispatcher, gui.gui())?;

        view_dispatcher.set_custom_event_callback(app_custom_event_callback);
        view_dispatcher.set_navigation_event_callback(app_navigation_callback);

        info!("app: allocated");
        Ok(Self {
            view_dispatcher,
            widget,
            submenu,
            gui,
        })
    }

    /// Show the menu.
    pub fn start(&mut self) -> Result<(), Error> {
        view_dispatcher::switch_to_view(self, ViewIndex::Submenu as u32)
    }

    /// Run the event loop until Back stops it or `input` closes.
    pub async fn run<I: InputSource>(&mut self, input: &mut I) {
        view_dispatcher::run(self, input).await;
    }

    pub fn state(&self) -> AppState {
        if self.view_dispatcher.run_state() == RunState::Stopped {
            return AppState::Terminated;
        }
        match self.view_dispatcher.current_view().map(ViewIndex::try_from) {
            Some(Ok(ViewIndex::Submenu)) => AppState::ShowingMenu,
            Some(Ok(ViewIndex::Widget1)) => AppState::ShowingPanel1,
            Some(Ok(ViewIndex::Widget2)) => AppState::ShowingPanel2,
            Some(Ok(ViewIndex::Widget3)) => AppState::ShowingPanel3,
            Some(Err(_)) | None => AppState::Idle,
        }
    }

    pub fn widget(&self) -> &Widget<App<'g>> {
        &self.widget
    }

    pub fn submenu(&self) -> &Submenu<App<'g>> {
        &self.submenu
    }

    /// Tear down in dependency order: views out of the dispatcher, the
    /// dispatcher, the views, then the GUI record.
    pub fn free(self) {
        let Self {
            mut view_dispatcher,
            widget,
            submenu,
            gui,
        } = self;

        for id in [
            ViewIndex::Widget1,
            ViewIndex::Widget2,
            ViewIndex::Widget3,
            ViewIndex::Submenu,
        ] {
            if let Err(error) = view_dispatcher.remove_view(id as u32) {
                warn!("app: removing view {:?} failed: {:?}", id, error);
            }
        }

        view_dispatcher.free(gui.gui());
        drop(widget);
        drop(submenu);
        gui.close();
        info!("app: freed");
    }

    fn show_selection(&mut self, view: ViewIndex, text: &str) -> Result<(), Error> {
        self.widget.add_string_multiline_element(
            64,
            32,
            Align::Center,
            Align::Center,
            Font::Secondary,
            text,
        )?;
        self.widget
            .add_button_element(GuiButtonType::Center, "Back", app_button_callback)?;
        self.view_dispatcher.send_custom_event(view as u32)
    }
}

impl<'g> ViewContext for App<'g> {
    type View = AppView;

    fn gui(&self) -> &Gui {
        self.gui.gui()
    }

    fn view_dispatcher(&mut self) -> &mut ViewDispatcher<Self, AppView> {
        &mut self.view_dispatcher
    }

    fn view(&self, view: AppView) -> &dyn View<Self> {
        match view {
            AppView::Submenu => &self.submenu,
            AppView::Widget => &self.widget,
        }
    }

    fn view_mut(&mut self, view: AppView) -> &mut dyn View<Self> {
        match view {
            AppView::Submenu => &mut self.submenu,
            AppView::Widget => &mut self.widget,
        }
    }
}

/// Attach fullscreen and register every view id. The view port is given
/// back if registration fails, so a later app can still attach.
fn attach_views(
    view_dispatcher: &mut ViewDispatcher<App<'_>, AppView>,
    gui: &Gui,
) -> Result<(), Error> {
    view_dispatcher.attach_to_gui(gui, ViewDispatcherType::Fullscreen)?;

    let registered = [
        (ViewIndex::Submenu, AppView::Submenu),
        (ViewIndex::Widget1, AppView::Widget),
        (ViewIndex::Widget2, AppView::Widget),
        (ViewIndex::Widget3, AppView::Widget),
    ]
    .into_iter()
    .try_for_each(|(id, view)| view_dispatcher.add_view(id as u32, view));

    if let Err(error) = registered {
        error!("app: registering views failed: {:?}", error);
        gui.remove_view_port();
        return Err(error);
    }
    Ok(())
}

/// Back was not consumed by the displayed view: exit.
fn app_navigation_callback(app: &mut App<'_>) -> bool {
    info!("app: back, stopping");
    app.view_dispatcher.stop();
    true
}

/// The only place views are switched.
fn app_custom_event_callback(app: &mut App<'_>, event: u32) -> bool {
    assert!(
        event < ViewIndex::COUNT,
        "custom event {} is not a view index",
        event
    );
    if let Err(error) = view_dispatcher::switch_to_view(app, event) {
        error!("app: switch to view {} failed: {:?}", event, error);
    }
    true
}

fn app_button_callback(app: &mut App<'_>, button: GuiButtonType, kind: InputType) {
    if button != GuiButtonType::Center || kind != InputType::Short {
        return;
    }
    if let Err(error) = app
        .view_dispatcher
        .send_custom_event(ViewIndex::Submenu as u32)
    {
        error!("app: cannot return to menu: {:?}", error);
    }
}

/// The panel is cleared on every activation, even for an index that
/// leads nowhere.
fn app_submenu_callback(app: &mut App<'_>, index: u32) {
    app.widget.reset();

    let Some((view, text)) = MenuItem::from_index(index).and_then(MenuItem::panel) else {
        warn!("app: menu index {} has no panel", index);
        return;
    };
    debug!("app: menu index {} selected", index);
    if let Err(error) = app.show_selection(view, text) {
        error!("app: cannot show selection {}: {:?}", index, error);
    }
}

/// Application entry point. `_args` is accepted and ignored.
///
/// # Panics
///
/// If the application cannot be allocated.
pub async fn submenu_and_widget_app_main<I: InputSource>(
    gui: &Gui,
    input: &mut I,
    _args: Option<&str>,
) -> i32 {
    let mut app = match App::alloc(gui) {
        Ok(app) => app,
        Err(error) => panic!("submenu_and_widget_app: alloc failed: {:?}", error),
    };

    if let Err(error) = app.start() {
        error!("app: cannot show menu: {:?}", error);
    }
    app.run(input).await;
    app.free();

    0
}
