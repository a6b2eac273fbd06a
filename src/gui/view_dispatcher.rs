//! View dispatcher - shows one registered view at a time and runs the
//! application's event loop.
//!
//! The dispatcher does not own the views. It maps numeric view ids to
//! handles of type `K`, which the application context resolves to its
//! own view objects through [`ViewContext`]. Several ids may map to the
//! same handle.
//!
//! Callbacks receive the context as `&mut C`. View switches requested
//! from inside a view callback go through the custom event queue and are
//! performed on a later turn of the loop, never while a view is being
//! iterated.

use heapless::{Deque, Vec};

use super::input::{InputEvent, InputKey, InputSource, InputType};
use super::view::{InputResult, View};
use super::{Gui, ViewDispatcherType};
use crate::config::{CUSTOM_EVENT_QUEUE_DEPTH, MAX_VIEWS};
use crate::error::Error;

/// Called when Back is not consumed by the current view.
/// Return `false` to let the dispatcher stop on its own.
pub type NavigationEventCallback<C> = fn(&mut C) -> bool;

/// Called for every queued custom event. Return `true` if handled.
pub type CustomEventCallback<C> = fn(&mut C, u32) -> bool;

/// Run state of the event loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Allocated, `run` not entered yet.
    Idle,
    Running,
    /// `stop` was requested; no further turns.
    Stopped,
}

/// Application context driven by a [`ViewDispatcher`].
pub trait ViewContext: Sized {
    /// Handle the context uses to name one of its views.
    type View: Copy + PartialEq;

    fn gui(&self) -> &Gui;

    fn view_dispatcher(&mut self) -> &mut ViewDispatcher<Self, Self::View>;

    fn view(&self, view: Self::View) -> &dyn View<Self>;

    fn view_mut(&mut self, view: Self::View) -> &mut dyn View<Self>;
}

pub struct ViewDispatcher<C, K> {
    views: Vec<(u32, K), MAX_VIEWS>,
    current: Option<u32>,
    queue: Deque<u32, CUSTOM_EVENT_QUEUE_DEPTH>,
    navigation_event_callback: Option<NavigationEventCallback<C>>,
    custom_event_callback: Option<CustomEventCallback<C>>,
    attached: Option<ViewDispatcherType>,
    state: RunState,
    redraw: bool,
}

impl<C, K: Copy + PartialEq> ViewDispatcher<C, K> {
    pub const fn new() -> Self {
        Self {
            views: Vec::new(),
            current: None,
            queue: Deque::new(),
            navigation_event_callback: None,
            custom_event_callback: None,
            attached: None,
            state: RunState::Idle,
            redraw: false,
        }
    }

    /// Claim the GUI's view port on `layer`.
    pub fn attach_to_gui(&mut self, gui: &Gui, layer: ViewDispatcherType) -> Result<(), Error> {
        gui.add_view_port(layer)?;
        self.attached = Some(layer);
        self.redraw = true;
        Ok(())
    }

    pub fn attached(&self) -> Option<ViewDispatcherType> {
        self.attached
    }

    /// Register `view` under `id`. Does not show it.
    pub fn add_view(&mut self, id: u32, view: K) -> Result<(), Error> {
        if self.lookup(id).is_some() {
            return Err(Error::DuplicateView(id));
        }
        self.views
            .push((id, view))
            .map_err(|_| Error::TooManyViews)?;
        debug!("view_dispatcher: view {} added", id);
        Ok(())
    }

    /// Unregister `id`. Removing the displayed view leaves nothing shown.
    pub fn remove_view(&mut self, id: u32) -> Result<(), Error> {
        let position = self
            .views
            .iter()
            .position(|&(registered, _)| registered == id)
            .ok_or(Error::UnknownView(id))?;
        self.views.swap_remove(position);
        if self.current == Some(id) {
            self.current = None;
            self.redraw = true;
        }
        debug!("view_dispatcher: view {} removed", id);
        Ok(())
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn set_navigation_event_callback(&mut self, callback: NavigationEventCallback<C>) {
        self.navigation_event_callback = Some(callback);
    }

    pub fn set_custom_event_callback(&mut self, callback: CustomEventCallback<C>) {
        self.custom_event_callback = Some(callback);
    }

    /// Queue `event` for the custom event callback on a later turn.
    pub fn send_custom_event(&mut self, event: u32) -> Result<(), Error> {
        self.queue
            .push_back(event)
            .map_err(|_| Error::EventQueueFull)?;
        trace!("view_dispatcher: custom event {} queued", event);
        Ok(())
    }

    pub fn pending_custom_events(&self) -> usize {
        self.queue.len()
    }

    /// Display the view registered under `id` from now on.
    ///
    /// Only marks the switch; `enter`/`exit` hooks run through
    /// [`switch_to_view`] when a context is at hand.
    pub fn switch_to_view(&mut self, id: u32) -> Result<(), Error> {
        if self.lookup(id).is_none() {
            return Err(Error::UnknownView(id));
        }
        if self.current != Some(id) {
            debug!("view_dispatcher: switch to view {}", id);
        }
        self.current = Some(id);
        self.redraw = true;
        Ok(())
    }

    /// Id of the displayed view.
    pub fn current_view(&self) -> Option<u32> {
        self.current
    }

    fn current_handle(&self) -> Option<K> {
        self.current.and_then(|id| self.lookup(id))
    }

    fn lookup(&self, id: u32) -> Option<K> {
        self.views
            .iter()
            .find(|&&(registered, _)| registered == id)
            .map(|&(_, view)| view)
    }

    /// Ask the run loop to return after the current turn.
    pub fn stop(&mut self) {
        if self.state != RunState::Stopped {
            info!("view_dispatcher: stop requested");
        }
        self.state = RunState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Tear the dispatcher down and give the view port back.
    ///
    /// # Panics
    ///
    /// Every view must have been removed first. Freeing a dispatcher that
    /// still references views is a programming error.
    pub fn free(self, gui: &Gui) {
        assert!(
            self.views.is_empty(),
            "view dispatcher freed with views still registered"
        );
        if self.attached.is_some() {
            gui.remove_view_port();
        }
        debug!("view_dispatcher: freed");
    }
}

impl<C, K: Copy + PartialEq> Default for ViewDispatcher<C, K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Switch views with `exit`/`enter` hooks on the old and new view.
pub fn switch_to_view<C: ViewContext>(context: &mut C, id: u32) -> Result<(), Error> {
    let previous = context.view_dispatcher().current_handle();
    context.view_dispatcher().switch_to_view(id)?;
    let next = context.view_dispatcher().current_handle();
    if previous != next {
        if let Some(view) = previous {
            context.view_mut(view).exit();
        }
        if let Some(view) = next {
            context.view_mut(view).enter();
        }
    }
    Ok(())
}

/// Deliver every queued custom event, oldest first.
///
/// Events queued by the callbacks themselves are delivered in the same
/// pass.
pub fn process_custom_events<C: ViewContext>(context: &mut C) {
    while let Some(event) = context.view_dispatcher().queue.pop_front() {
        let callback = context.view_dispatcher().custom_event_callback;
        let Some(callback) = callback else {
            warn!("view_dispatcher: custom event {} dropped, no callback", event);
            continue;
        };
        if !callback(context, event) {
            debug!("view_dispatcher: custom event {} not handled", event);
        }
    }
}

/// Route one input event to the displayed view.
///
/// A short or long Back the view does not consume goes to the navigation
/// callback. Without a callback, or if it returns `false`, the
/// dispatcher stops.
pub fn handle_input<C: ViewContext>(context: &mut C, event: InputEvent) {
    trace!("view_dispatcher: input {:?}", event);

    let current = context.view_dispatcher().current_handle();
    let result = match current {
        Some(view) => context.view_mut(view).input(&event),
        None => InputResult::Ignored,
    };

    match result {
        InputResult::Callback(callback) => {
            context.view_dispatcher().redraw = true;
            callback.invoke(context);
        }
        InputResult::Consumed => context.view_dispatcher().redraw = true,
        InputResult::Ignored => {
            let navigates = matches!(event.kind, InputType::Short | InputType::Long);
            if event.key == InputKey::Back && navigates {
                let navigation = context.view_dispatcher().navigation_event_callback;
                let handled = match navigation {
                    Some(callback) => callback(context),
                    None => false,
                };
                if !handled {
                    context.view_dispatcher().stop();
                }
            }
        }
    }
}

/// Paint the displayed view into the GUI canvas if anything changed.
pub fn redraw<C: ViewContext>(context: &mut C) {
    let dispatcher = context.view_dispatcher();
    if dispatcher.attached.is_none() || !dispatcher.redraw {
        return;
    }
    dispatcher.redraw = false;
    let current = dispatcher.current_handle();

    let gui = context.gui();
    match current {
        Some(view) => {
            let view = context.view(view);
            gui.draw_frame(|canvas| view.draw(canvas));
        }
        None => gui.draw_frame(|_| {}),
    }
}

/// Run the event loop until [`ViewDispatcher::stop`] is called or the
/// input source closes.
///
/// Each turn delivers queued custom events, repaints, and then waits for
/// one input event.
pub async fn run<C, I>(context: &mut C, input: &mut I)
where
    C: ViewContext,
    I: InputSource,
{
    {
        let dispatcher = context.view_dispatcher();
        if dispatcher.state == RunState::Stopped {
            return;
        }
        dispatcher.state = RunState::Running;
    }
    info!("view_dispatcher: run");

    loop {
        process_custom_events(context);
        redraw(context);
        if !context.view_dispatcher().is_running() {
            break;
        }
        match input.next_event().await {
            Some(event) => handle_input(context, event),
            None => {
                warn!("view_dispatcher: input closed");
                context.view_dispatcher().stop();
            }
        }
    }

    info!("view_dispatcher: run loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::canvas::Canvas;
    use crate::gui::input::ScriptedInput;
    use crate::gui::view::Callback;
    use embassy_futures::block_on;
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    /// A view that records what it saw and paints one marker pixel.
    struct Probe {
        marker: Point,
        consumes: Option<InputKey>,
        fires_on: Option<InputKey>,
        entered: u32,
        exited: u32,
        inputs: u32,
    }

    impl Probe {
        fn new(marker: Point) -> Self {
            Self {
                marker,
                consumes: None,
                fires_on: None,
                entered: 0,
                exited: 0,
                inputs: 0,
            }
        }
    }

    impl<'g> View<Harness<'g>> for Probe {
        fn draw(&self, canvas: &mut Canvas) {
            Pixel(self.marker, BinaryColor::On).draw(canvas).unwrap();
        }

        fn input(&mut self, event: &InputEvent) -> InputResult<Harness<'g>> {
            self.inputs += 1;
            if self.fires_on == Some(event.key) && event.kind == InputType::Short {
                return InputResult::Callback(Callback::SubmenuItem {
                    callback: probe_fired,
                    index: 0,
                });
            }
            if self.consumes == Some(event.key) {
                return InputResult::Consumed;
            }
            InputResult::Ignored
        }

        fn enter(&mut self) {
            self.entered += 1;
        }

        fn exit(&mut self) {
            self.exited += 1;
        }
    }

    fn probe_fired(h: &mut Harness<'_>, _index: u32) {
        h.dispatcher.send_custom_event(0).unwrap();
    }

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Slot {
        A,
        B,
    }

    struct Harness<'g> {
        gui: &'g Gui,
        dispatcher: ViewDispatcher<Harness<'g>, Slot>,
        a: Probe,
        b: Probe,
        events: heapless::Vec<u32, 16>,
        navigations: u32,
        navigation_result: bool,
    }

    impl<'g> Harness<'g> {
        fn new(gui: &'g Gui) -> Self {
            let mut dispatcher: ViewDispatcher<Harness<'g>, Slot> = ViewDispatcher::new();
            dispatcher
                .attach_to_gui(gui, ViewDispatcherType::Fullscreen)
                .unwrap();
            dispatcher.add_view(0, Slot::A).unwrap();
            dispatcher.add_view(1, Slot::B).unwrap();
            dispatcher.add_view(2, Slot::B).unwrap();
            dispatcher.set_custom_event_callback(|h: &mut Harness<'g>, event| {
                let _ = h.events.push(event);
                switch_to_view(h, event).is_ok()
            });
            dispatcher.set_navigation_event_callback(|h: &mut Harness<'g>| {
                h.navigations += 1;
                if h.navigation_result {
                    h.dispatcher.stop();
                }
                h.navigation_result
            });
            Self {
                gui,
                dispatcher,
                a: Probe::new(Point::new(1, 1)),
                b: Probe::new(Point::new(2, 2)),
                events: heapless::Vec::new(),
                navigations: 0,
                navigation_result: true,
            }
        }
    }

    impl<'g> ViewContext for Harness<'g> {
        type View = Slot;

        fn gui(&self) -> &Gui {
            self.gui
        }

        fn view_dispatcher(&mut self) -> &mut ViewDispatcher<Self, Slot> {
            &mut self.dispatcher
        }

        fn view(&self, view: Slot) -> &dyn View<Self> {
            match view {
                Slot::A => &self.a,
                Slot::B => &self.b,
            }
        }

        fn view_mut(&mut self, view: Slot) -> &mut dyn View<Self> {
            match view {
                Slot::A => &mut self.a,
                Slot::B => &mut self.b,
            }
        }
    }

    #[test]
    fn add_view_rejects_duplicates_and_overflow() {
        let mut dispatcher: ViewDispatcher<(), u8> = ViewDispatcher::new();
        dispatcher.add_view(7, 0).unwrap();
        assert_eq!(dispatcher.add_view(7, 1), Err(Error::DuplicateView(7)));
        for id in 0..(MAX_VIEWS as u32 - 1) {
            dispatcher.add_view(100 + id, 0).unwrap();
        }
        assert_eq!(dispatcher.add_view(999, 0), Err(Error::TooManyViews));
    }

    #[test]
    fn switch_and_remove_unknown_views_fail() {
        let mut dispatcher: ViewDispatcher<(), u8> = ViewDispatcher::new();
        assert_eq!(dispatcher.switch_to_view(3), Err(Error::UnknownView(3)));
        assert_eq!(dispatcher.remove_view(3), Err(Error::UnknownView(3)));
        assert_eq!(dispatcher.current_view(), None);
    }

    #[test]
    fn removing_current_view_clears_it() {
        let mut dispatcher: ViewDispatcher<(), u8> = ViewDispatcher::new();
        dispatcher.add_view(1, 0).unwrap();
        dispatcher.switch_to_view(1).unwrap();
        assert_eq!(dispatcher.current_view(), Some(1));
        dispatcher.remove_view(1).unwrap();
        assert_eq!(dispatcher.current_view(), None);
        assert_eq!(dispatcher.view_count(), 0);
    }

    #[test]
    fn custom_event_queue_is_bounded() {
        let mut dispatcher: ViewDispatcher<(), u8> = ViewDispatcher::new();
        for event in 0..CUSTOM_EVENT_QUEUE_DEPTH as u32 {
            dispatcher.send_custom_event(event).unwrap();
        }
        assert_eq!(dispatcher.send_custom_event(99), Err(Error::EventQueueFull));
        assert_eq!(dispatcher.pending_custom_events(), CUSTOM_EVENT_QUEUE_DEPTH);
    }

    #[test]
    fn custom_events_are_delivered_in_order_and_switch_views() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        h.dispatcher.send_custom_event(1).unwrap();
        h.dispatcher.send_custom_event(0).unwrap();
        assert_eq!(h.dispatcher.current_view(), None);

        process_custom_events(&mut h);

        assert_eq!(h.events.as_slice(), &[1, 0]);
        assert_eq!(h.dispatcher.current_view(), Some(0));
        assert_eq!(h.dispatcher.pending_custom_events(), 0);
        assert_eq!(h.b.entered, 1);
        assert_eq!(h.b.exited, 1);
        assert_eq!(h.a.entered, 1);
    }

    #[test]
    fn ids_sharing_a_view_do_not_reenter_it() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        switch_to_view(&mut h, 1).unwrap();
        switch_to_view(&mut h, 2).unwrap();
        assert_eq!(h.dispatcher.current_view(), Some(2));
        assert_eq!(h.b.entered, 1);
        assert_eq!(h.b.exited, 0);
    }

    #[test]
    fn redraw_paints_current_view_once() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        switch_to_view(&mut h, 1).unwrap();

        redraw(&mut h);
        assert_eq!(gui.take_frame(|c| (c.pixel(2, 2), c.pixel(1, 1))), Some((true, false)));

        redraw(&mut h);
        assert_eq!(gui.take_frame(|_| ()), None);
    }

    #[test]
    fn unconsumed_back_reaches_navigation_callback() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        h.dispatcher.state = RunState::Running;
        switch_to_view(&mut h, 0).unwrap();

        handle_input(&mut h, InputEvent::new(InputKey::Back, InputType::Press));
        assert_eq!(h.navigations, 0);

        handle_input(&mut h, InputEvent::short(InputKey::Back));
        assert_eq!(h.navigations, 1);
        assert_eq!(h.dispatcher.run_state(), RunState::Stopped);
    }

    #[test]
    fn held_back_reaches_navigation_callback() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        h.dispatcher.state = RunState::Running;
        switch_to_view(&mut h, 1).unwrap();

        handle_input(&mut h, InputEvent::new(InputKey::Back, InputType::Press));
        handle_input(&mut h, InputEvent::long(InputKey::Back));
        assert_eq!(h.navigations, 1);
        assert_eq!(h.dispatcher.run_state(), RunState::Stopped);

        // Repeat and Release after the Long do not navigate again.
        handle_input(&mut h, InputEvent::new(InputKey::Back, InputType::Repeat));
        handle_input(&mut h, InputEvent::new(InputKey::Back, InputType::Release));
        assert_eq!(h.navigations, 1);
    }

    #[test]
    fn consumed_back_does_not_navigate() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        h.dispatcher.state = RunState::Running;
        h.a.consumes = Some(InputKey::Back);
        switch_to_view(&mut h, 0).unwrap();

        handle_input(&mut h, InputEvent::short(InputKey::Back));
        assert_eq!(h.navigations, 0);
        assert_eq!(h.a.inputs, 1);
        assert!(h.dispatcher.is_running());
    }

    #[test]
    fn navigation_callback_returning_false_stops_anyway() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        h.dispatcher.state = RunState::Running;
        h.navigation_result = false;

        handle_input(&mut h, InputEvent::short(InputKey::Back));
        assert_eq!(h.navigations, 1);
        assert_eq!(h.dispatcher.run_state(), RunState::Stopped);
    }

    #[test]
    fn view_callback_runs_with_context() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        h.dispatcher.state = RunState::Running;
        h.b.fires_on = Some(InputKey::Ok);
        switch_to_view(&mut h, 1).unwrap();

        handle_input(&mut h, InputEvent::short(InputKey::Ok));
        // The probe's callback queues custom event 0; nothing switches yet.
        assert_eq!(h.dispatcher.current_view(), Some(1));
        assert_eq!(h.dispatcher.pending_custom_events(), 1);

        process_custom_events(&mut h);
        assert_eq!(h.dispatcher.current_view(), Some(0));
    }

    #[test]
    fn run_loop_returns_after_back() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        h.b.fires_on = Some(InputKey::Ok);
        switch_to_view(&mut h, 1).unwrap();

        let mut input: ScriptedInput<12> = ScriptedInput::new();
        input.tap(InputKey::Ok).unwrap();
        input.tap(InputKey::Back).unwrap();
        input.tap(InputKey::Up).unwrap();

        block_on(run(&mut h, &mut input));

        assert_eq!(h.dispatcher.run_state(), RunState::Stopped);
        assert_eq!(h.dispatcher.current_view(), Some(0));
        assert_eq!(h.navigations, 1);
        // Up was never read.
        assert_eq!(input.remaining(), 3);
    }

    #[test]
    fn run_loop_returns_when_input_closes() {
        let gui = Gui::new();
        let mut h = Harness::new(&gui);
        let mut input: ScriptedInput<1> = ScriptedInput::new();
        block_on(run(&mut h, &mut input));
        assert_eq!(h.dispatcher.run_state(), RunState::Stopped);
    }

    #[test]
    fn free_releases_view_port() {
        let gui = Gui::new();
        let mut dispatcher: ViewDispatcher<(), u8> = ViewDispatcher::new();
        dispatcher
            .attach_to_gui(&gui, ViewDispatcherType::Fullscreen)
            .unwrap();
        dispatcher.add_view(0, 0).unwrap();
        dispatcher.remove_view(0).unwrap();
        dispatcher.free(&gui);
        assert_eq!(gui.view_port(), None);
    }

    #[test]
    #[should_panic(expected = "views still registered")]
    fn free_with_registered_views_is_fatal() {
        let gui = Gui::new();
        let mut dispatcher: ViewDispatcher<(), u8> = ViewDispatcher::new();
        dispatcher.add_view(0, 0).unwrap();
        dispatcher.free(&gui);
    }

    #[test]
    fn second_dispatcher_cannot_attach() {
        let gui = Gui::new();
        let mut first: ViewDispatcher<(), u8> = ViewDispatcher::new();
        let mut second: ViewDispatcher<(), u8> = ViewDispatcher::new();
        first
            .attach_to_gui(&gui, ViewDispatcherType::Fullscreen)
            .unwrap();
        assert_eq!(
            second.attach_to_gui(&gui, ViewDispatcherType::Fullscreen),
            Err(Error::GuiBusy)
        );
        assert_eq!(second.attached(), None);
    }
}
