//! Input events and input sources.

use heapless::Deque;

/// Physical keys of the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputKey {
    Up,
    Down,
    Right,
    Left,
    Ok,
    Back,
}

/// What happened to a key.
///
/// A complete press produces `Press`, then `Long` and zero or more
/// `Repeat` while the key stays held, then `Release`, and finally
/// `Short` if no `Long` was emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputType {
    Press,
    Release,
    Short,
    Long,
    Repeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEvent {
    pub key: InputKey,
    pub kind: InputType,
}

impl InputEvent {
    pub const fn new(key: InputKey, kind: InputType) -> Self {
        Self { key, kind }
    }

    pub const fn short(key: InputKey) -> Self {
        Self::new(key, InputType::Short)
    }

    pub const fn long(key: InputKey) -> Self {
        Self::new(key, InputType::Long)
    }
}

/// Source of input events for the view dispatcher's run loop.
pub trait InputSource {
    /// Wait for the next event. `None` means the source is closed and the
    /// run loop should return.
    async fn next_event(&mut self) -> Option<InputEvent>;
}

/// Pre-recorded input, replayed in order. Closes once empty.
pub struct ScriptedInput<const N: usize> {
    events: Deque<InputEvent, N>,
}

impl<const N: usize> ScriptedInput<N> {
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
        }
    }

    /// Queue one event. Returns the event back if the script is full.
    pub fn push(&mut self, event: InputEvent) -> Result<(), InputEvent> {
        self.events.push_back(event)
    }

    /// Queue a full Press/Release/Short sequence for `key`.
    pub fn tap(&mut self, key: InputKey) -> Result<(), InputEvent> {
        self.push(InputEvent::new(key, InputType::Press))?;
        self.push(InputEvent::new(key, InputType::Release))?;
        self.push(InputEvent::short(key))
    }

    /// Queue a Press/Long/Release sequence for `key` (no Short follows).
    pub fn hold(&mut self, key: InputKey) -> Result<(), InputEvent> {
        self.push(InputEvent::new(key, InputType::Press))?;
        self.push(InputEvent::long(key))?;
        self.push(InputEvent::new(key, InputType::Release))
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl<const N: usize> Default for ScriptedInput<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> InputSource for ScriptedInput<N> {
    async fn next_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}
