//! Per-button handler table
//!
//! Handlers are plain function pointers over the application context `C`.
//! The dispatcher copies a handler out of the registry before calling it,
//! so a handler is free to rewrite the registry (including its own slot);
//! the change applies to the next event drained.

use super::ButtonId;

/// Action bound to a button
pub type Action<C> = fn(&mut C);

/// Mapping from button to an optional action
///
/// An empty slot is a valid configuration meaning "ignore this button".
pub struct HandlerRegistry<C> {
    slots: [Option<Action<C>>; ButtonId::COUNT],
}

impl<C> Default for HandlerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for HandlerRegistry<C> {
    fn clone(&self) -> Self {
        Self { slots: self.slots }
    }
}

impl<C> HandlerRegistry<C> {
    /// Create a registry with no handlers
    pub const fn new() -> Self {
        Self {
            slots: [None; ButtonId::COUNT],
        }
    }

    /// Bind `action` to `button`, replacing any previous binding
    pub fn set(&mut self, button: ButtonId, action: Action<C>) {
        self.slots[button.index()] = Some(action);
    }

    /// Handler for `button`, if any
    pub fn get(&self, button: ButtonId) -> Option<Action<C>> {
        self.slots[button.index()]
    }

    /// Unbind `button`, returning the previous handler
    pub fn remove(&mut self, button: ButtonId) -> Option<Action<C>> {
        self.slots[button.index()].take()
    }

    /// Unbind every button
    pub fn clear(&mut self) {
        self.slots = [None; ButtonId::COUNT];
    }
}

/// Application context the dispatcher can deliver presses to
pub trait HandlerHost: Sized {
    /// The registry consulted for each accepted press
    fn handlers(&self) -> &HandlerRegistry<Self>;
}
