//! Global key-down classification.
//!
//! The event tap hands every key-down to [`Classifier::on_key_down`] and
//! acts on the returned [`Outcome`]: consumed events never reach the
//! foreground app. The classifier owns the hotkey table and the capture
//! state; it never touches windows or menus.

use std::mem;

use mac_keycode::{KeyBinding, KeyCode, Modifiers};
use overlay_config::{ActionId, HotkeyStore};
use tracing::{debug, info, trace, warn};

use crate::Action;

/// What the tap should do with the OS event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Deliver the event to the foreground app.
    Pass,
    /// Swallow the event.
    Consume,
}

/// Result of classifying one key-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not a hotkey.
    Pass,
    /// A bound hotkey fired.
    Action(Action),
    /// The key was recorded as the new binding for `target`.
    Captured {
        /// The action that was rebound.
        target: ActionId,
        /// The recorded binding.
        binding: KeyBinding,
        /// Human-readable rendering of `binding`.
        label: String,
    },
}

impl Outcome {
    /// Whether the OS event should be swallowed.
    pub fn decision(&self) -> Decision {
        match self {
            Self::Pass => Decision::Pass,
            Self::Action(_) | Self::Captured { .. } => Decision::Consume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Capturing {
        target: ActionId,
        previous: Option<KeyBinding>,
    },
}

/// Idle / Capturing state machine over a [`HotkeyStore`].
#[derive(Debug)]
pub struct Classifier {
    store: HotkeyStore,
    state: State,
}

impl Classifier {
    /// Start idle over `store`.
    pub fn new(store: HotkeyStore) -> Self {
        Self {
            store,
            state: State::Idle,
        }
    }

    /// Classify a key-down.
    ///
    /// `modifiers` must already be masked to the tracked modifiers. `chars`
    /// is the text the OS reports for the event; it only feeds the capture
    /// label.
    pub fn on_key_down(
        &mut self,
        modifiers: Modifiers,
        key_code: KeyCode,
        chars: Option<&str>,
    ) -> Outcome {
        match mem::replace(&mut self.state, State::Idle) {
            State::Capturing { target, .. } => {
                let binding = KeyBinding {
                    modifiers,
                    key_code,
                };
                if let Err(e) = self.store.set(target.clone(), binding) {
                    warn!(error = %e.pretty(), "hotkey_persist_failed");
                }
                let label = binding.label(chars);
                info!(target = %target, binding = %label, "hotkey_captured");
                Outcome::Captured {
                    target,
                    binding,
                    label,
                }
            }
            State::Idle => match self.store.match_action(modifiers, key_code) {
                Some(id) => {
                    debug!(action = %id, key_code, mods = modifiers.bits(), "hotkey_matched");
                    Outcome::Action(Action::from(id))
                }
                None => {
                    trace!(key_code, mods = modifiers.bits(), "key_passed");
                    Outcome::Pass
                }
            },
        }
    }

    /// Make the next key-down the new binding for `target`.
    ///
    /// The target's current binding is disabled so the key being recorded
    /// cannot fire it. An unfinished capture for another target is abandoned
    /// and that target's binding restored.
    pub fn begin_capture(&mut self, target: ActionId) {
        self.restore_pending();
        let previous = self.store.disable(&target);
        debug!(target = %target, had_binding = previous.is_some(), "hotkey_capture_started");
        self.state = State::Capturing { target, previous };
    }

    /// Abandon a capture in progress, restoring the previous binding.
    pub fn cancel_capture(&mut self) {
        if self.restore_pending() {
            debug!("hotkey_capture_cancelled");
        }
    }

    fn restore_pending(&mut self) -> bool {
        match mem::replace(&mut self.state, State::Idle) {
            State::Capturing { target, previous } => {
                self.store.restore(target, previous);
                true
            }
            State::Idle => false,
        }
    }

    /// Whether the next key-down will be recorded.
    pub fn is_capturing(&self) -> bool {
        matches!(self.state, State::Capturing { .. })
    }

    /// The action being rebound, if any.
    pub fn capture_target(&self) -> Option<&ActionId> {
        match &self.state {
            State::Capturing { target, .. } => Some(target),
            State::Idle => None,
        }
    }

    /// The hotkey table.
    pub fn store(&self) -> &HotkeyStore {
        &self.store
    }
}
