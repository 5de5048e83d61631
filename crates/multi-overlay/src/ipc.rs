//! Messages from the page scripts injected into the overlay web view.

use mac_keycode::Modifiers;
use overlay_engine::{WindowShortcut, window_shortcut};
use serde::Deserialize;
use tracing::trace;

/// Forwards Command/Control key presses to the app.
pub const KEY_FORWARD_SCRIPT: &str = r#"
window.addEventListener('keydown', function (e) {
  if (!(e.metaKey || e.ctrlKey)) { return; }
  var msg = { key: e.key || '', meta: e.metaKey, ctrl: e.ctrlKey, alt: e.altKey, shift: e.shiftKey };
  if (!e.altKey && /^[hqacxv]$/i.test(msg.key)) { e.preventDefault(); }
  window.ipc.postMessage(JSON.stringify(msg));
}, true);
"#;

/// Focuses the chat prompt after the window is shown.
pub const FOCUS_PROMPT_SCRIPT: &str = "document.querySelector('textarea')?.focus();";

#[derive(Debug, Deserialize)]
struct KeyMessage {
    key: String,
    #[serde(default)]
    meta: bool,
    #[serde(default)]
    ctrl: bool,
    #[serde(default)]
    alt: bool,
    #[serde(default)]
    shift: bool,
}

impl KeyMessage {
    fn modifiers(&self) -> Modifiers {
        let mut m = Modifiers::empty();
        m.set(Modifiers::COMMAND, self.meta);
        m.set(Modifiers::CONTROL, self.ctrl);
        m.set(Modifiers::OPTION, self.alt);
        m.set(Modifiers::SHIFT, self.shift);
        m
    }
}

/// Decode a key message posted by [`KEY_FORWARD_SCRIPT`].
pub fn parse_shortcut(body: &str) -> Option<WindowShortcut> {
    match serde_json::from_str::<KeyMessage>(body) {
        Ok(msg) => window_shortcut(msg.modifiers(), &msg.key),
        Err(e) => {
            trace!(error = %e, "ipc_message_ignored");
            None
        }
    }
}
