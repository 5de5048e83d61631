//! Overlay registry and hotkey table for multi-overlay.
//!
//! - [`OverlayRegistry`]: built-in overlays plus JSON declarations from the
//!   settings directory, in discovery order.
//! - [`HotkeyStore`]: the action → binding table, persisted to `hotkeys.json`.
//! - [`paths`]: settings directory resolution.

mod builtin;
mod error;
mod hotkeys;
mod overlay;
pub mod paths;
mod registry;

pub use builtin::{DEFAULT_SELECTOR_BINDING, builtin_overlays};
pub use error::{Error, Result};
pub use hotkeys::{ActionId, HotkeyEntry, HotkeyStore};
pub use mac_keycode::{Key, KeyBinding, KeyCode, Modifiers};
pub use overlay::{OverlayDefinition, parse_declaration};
pub use registry::OverlayRegistry;
