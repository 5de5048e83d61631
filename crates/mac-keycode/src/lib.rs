//! mac-keycode: Virtual keycodes, modifier masks and key bindings for macOS.
//!
//! - `Key`: Enum of the macOS hardware virtual keycodes (`kVK_*`) we care about.
//! - `Modifiers`: Bit set over Shift/Control/Option/Command, using the same bit
//!   positions as `CGEventFlags` so OS flags can be masked directly.
//! - `KeyBinding`: A modifier mask plus a raw key code, as stored in the hotkey
//!   file and compared against incoming key-down events.
//!
//! Key codes are layout independent: they name a physical key position, not a
//! character. Human-readable labels therefore prefer the characters reported
//! by the OS for the event and fall back to the US layout symbol.

mod key;
pub use key::{Key, KeyCode};

mod modifiers;
pub use modifiers::Modifiers;

mod binding;
pub use binding::KeyBinding;
