//! Overlay Engine
//!
//! The engine is the platform-independent core of multi-overlay:
//! - [`Classifier`]: decides, per global key-down, whether to fire an
//!   action, record a new binding, or let the key through
//! - [`SessionController`]: tracks the current overlay and window visibility
//!   and drives a [`Surface`]
//! - [`window_shortcut`]: in-window Command/Control shortcuts, text edits
//!   included
//!
//! OS integration (event tap, window, web view, tray) lives in the app crate
//! and talks to the engine only through these types.

mod action;
mod classifier;
mod error;
mod session;
mod shortcut;
mod surface;
pub mod test_support;

pub use action::Action;
pub use classifier::{Classifier, Decision, Outcome};
pub use error::{Error, Result};
pub use session::SessionController;
pub use shortcut::{EditAction, WindowShortcut, window_shortcut};
pub use surface::{SelectorEntry, Surface};
