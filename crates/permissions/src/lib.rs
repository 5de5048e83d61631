//! Permission checks for the global hotkey listener.
//!
//! The event tap that powers global hotkeys only receives keyboard events
//! when the process is trusted for Accessibility. This crate exposes:
//! - [`accessibility_ok`]: query without prompting.
//! - [`request_accessibility`]: query and ask the OS to show its dialog.
//! - [`wait_until`]: poll a probe until it succeeds or a deadline passes.
//!
//! Off macOS every check reports "not granted".
use std::{
    thread,
    time::{Duration, Instant},
};

use tracing::debug;

#[cfg(target_os = "macos")]
mod sys {
    use core_foundation::{
        base::TCFType,
        boolean::CFBoolean,
        dictionary::{CFDictionary, CFDictionaryRef},
        string::{CFString, CFStringRef},
    };

    #[link(name = "ApplicationServices", kind = "framework")]
    unsafe extern "C" {
        static kAXTrustedCheckOptionPrompt: CFStringRef;
        fn AXIsProcessTrusted() -> bool;
        fn AXIsProcessTrustedWithOptions(options: CFDictionaryRef) -> bool;
    }

    pub fn accessibility_ok() -> bool {
        unsafe { AXIsProcessTrusted() }
    }

    pub fn request_accessibility() -> bool {
        let key = unsafe { CFString::wrap_under_get_rule(kAXTrustedCheckOptionPrompt) };
        let options = CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);
        unsafe { AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef()) }
    }
}

#[cfg(not(target_os = "macos"))]
mod sys {
    pub fn accessibility_ok() -> bool {
        false
    }

    pub fn request_accessibility() -> bool {
        false
    }
}

/// Check the Accessibility permission without prompting.
pub fn accessibility_ok() -> bool {
    sys::accessibility_ok()
}

/// Check the Accessibility permission, asking the OS to show its grant
/// dialog when the process is not yet trusted.
pub fn request_accessibility() -> bool {
    sys::request_accessibility()
}

/// Poll `probe` every `interval` until it returns `true` or `max` has elapsed.
///
/// `on_poll` runs after each failed probe with the time waited so far. The
/// probe is always evaluated at least once. Returns the last probe result.
pub fn wait_until(
    mut probe: impl FnMut() -> bool,
    interval: Duration,
    max: Duration,
    mut on_poll: impl FnMut(Duration),
) -> bool {
    let start = Instant::now();
    loop {
        if probe() {
            return true;
        }
        let waited = start.elapsed();
        if waited >= max {
            debug!(waited_ms = waited.as_millis() as u64, "permission_wait_timeout");
            return false;
        }
        on_poll(waited);
        thread::sleep(interval.min(max - waited));
    }
}
