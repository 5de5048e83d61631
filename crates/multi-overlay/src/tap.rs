//! macOS event tap feeding global key-downs to the [`Classifier`].
//!
//! The tap runs on the main run loop, so the callback shares the classifier
//! with the event loop through an `Rc<RefCell<..>>`. Consumed events return
//! `CallbackResult::Drop`, which the `core-graphics` crate maps to a NULL
//! event so the foreground app never sees the keystroke.

use std::{
    cell::{Cell, RefCell},
    ffi::c_void,
    ptr,
    rc::Rc,
};

use core_foundation::{
    base::TCFType,
    mach_port::CFMachPortRef,
    runloop::{CFRunLoop, CFRunLoopSource, kCFRunLoopCommonModes},
};
use core_graphics::event::{
    CGEvent, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventType,
    CallbackResult,
};
use foreign_types::ForeignType;
use mac_keycode::Modifiers;
use overlay_engine::{Classifier, Decision, Outcome};
use tao::event_loop::EventLoopProxy;
use tracing::{debug, trace, warn};

use crate::{Error, Result, app::UserEvent};

#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C" {
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
    fn CGEventKeyboardGetUnicodeString(
        event: *mut c_void,
        max_len: usize,
        actual_len: *mut usize,
        buf: *mut u16,
    );
}

const FIELD_KEYBOARD_EVENT_KEYCODE: u32 = 9;

/// An installed tap. Dropping it removes the tap.
pub struct KeyTap {
    _tap: CGEventTap<'static>,
    _source: CFRunLoopSource,
}

/// Install the tap on the current (main) run loop.
///
/// Fails when the process lacks Accessibility access.
pub fn install(
    classifier: Rc<RefCell<Classifier>>,
    proxy: EventLoopProxy<UserEvent>,
) -> Result<KeyTap> {
    let port: Rc<Cell<CFMachPortRef>> = Rc::new(Cell::new(ptr::null_mut()));
    let port_cb = port.clone();

    debug!("creating_event_tap");
    let tap = CGEventTap::new(
        CGEventTapLocation::Session,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::Default,
        vec![CGEventType::KeyDown],
        move |_proxy, etype, event| match etype {
            CGEventType::KeyDown => on_key_down(&classifier, &proxy, event),
            CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
                let p = port_cb.get();
                if !p.is_null() {
                    warn!("tap_disabled_by_os_reenabling");
                    unsafe { CGEventTapEnable(p, true) };
                }
                CallbackResult::Keep
            }
            _ => CallbackResult::Keep,
        },
    )
    .map_err(|()| {
        warn!("event_tap_create_failed");
        Error::Tap
    })?;
    port.set(tap.mach_port().as_concrete_TypeRef());

    let source = tap.mach_port().create_runloop_source(0).map_err(|()| {
        warn!("run_loop_source_create_failed");
        Error::Tap
    })?;
    let mode = unsafe { kCFRunLoopCommonModes };
    CFRunLoop::get_current().add_source(&source, mode);
    tap.enable();
    debug!("event_tap_started");

    Ok(KeyTap {
        _tap: tap,
        _source: source,
    })
}

fn on_key_down(
    classifier: &RefCell<Classifier>,
    proxy: &EventLoopProxy<UserEvent>,
    event: &CGEvent,
) -> CallbackResult {
    let key_code = event.get_integer_value_field(FIELD_KEYBOARD_EVENT_KEYCODE) as u16;
    let modifiers = Modifiers::from_cg_flags(event.get_flags().bits());
    let Ok(mut classifier) = classifier.try_borrow_mut() else {
        trace!(key_code, "classifier_busy_passing_key");
        return CallbackResult::Keep;
    };
    let chars = if classifier.is_capturing() {
        event_chars(event)
    } else {
        None
    };
    let outcome = classifier.on_key_down(modifiers, key_code, chars.as_deref());
    drop(classifier);

    let decision = outcome.decision();
    let user_event = match outcome {
        Outcome::Pass => None,
        Outcome::Action(action) => Some(UserEvent::Hotkey(action)),
        Outcome::Captured { target, label, .. } => Some(UserEvent::Captured { target, label }),
    };
    if let Some(ev) = user_event
        && proxy.send_event(ev).is_err()
    {
        trace!("event_loop_closed");
    }
    match decision {
        Decision::Pass => CallbackResult::Keep,
        Decision::Consume => CallbackResult::Drop,
    }
}

/// Characters the OS reports for a key event.
fn event_chars(event: &CGEvent) -> Option<String> {
    let mut buf = [0u16; 8];
    let mut len = 0usize;
    unsafe {
        CGEventKeyboardGetUnicodeString(
            event.as_ptr().cast(),
            buf.len(),
            &mut len,
            buf.as_mut_ptr(),
        );
    }
    let len = len.min(buf.len());
    (len > 0)
        .then(|| String::from_utf16(&buf[..len]).ok())
        .flatten()
}
