//! The floating overlay window: a borderless tao window hosting a wry web
//! view, driven through [`Surface`].

use std::path::PathBuf;

use objc2::{rc::Retained, sel};
use objc2_app_kit::{NSApplication, NSEvent, NSMenu};
use objc2_foundation::MainThreadMarker;
use overlay_engine::{EditAction, SelectorEntry, Surface};
use tao::{
    dpi::{LogicalPosition, LogicalSize},
    event_loop::{EventLoopProxy, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};
use tracing::{debug, trace, warn};
use tray_icon::menu::{ContextMenu, Menu, MenuId};
use wry::{WebView, WebViewBuilder, http::Request};

use crate::{Error, Result, app::UserEvent, ipc, menu::icon_roots, tray::overlay_item};

/// Sites serve their full desktop UI to Safari.
const SAFARI_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15";

/// Initial window frame, in points.
const WINDOW_FRAME: (f64, f64, f64, f64) = (500.0, 200.0, 550.0, 580.0);

/// The overlay window and its web view.
pub struct OverlayWindow {
    window: Window,
    webview: WebView,
    icon_roots: Vec<PathBuf>,
    selector_menu: Option<Menu>,
    selector_ids: Vec<(MenuId, String)>,
}

impl OverlayWindow {
    /// Create the hidden window and an empty web view.
    pub fn new(
        target: &EventLoopWindowTarget<UserEvent>,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Result<Self> {
        let (x, y, width, height) = WINDOW_FRAME;
        let window = WindowBuilder::new()
            .with_title("Multi-Overlay")
            .with_inner_size(LogicalSize::new(width, height))
            .with_position(LogicalPosition::new(x, y))
            .with_decorations(false)
            .with_resizable(true)
            .with_always_on_top(true)
            .with_visible_on_all_workspaces(true)
            .with_visible(false)
            .build(target)
            .map_err(|e| Error::Startup {
                message: format!("could not create the overlay window: {e}"),
            })?;

        let webview = WebViewBuilder::new()
            .with_user_agent(SAFARI_USER_AGENT)
            .with_initialization_script(ipc::KEY_FORWARD_SCRIPT)
            .with_ipc_handler(move |req: Request<String>| {
                if let Some(shortcut) = ipc::parse_shortcut(req.body())
                    && proxy.send_event(UserEvent::Shortcut(shortcut)).is_err()
                {
                    trace!("event_loop_closed");
                }
            })
            .build(&window)
            .map_err(|e| Error::Startup {
                message: format!("could not create the web view: {e}"),
            })?;

        Ok(Self {
            window,
            webview,
            icon_roots: icon_roots(),
            selector_menu: None,
            selector_ids: Vec::new(),
        })
    }

    /// The overlay id behind a selector menu pick.
    pub fn selector_pick(&self, id: &MenuId) -> Option<String> {
        self.selector_ids
            .iter()
            .find(|(mid, _)| mid == id)
            .map(|(_, overlay)| overlay.clone())
    }

    /// Send a standard edit action down the responder chain, where the
    /// focused web view picks it up.
    pub fn perform_edit(&self, edit: EditAction) {
        let Some(mtm) = MainThreadMarker::new() else {
            return;
        };
        let action = match edit {
            EditAction::SelectAll => sel!(selectAll:),
            EditAction::Copy => sel!(copy:),
            EditAction::Cut => sel!(cut:),
            EditAction::Paste => sel!(paste:),
        };
        let app = NSApplication::sharedApplication(mtm);
        #[allow(unused_unsafe)]
        let handled = unsafe { app.sendAction_to_from(action, None, None) };
        trace!(?edit, handled, "edit_action_sent");
    }
}

impl Surface for OverlayWindow {
    fn navigate(&mut self, url: &str) {
        debug!(url, "webview_navigate");
        if let Err(e) = self.webview.load_url(url) {
            warn!(url, error = %e, "webview_navigate_failed");
        }
    }

    fn show(&mut self) {
        self.window.set_visible(true);
        activate_app();
        self.window.set_focus();
        if let Err(e) = self.webview.focus() {
            trace!(error = %e, "webview_focus_failed");
        }
        if let Err(e) = self.webview.evaluate_script(ipc::FOCUS_PROMPT_SCRIPT) {
            trace!(error = %e, "focus_prompt_failed");
        }
    }

    fn hide(&mut self) {
        hide_app();
    }

    fn is_focused(&self) -> bool {
        self.window.is_focused()
    }

    fn present_selector(&mut self, entries: &[SelectorEntry]) {
        let menu = Menu::new();
        self.selector_ids.clear();
        for entry in entries {
            let item = overlay_item(&entry.name, &entry.icon_ref, &self.icon_roots);
            self.selector_ids.push((item.id().clone(), entry.id.clone()));
            let _ = menu.append(item.as_ref());
        }
        pop_up_at_cursor(&menu);
        self.selector_menu = Some(menu);
    }

    fn clear_site_data(&mut self) {
        if let Err(e) = self.webview.clear_all_browsing_data() {
            warn!(error = %e, "clear_browsing_data_failed");
        }
    }
}

/// Show `menu` at the mouse location, independent of any window.
fn pop_up_at_cursor(menu: &Menu) {
    let ptr = menu.ns_menu().cast::<NSMenu>();
    // SAFETY: muda owns the NSMenu and keeps it alive for the lifetime of `menu`.
    let Some(ns_menu) = (unsafe { Retained::retain(ptr) }) else {
        warn!("selector_menu_unavailable");
        return;
    };
    #[allow(unused_unsafe)]
    let _shown = unsafe {
        let location = NSEvent::mouseLocation();
        ns_menu.popUpMenuPositioningItem_atLocation_inView(None, location, None)
    };
}

fn activate_app() {
    let Some(mtm) = MainThreadMarker::new() else {
        return;
    };
    let app = NSApplication::sharedApplication(mtm);
    #[allow(deprecated)]
    app.activateIgnoringOtherApps(true);
}

/// Hide the app so focus returns to whatever was frontmost before.
fn hide_app() {
    let Some(mtm) = MainThreadMarker::new() else {
        return;
    };
    let app = NSApplication::sharedApplication(mtm);
    #[allow(unused_unsafe)]
    unsafe {
        app.hide(None)
    };
}
