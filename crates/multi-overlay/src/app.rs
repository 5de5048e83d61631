//! Main-thread application loop: tao event loop, tray, overlay window and
//! the global key tap.

use std::{cell::RefCell, io, rc::Rc};

use crashguard::CrashGuard;
use overlay_config::ActionId;
use overlay_engine::{Action, Classifier, SessionController, WindowShortcut};
use tao::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    platform::macos::{ActivationPolicy, EventLoopExtMacOS},
};
use tracing::{debug, error, info, trace, warn};
use tray_icon::menu::MenuEvent;

use crate::{
    Launch, Result, cli,
    menu::TrayCommand,
    startup::{LaunchAgent, Removal},
    tap::{self, KeyTap},
    tray::Tray,
    window::OverlayWindow,
};

/// Events delivered to the main loop from callbacks.
#[derive(Debug)]
pub enum UserEvent {
    /// A bound hotkey fired.
    Hotkey(Action),
    /// A new binding was recorded.
    Captured {
        /// The rebound action.
        target: ActionId,
        /// Readable form of the new binding.
        label: String,
    },
    /// A tray or selector menu item was picked.
    Menu(MenuEvent),
    /// An in-window shortcut was pressed.
    Shortcut(WindowShortcut),
}

/// State owned by the event loop.
struct App {
    session: SessionController<OverlayWindow>,
    classifier: Rc<RefCell<Classifier>>,
    tray: Option<Tray>,
    guard: CrashGuard,
    _tap: Option<KeyTap>,
}

/// Run the app until quit. Never returns on success.
pub fn run(launch: Launch) -> Result<()> {
    let Launch {
        registry,
        store,
        initial,
        guard,
    } = launch;

    let mut event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    event_loop.set_activation_policy(ActivationPolicy::Accessory);
    let proxy = event_loop.create_proxy();

    let menu_proxy = proxy.clone();
    MenuEvent::set_event_handler(Some(move |ev: MenuEvent| {
        if menu_proxy.send_event(UserEvent::Menu(ev)).is_err() {
            trace!("event_loop_closed");
        }
    }));

    let window = OverlayWindow::new(&event_loop, proxy.clone())?;
    let tray = Tray::build(&registry);
    let classifier = Rc::new(RefCell::new(Classifier::new(store)));
    let key_tap = match tap::install(classifier.clone(), proxy) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("{}; hotkeys are disabled", e);
            cli::write_hotkeys_disabled(&mut io::stderr(), &e).ok();
            None
        }
    };

    let mut session = SessionController::new(registry, window, Some(&initial))?;
    session.select_overlay(&initial)?;

    let mut app = App {
        session,
        classifier,
        tray,
        guard,
        _tap: key_tap,
    };
    info!(overlay = %initial, "app_started");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::NewEvents(_) | Event::MainEventsCleared | Event::RedrawEventsCleared => {}
            Event::UserEvent(ev) => {
                if app.on_user_event(ev) {
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => app.session.hide(),
            Event::LoopDestroyed => app.shutdown(),
            _ => trace!("Event loop received: {:?}", event),
        }
    })
}

impl App {
    /// Handle one callback event. Returns true when the app should quit.
    fn on_user_event(&mut self, ev: UserEvent) -> bool {
        match ev {
            UserEvent::Hotkey(action) => {
                if let Err(e) = self.session.dispatch(&action) {
                    error!("{}", e);
                }
                false
            }
            UserEvent::Captured { target, label } => {
                println!("New hotkey for {} set: {}", self.display_name(&target), label);
                false
            }
            UserEvent::Shortcut(WindowShortcut::Hide) => {
                self.session.hide();
                false
            }
            UserEvent::Shortcut(WindowShortcut::Quit) => true,
            UserEvent::Shortcut(WindowShortcut::Edit(edit)) => {
                self.session.surface().perform_edit(edit);
                false
            }
            UserEvent::Menu(ev) => {
                let command = self.tray.as_ref().and_then(|t| t.command(&ev.id)).cloned();
                if let Some(command) = command {
                    return self.on_command(&command);
                }
                if let Some(id) = self.session.surface().selector_pick(&ev.id)
                    && let Err(e) = self.session.select_overlay(&id)
                {
                    error!("{}", e);
                }
                false
            }
        }
    }

    fn on_command(&mut self, command: &TrayCommand) -> bool {
        debug!(?command, "tray_command");
        match command {
            TrayCommand::Launch(id) => {
                if let Err(e) = self.session.select_overlay(id) {
                    error!("{}", e);
                }
            }
            TrayCommand::ShowSelector => self.session.show_selector(),
            TrayCommand::SetSelectorHotkey => self.begin_capture(ActionId::Selector),
            TrayCommand::SetHotkey(id) => self.begin_capture(ActionId::overlay(id.clone())),
            TrayCommand::GoToWebsite => self.session.reload_home(),
            TrayCommand::ClearCache => self.session.clear_site_data(),
            TrayCommand::InstallLoginItem => {
                match LaunchAgent::for_current_user().and_then(|a| a.install()) {
                    Ok(()) => {
                        // launchd starts a fresh copy.
                        println!("Installation successful, exiting.");
                        return true;
                    }
                    Err(e) => {
                        error!("{}", e);
                        println!("Installation unsuccessful.");
                    }
                }
            }
            TrayCommand::UninstallLoginItem => {
                match LaunchAgent::for_current_user().and_then(|a| a.uninstall()) {
                    Ok(Removal::Removed) => self.session.hide(),
                    Ok(Removal::NotInstalled) => info!("launch_agent_not_installed"),
                    Err(e) => error!("{}", e),
                }
            }
            TrayCommand::Quit => return true,
        }
        false
    }

    fn begin_capture(&mut self, target: ActionId) {
        println!("Press the new hotkey for {}.", self.display_name(&target));
        self.classifier.borrow_mut().begin_capture(target);
    }

    fn display_name(&self, target: &ActionId) -> String {
        match target {
            ActionId::Selector => "the overlay selector".to_string(),
            ActionId::Overlay(id) => self
                .session
                .registry()
                .get(id)
                .map_or_else(|| id.clone(), |o| o.name.clone()),
        }
    }

    fn shutdown(&mut self) {
        self.classifier.borrow_mut().cancel_capture();
        if let Err(e) = self.guard.record_success() {
            warn!(error = %e, "crash_counter_reset_failed");
        }
        info!("Shutdown complete");
    }
}
