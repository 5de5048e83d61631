//! Binary entrypoint for Multi-Overlay: a menu-bar app that shows AI chat
//! sites in a floating window, summoned with global hotkeys.
use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    process::{self, Command, Stdio},
    time::Duration,
};

use clap::Parser;
use crashguard::{CrashGuard, EXIT_CRASH_LOOP, Verdict};
use overlay_config::{HotkeyStore, OverlayRegistry, paths};
use tracing::{error, info, warn};

#[cfg(target_os = "macos")]
mod app;
mod cli;
mod error;
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod ipc;
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod menu;
mod startup;
#[cfg(target_os = "macos")]
mod tap;
#[cfg(target_os = "macos")]
mod tray;
#[cfg(target_os = "macos")]
mod window;

pub use error::{Error, Result};

use crate::startup::{LaunchAgent, Removal};

/// Crate version, recorded in crash reports.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How often a supervised launch re-checks Accessibility access.
const PERMISSION_POLL: Duration = Duration::from_secs(5);

/// How long a supervised launch waits for Accessibility access.
const PERMISSION_WAIT: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(
    name = "multi-overlay",
    about = "Dedicated window for AI assistants, summoned and dismissed with customizable \
             keyboard shortcuts",
    version
)]
/// Command-line interface for the `multi-overlay` binary.
struct Cli {
    /// Overlay to launch (e.g. grok, gemini, claude, chatgpt)
    #[arg(long, value_name = "SITE_ID")]
    site: Option<String>,

    /// List all available overlay sites
    #[arg(long)]
    list_sites: bool,

    /// Install the app to run at login
    #[arg(long, conflicts_with = "uninstall_startup")]
    install_startup: bool,

    /// Uninstall the app from running at login
    #[arg(long)]
    uninstall_startup: bool,

    /// Check Accessibility permissions only
    #[arg(long)]
    check_permissions: bool,

    /// Settings directory (defaults to ~/Library/Application Support/Multi-Overlay)
    #[arg(long, value_name = "PATH")]
    config_dir: Option<PathBuf>,

    /// Logging controls
    #[command(flatten)]
    log: logging::LogArgs,
}

/// Everything the running app needs.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
struct Launch {
    registry: OverlayRegistry,
    store: HotkeyStore,
    initial: String,
    guard: CrashGuard,
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("ERROR: Application failed to start properly: {}", e);
            match crashguard::write_report(VERSION, &e.to_string()) {
                Ok(path) => eprintln!("Error log saved at: {}", path.display()),
                Err(re) => warn!(error = %re, "crash_report_failed"),
            }
            1
        }
    };
    process::exit(code);
}

fn stdout_err(source: io::Error) -> Error {
    Error::Io {
        path: PathBuf::from("<stdout>"),
        source,
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let settings = paths::settings_dir(cli.config_dir.as_deref());
    if let Err(e) = paths::ensure_dirs(&settings) {
        warn!("{}", e.pretty());
    }
    let registry = OverlayRegistry::load_all(&paths::overlays_dir(&settings));
    let mut out = io::stdout().lock();

    if cli.list_sites {
        cli::write_site_list(&mut out, &registry).map_err(stdout_err)?;
        return Ok(0);
    }
    if cli.install_startup {
        install_login_item(&mut out)?;
        return Ok(0);
    }
    if cli.uninstall_startup {
        uninstall_login_item(&mut out)?;
        return Ok(0);
    }
    if cli.check_permissions {
        return cli::write_permission_status(&mut out, permissions::accessibility_ok())
            .map_err(stdout_err);
    }
    if let Some(site) = &cli.site {
        if !registry.contains(site) {
            cli::write_unknown_site(&mut out, site, &registry).map_err(stdout_err)?;
            return Ok(cli::EXIT_UNKNOWN_SITE);
        }
    }

    let guard = CrashGuard::default();
    if guard.record_attempt() == Verdict::Abort {
        let message = format!(
            "Crash loop detected (more than {} launches within {} seconds). Aborting further \
             restarts. To try again, run: {}",
            crashguard::CRASH_THRESHOLD,
            crashguard::CRASH_WINDOW.as_secs(),
            guard.clear_command()
        );
        eprintln!("ERROR: {}", message);
        if let Err(e) = crashguard::write_report(VERSION, &message) {
            warn!(error = %e, "crash_report_failed");
        }
        return Ok(EXIT_CRASH_LOOP);
    }
    crashguard::install_panic_hook(VERSION);

    // Prompts through the system dialog. Interactive launches proceed; the
    // app reports once if the event tap then fails.
    if !permissions::request_accessibility() && startup::is_supervised() {
        return wait_for_permissions(&mut out, &guard);
    }

    let Some(initial) = cli
        .site
        .clone()
        .or_else(|| registry.first().map(|o| o.id.clone()))
    else {
        writeln!(out, "Error: No overlay selected and no default overlay available.")
            .map_err(stdout_err)?;
        return Ok(1);
    };
    let name = registry.get(&initial).map(|o| o.name.clone()).unwrap_or_default();
    cli::write_banner(&mut out, Some((initial.as_str(), name.as_str()))).map_err(stdout_err)?;
    drop(out);

    let store = HotkeyStore::load(paths::hotkeys_path(&settings), &registry);
    launch(Launch {
        registry,
        store,
        initial,
        guard,
    })?;
    Ok(0)
}

#[cfg(target_os = "macos")]
fn launch(launch: Launch) -> Result<()> {
    app::run(launch)
}

#[cfg(not(target_os = "macos"))]
fn launch(_launch: Launch) -> Result<()> {
    Err(Error::Startup {
        message: "the overlay window is only available on macOS".to_string(),
    })
}

fn install_login_item(out: &mut impl Write) -> Result<()> {
    let agent = LaunchAgent::for_current_user()?;
    agent.install()?;
    writeln!(
        out,
        "Installed as startup app. Launch Agent created at {}.",
        agent.plist_path().display()
    )
    .and_then(|()| writeln!(out, "To disable, run: multi-overlay --uninstall-startup"))
    .map_err(stdout_err)
}

fn uninstall_login_item(out: &mut impl Write) -> Result<()> {
    let agent = LaunchAgent::for_current_user()?;
    let line = match agent.uninstall()? {
        Removal::Removed => format!(
            "Uninstalled Launch Agent {} ({}).",
            agent.label(),
            agent.plist_path().display()
        ),
        Removal::NotInstalled => "No Launch Agent installed; nothing to uninstall.".to_string(),
    };
    writeln!(out, "{}", line).map_err(stdout_err)
}

/// Ask a fresh process, since the trust state is cached per process.
fn probe_permissions() -> bool {
    let Ok(exe) = env::current_exe() else {
        return false;
    };
    Command::new(exe)
        .arg("--check-permissions")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Supervised launch without access: wait for the user to grant it, then
/// exit so launchd restarts us with the new trust state.
fn wait_for_permissions(out: &mut impl Write, guard: &CrashGuard) -> Result<i32> {
    writeln!(out, "Waiting for Accessibility permission...").map_err(stdout_err)?;
    let granted = permissions::wait_until(
        probe_permissions,
        PERMISSION_POLL,
        PERMISSION_WAIT,
        |waited| {
            info!(waited_s = waited.as_secs(), "permission_wait");
            if let Err(e) = guard.record_success() {
                warn!(error = %e, "crash_counter_reset_failed");
            }
        },
    );
    if granted {
        writeln!(
            out,
            "Permissions granted, exiting application (to be restarted automatically)..."
        )
        .map_err(stdout_err)?;
        return Ok(0);
    }
    writeln!(
        out,
        "Permissions not granted within the time limit. Uninstalling application, since this \
         installation must have failed."
    )
    .map_err(stdout_err)?;
    LaunchAgent::for_current_user()?.uninstall()?;
    Ok(cli::EXIT_PERMISSION_MISSING)
}
