//! Text written by the command-line entry points.

use std::{
    fmt::Display,
    io::{self, Write},
};

use overlay_config::OverlayRegistry;

/// Exit status for `--check-permissions` when access is missing.
pub const EXIT_PERMISSION_MISSING: i32 = 1;

/// Exit status for an unknown `--site`.
pub const EXIT_UNKNOWN_SITE: i32 = 1;

/// `--list-sites` output: one `  id: name - description` line per overlay.
pub fn write_site_list(out: &mut impl Write, registry: &OverlayRegistry) -> io::Result<()> {
    writeln!(out, "Available overlay sites:")?;
    for o in registry.all() {
        writeln!(out, "  {}: {} - {}", o.id, o.name, o.description)?;
    }
    Ok(())
}

/// Error text for an unknown `--site`, followed by the valid choices.
pub fn write_unknown_site(
    out: &mut impl Write,
    site: &str,
    registry: &OverlayRegistry,
) -> io::Result<()> {
    writeln!(out, "Error: Overlay '{}' not found.", site)?;
    writeln!(out, "Available overlays:")?;
    for o in registry.all() {
        writeln!(out, "  {}: {}", o.id, o.name)?;
    }
    Ok(())
}

/// Startup banner with usage hints.
pub fn write_banner(out: &mut impl Write, overlay: Option<(&str, &str)>) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Starting Multi-Overlay.")?;
    writeln!(out)?;
    writeln!(out, "To run at login, use:      multi-overlay --install-startup")?;
    writeln!(out, "To remove from login, use: multi-overlay --uninstall-startup")?;
    writeln!(out, "To list available sites:   multi-overlay --list-sites")?;
    writeln!(out, "To specify a site:         multi-overlay --site SITE_ID")?;
    writeln!(out)?;
    if let Some((id, name)) = overlay {
        writeln!(out, "Launching overlay: {} ({})", name, id)?;
    }
    Ok(())
}

/// Notice shown when hotkeys cannot be installed, with instructions.
pub fn write_hotkeys_disabled(out: &mut impl Write, reason: &dyn Display) -> io::Result<()> {
    writeln!(out, "Hotkeys are disabled: {}", reason)?;
    writeln!(
        out,
        "Global hotkeys need Accessibility access. Open System Settings > Privacy & Security > \
         Accessibility, enable the app (or the terminal running it), then restart multi-overlay."
    )
}

/// `--check-permissions` report; returns the exit status to use.
pub fn write_permission_status(out: &mut impl Write, granted: bool) -> io::Result<i32> {
    writeln!(out, "Permissions granted: {}", granted)?;
    Ok(if granted { 0 } else { EXIT_PERMISSION_MISSING })
}
