use std::{
    backtrace::Backtrace,
    env,
    fmt::Write as _,
    fs,
    panic::{self, PanicHookInfo},
    path::PathBuf,
    process::Command,
};

use tracing::error;

use crate::{Error, Result};

/// File name of the crash report inside the temp directory.
pub const REPORT_FILE: &str = "multi_overlay_error_log.txt";

/// Default crash report location.
pub fn report_path() -> PathBuf {
    env::temp_dir().join(REPORT_FILE)
}

fn os_version() -> Option<String> {
    if !cfg!(target_os = "macos") {
        return None;
    }
    let out = Command::new("sw_vers").arg("-productVersion").output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// Render a diagnostic: environment, the error text, and a backtrace.
pub fn render_report(version: &str, error: &str, backtrace: &Backtrace) -> String {
    let mut out = String::new();
    let _ignored = writeln!(out, "An unhandled error occurred:");
    let _ignored = writeln!(out, "System Information:");
    let _ignored = writeln!(
        out,
        "OS: {} {}",
        env::consts::OS,
        os_version().as_deref().unwrap_or("(unknown version)")
    );
    let _ignored = writeln!(out, "Architecture: {}", env::consts::ARCH);
    let _ignored = writeln!(out, "Version: {}", version);
    let exe = env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unknown)".to_string());
    let _ignored = writeln!(out, "Executable: {}", exe);
    let args: Vec<String> = env::args().collect();
    let _ignored = writeln!(out, "Arguments: {}", args.join(" "));
    let _ignored = writeln!(out);
    let _ignored = writeln!(out, "Error: {}", error);
    let _ignored = writeln!(out);
    let _ignored = writeln!(out, "Backtrace:\n{}", backtrace);
    out
}

/// Write a report for `error` to [`report_path`]. Returns the path written.
pub fn write_report(version: &str, error: &str) -> Result<PathBuf> {
    let path = report_path();
    let text = render_report(version, error, &Backtrace::force_capture());
    fs::write(&path, text).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "(non-string panic payload)".to_string());
    match info.location() {
        Some(loc) => format!("panic at {}:{}: {}", loc.file(), loc.line(), payload),
        None => format!("panic: {}", payload),
    }
}

/// Write a crash report on panic, then run the previously installed hook.
pub fn install_panic_hook(version: &'static str) {
    let prev = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        match write_report(version, &panic_message(info)) {
            Ok(path) => eprintln!("Error log saved at: {}", path.display()),
            Err(e) => error!(error = %e, "crash_report_write_failed"),
        }
        prev(info);
    }));
}
