//! Crash-loop guard for a process restarted by a supervisor (launchd
//! `KeepAlive`).
//!
//! Every launch calls [`CrashGuard::record_attempt`]. Launches closer together
//! than the window bump a counter persisted in a temp file; once it passes the
//! threshold the guard says [`Verdict::Abort`] and the caller exits with
//! [`EXIT_CRASH_LOOP`]. A clean shutdown calls [`CrashGuard::record_success`].
//!
//! [`write_report`] and [`install_panic_hook`] leave a diagnostic file behind
//! when startup fails.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use tracing::{debug, warn};

mod error;
mod report;

pub use error::{Error, Result};
pub use report::{REPORT_FILE, install_panic_hook, render_report, report_path, write_report};

/// Exit status used when a crash loop is detected.
pub const EXIT_CRASH_LOOP: i32 = 3;

/// Launches allowed inside the window before aborting.
pub const CRASH_THRESHOLD: u32 = 3;

/// Launches closer together than this count toward the threshold.
pub const CRASH_WINDOW: Duration = Duration::from_secs(60);

/// File name of the counter inside the temp directory.
pub const COUNTER_FILE: &str = "multi_overlay_crash_counter.txt";

/// Whether startup should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep going.
    Ok,
    /// Too many recent launches; stop restarting.
    Abort,
}

/// Persistent launch counter.
#[derive(Debug, Clone)]
pub struct CrashGuard {
    path: PathBuf,
    threshold: u32,
    window: Duration,
}

impl Default for CrashGuard {
    fn default() -> Self {
        Self::new(env::temp_dir().join(COUNTER_FILE))
    }
}

impl CrashGuard {
    /// Guard backed by the counter file at `path`, with default limits.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            threshold: CRASH_THRESHOLD,
            window: CRASH_WINDOW,
        }
    }

    /// Override the launch threshold.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Override the window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Counter file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shell command that clears the counter.
    pub fn clear_command(&self) -> String {
        format!("rm -f '{}'", self.path.display())
    }

    /// Record a launch now.
    pub fn record_attempt(&self) -> Verdict {
        self.record_attempt_at(now_secs())
    }

    /// Record a launch at `now` (seconds since the Unix epoch).
    pub fn record_attempt_at(&self, now: f64) -> Verdict {
        let count = match self.read() {
            Some((last, count)) if now - last < self.window.as_secs_f64() => count + 1,
            _ => 1,
        };
        if let Err(e) = fs::write(&self.path, format!("{now},{count}")) {
            warn!(path = %self.path.display(), error = %e, "crash_counter_write_failed");
        }
        debug!(count, threshold = self.threshold, "launch_recorded");
        if count > self.threshold {
            Verdict::Abort
        } else {
            Verdict::Ok
        }
    }

    /// The stored `(timestamp, count)`; `None` when missing or malformed.
    pub fn read(&self) -> Option<(f64, u32)> {
        let text = fs::read_to_string(&self.path).ok()?;
        let (ts, count) = text.trim().split_once(',')?;
        Some((ts.trim().parse().ok()?, count.trim().parse().ok()?))
    }

    /// Forget recorded launches. A missing counter is fine.
    pub fn record_success(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
