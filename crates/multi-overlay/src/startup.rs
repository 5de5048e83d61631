//! Login item: a per-user launchd agent that restarts the app when it exits.

use std::{
    env,
    ffi::OsStr,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::{info, warn};

use crate::{Error, Result};

/// Set in the agent's environment so a supervised launch can tell.
pub const SUPERVISED_ENV: &str = "MULTI_OVERLAY_LAUNCH_AGENT";

/// True when launchd started this process through our agent.
pub fn is_supervised() -> bool {
    env::var_os(SUPERVISED_ENV).is_some_and(|v| v == "1")
}

/// Outcome of [`LaunchAgent::uninstall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The plist existed and was removed.
    Removed,
    /// There was nothing to uninstall.
    NotInstalled,
}

/// A LaunchAgent definition under `~/Library/LaunchAgents`.
#[derive(Debug, Clone)]
pub struct LaunchAgent {
    label: String,
    plist_path: PathBuf,
    program: Vec<String>,
    launchctl: String,
}

impl LaunchAgent {
    /// Agent for `user` whose plist lives under `home`, running `program`.
    pub fn new(user: &str, home: &Path, program: Vec<String>) -> Self {
        let label = format!("com.{}.multioverlay", user);
        let plist_path = home
            .join("Library/LaunchAgents")
            .join(format!("{label}.plist"));
        Self {
            label,
            plist_path,
            program,
            launchctl: "launchctl".to_string(),
        }
    }

    /// Agent for the current user running the current executable.
    pub fn for_current_user() -> Result<Self> {
        let home = env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| Error::Startup {
                message: "HOME is not set; cannot locate ~/Library/LaunchAgents".to_string(),
            })?;
        let user = env::var("USER")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| home.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "user".to_string());
        let exe = env::current_exe().map_err(|source| Error::Io {
            path: PathBuf::from("current_exe"),
            source,
        })?;
        Ok(Self::new(&user, &home, vec![exe.display().to_string()]))
    }

    /// Use a different launcher program instead of `launchctl`.
    pub fn with_launchctl(mut self, program: impl Into<String>) -> Self {
        self.launchctl = program.into();
        self
    }

    /// The launchd label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Where the plist is written.
    pub fn plist_path(&self) -> &Path {
        &self.plist_path
    }

    /// Whether the plist is present.
    pub fn is_installed(&self) -> bool {
        self.plist_path.is_file()
    }

    /// The plist document.
    pub fn render_plist(&self) -> String {
        let args: String = self
            .program
            .iter()
            .map(|a| format!("    <string>{}</string>\n", xml_escape(a)))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>Label</key>
  <string>{label}</string>
  <key>ProgramArguments</key>
  <array>
{args}  </array>
  <key>EnvironmentVariables</key>
  <dict>
    <key>{env}</key>
    <string>1</string>
  </dict>
  <key>RunAtLoad</key>
  <true/>
  <key>KeepAlive</key>
  <true/>
</dict>
</plist>
"#,
            label = xml_escape(&self.label),
            env = SUPERVISED_ENV,
        )
    }

    /// Write the plist and load it. A failed load removes the plist again.
    pub fn install(&self) -> Result<()> {
        if let Some(dir) = self.plist_path.parent() {
            fs::create_dir_all(dir).map_err(|source| Error::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.plist_path, self.render_plist()).map_err(|source| Error::Io {
            path: self.plist_path.clone(),
            source,
        })?;
        let load = [OsStr::new("load"), self.plist_path.as_os_str()];
        if let Err(e) = run_status_quiet(&self.launchctl, load) {
            if let Err(rm) = fs::remove_file(&self.plist_path) {
                warn!(path = %self.plist_path.display(), error = %rm, "plist_cleanup_failed");
            }
            return Err(e);
        }
        info!(label = %self.label, path = %self.plist_path.display(), "launch_agent_installed");
        Ok(())
    }

    /// Unload the agent and remove its plist.
    pub fn uninstall(&self) -> Result<Removal> {
        if !self.is_installed() {
            return Ok(Removal::NotInstalled);
        }
        let unload = [OsStr::new("unload"), self.plist_path.as_os_str()];
        if let Err(e) = run_status_quiet(&self.launchctl, unload) {
            warn!(error = %e, "launchctl_unload_failed");
        }
        match fs::remove_file(&self.plist_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(Error::Io {
                    path: self.plist_path.clone(),
                    source,
                });
            }
        }
        info!(label = %self.label, "launch_agent_removed");
        Ok(Removal::Removed)
    }
}

/// Run a command with stdout/stderr suppressed and return an error on non-zero exit.
fn run_status_quiet<I, S>(program: &str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| Error::CommandStart {
            program: program.to_string(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            program: program.to_string(),
            status,
        })
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use std::{
        process,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn unique_home(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        env::temp_dir().join(format!(
            "multi-overlay-startup-{name}-{}-{nanos}",
            process::id()
        ))
    }

    fn agent(home: &Path) -> LaunchAgent {
        LaunchAgent::new("alice", home, vec!["/Apps/Multi Overlay/bin & co".into()])
    }

    #[test]
    fn plist_contents() {
        let a = agent(Path::new("/Users/alice"));
        assert_eq!(a.label(), "com.alice.multioverlay");
        assert_eq!(
            a.plist_path(),
            Path::new("/Users/alice/Library/LaunchAgents/com.alice.multioverlay.plist")
        );
        let text = a.render_plist();
        assert!(text.contains("<string>com.alice.multioverlay</string>"));
        assert!(text.contains("<string>/Apps/Multi Overlay/bin &amp; co</string>"));
        assert!(text.contains("<key>RunAtLoad</key>\n  <true/>"));
        assert!(text.contains("<key>KeepAlive</key>\n  <true/>"));
        assert!(text.contains(SUPERVISED_ENV));
    }

    #[test]
    fn failed_load_leaves_nothing_behind() {
        let home = unique_home("fail");
        let a = agent(&home).with_launchctl("false");
        let err = a.install().expect_err("launcher fails");
        assert!(matches!(err, Error::CommandFailed { .. }), "{err}");
        assert!(!a.is_installed());
        fs::remove_dir_all(&home).ok();
    }

    #[test]
    fn missing_launcher_is_start_error() {
        let home = unique_home("missing");
        let a = agent(&home).with_launchctl("multi-overlay-no-such-launcher");
        assert!(matches!(a.install(), Err(Error::CommandStart { .. })));
        assert!(!a.is_installed());
        fs::remove_dir_all(&home).ok();
    }

    #[test]
    fn install_then_uninstall() {
        let home = unique_home("ok");
        let a = agent(&home).with_launchctl("true");
        a.install().expect("install");
        assert!(a.is_installed());
        assert_eq!(a.uninstall().expect("uninstall"), Removal::Removed);
        assert!(!a.is_installed());
        assert_eq!(a.uninstall().expect("again"), Removal::NotInstalled);
        fs::remove_dir_all(&home).ok();
    }

    #[test]
    fn unload_failure_still_removes() {
        let home = unique_home("unload");
        let a = agent(&home).with_launchctl("true");
        a.install().expect("install");
        let a = a.with_launchctl("false");
        assert_eq!(a.uninstall().expect("uninstall"), Removal::Removed);
        assert!(!a.is_installed());
        fs::remove_dir_all(&home).ok();
    }
}
