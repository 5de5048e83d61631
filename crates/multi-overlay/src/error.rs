use std::{io, path::PathBuf, process::ExitStatus, result::Result as StdResult};

use thiserror::Error;

/// A shared `Result` type for the app.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by the app.
#[derive(Debug, Error)]
pub enum Error {
    /// Overlay declarations or the hotkey file.
    #[error(transparent)]
    Config(#[from] overlay_config::Error),

    /// Session control.
    #[error(transparent)]
    Engine(#[from] overlay_engine::Error),

    /// Crash guard bookkeeping.
    #[error(transparent)]
    Crash(#[from] crashguard::Error),

    /// Startup could not proceed.
    #[error("{message}")]
    Startup {
        /// What went wrong and what to do about it.
        message: String,
    },

    /// A filesystem error.
    #[error("io error at {}: {source}", path.display())]
    Io {
        /// The relevant path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A command could not be started.
    #[error("failed to start command {program}: {source}")]
    CommandStart {
        /// The command being executed.
        program: String,
        /// The underlying error.
        source: io::Error,
    },

    /// A command exited unsuccessfully.
    #[error("command failed: {program} (status {status})")]
    CommandFailed {
        /// The command being executed.
        program: String,
        /// The exit status.
        status: ExitStatus,
    },

    /// The global keyboard event tap could not be created.
    #[error("could not create the keyboard event tap")]
    Tap,
}
