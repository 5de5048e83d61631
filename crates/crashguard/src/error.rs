use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors from the crash guard.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading, writing or removing a guard file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}
