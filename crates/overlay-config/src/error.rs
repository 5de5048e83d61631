//! Error types for overlay declaration loading and hotkey persistence.

use std::{
    path::{Path, PathBuf},
    result::Result as StdResult,
};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while loading, validating, or persisting configuration.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// JSON syntax or shape error.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// A declaration parsed but is not a usable overlay.
    Validation {
        /// Optional path associated with the validation error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("duplicate overlay id: {id}")]
    /// An overlay with this id is already registered.
    Duplicate {
        /// The clashing id.
        id: String,
    },
    #[error("{message}")]
    /// Persisting the hotkey table failed.
    Write {
        /// Destination file.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Render a human-friendly error message including the path when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse { path, message } => match path {
                Some(p) => format!("Parse error at {}\n{}", p.display(), message),
                None => format!("Parse error\n{}", message),
            },
            Self::Validation { path, message } => match path {
                Some(p) => format!("Overlay validation error at {}\n{}", p.display(), message),
                None => format!("Overlay validation error\n{}", message),
            },
            Self::Duplicate { id } => {
                format!("Overlay '{}' is already registered; keeping the first one", id)
            }
            Self::Write { path, message } => {
                format!("Could not save hotkeys to {}: {}", path.display(), message)
            }
        }
    }

    /// Access the optional path attached to this error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Validation { path, .. } => {
                path.as_deref()
            }
            Self::Write { path, .. } => Some(path),
            Self::Duplicate { .. } => None,
        }
    }

    /// Attach `path` to errors that carry an optional path.
    pub(crate) fn at(self, at: &Path) -> Self {
        let at = Some(at.to_path_buf());
        match self {
            Self::Read { message, .. } => Self::Read { path: at, message },
            Self::Parse { message, .. } => Self::Parse { path: at, message },
            Self::Validation { message, .. } => Self::Validation { path: at, message },
            other => other,
        }
    }
}

/// Result alias for this crate.
pub type Result<T> = StdResult<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_includes_path() {
        let e = Error::Validation {
            path: None,
            message: "missing required fields: url".into(),
        }
        .at(Path::new("/tmp/x.json"));
        assert_eq!(e.path(), Some(Path::new("/tmp/x.json")));
        assert!(e.pretty().contains("/tmp/x.json"));
        assert!(e.pretty().contains("missing required fields: url"));
    }

    #[test]
    fn duplicate_is_not_relocated() {
        let e = Error::Duplicate { id: "grok".into() }.at(Path::new("/tmp/y.json"));
        assert_eq!(e.path(), None);
        assert_eq!(e.to_string(), "duplicate overlay id: grok");
    }
}
