use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the overlay engine.
#[derive(Debug, Error)]
pub enum Error {
    /// No overlay with this id is registered.
    #[error("Unknown overlay: {0}")]
    UnknownOverlay(String),

    /// Errors originating from the configuration layer.
    #[error("Config error: {0}")]
    Config(#[from] overlay_config::Error),
}
