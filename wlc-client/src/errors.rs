//! Error types for the demo client.

use thiserror::Error;
use wayland_client::{ConnectError, DispatchError};
use wlc_shm::ShmError;

/// Errors that can occur while running the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable Wayland socket was found.
    #[error("failed to connect to the wayland display: {0}")]
    Connect(#[from] ConnectError),

    /// The dispatch primitive reported a hard failure.
    #[error("connection lost: {0}")]
    ConnectionLost(#[from] DispatchError),

    /// A global the client cannot run without was never advertised.
    #[error("required global {0} was never advertised")]
    MissingGlobal(&'static str),

    /// A frame's shared-memory buffer could not be produced.
    #[error("frame buffer allocation failed: {0}")]
    Allocation(#[from] ShmError),

    /// The configuration file was unreadable or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether this error must end the dispatch loop.
    ///
    /// Allocation failures are recoverable: the pacing loop skips that
    /// frame's submission and retries on the next callback.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Allocation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failures_are_recoverable() {
        let err = ClientError::Allocation(ShmError::NameExhausted);
        assert!(!err.is_fatal());
    }

    #[test]
    fn everything_else_is_fatal() {
        assert!(ClientError::MissingGlobal("wl_shm").is_fatal());
        assert!(ClientError::Config("bad toml".into()).is_fatal());
    }

    #[test]
    fn errors_render_their_context() {
        let err = ClientError::MissingGlobal("xdg_wm_base");
        assert_eq!(
            err.to_string(),
            "required global xdg_wm_base was never advertised"
        );
    }
}
