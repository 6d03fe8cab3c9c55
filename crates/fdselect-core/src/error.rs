//! Error types for the readiness multiplexer

use nix::errno::Errno;
use thiserror::Error;

use crate::endpoint::Handle;

/// Result type for multiplexer operations
pub type SelectResult<T> = Result<T, SelectError>;

/// Errors raised when adding an endpoint to a readiness set.
///
/// All of these would silently corrupt a later `select(2)` call if let
/// through, so registration fails fast instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Handle is below zero
    #[error("handle {0} is negative")]
    Negative(Handle),

    /// Handle does not fit in a descriptor set
    #[error("handle {handle} exceeds the select limit of {limit}")]
    OutOfBound { handle: Handle, limit: usize },

    /// Handle does not refer to an open descriptor
    #[error("handle {0} is not an open descriptor")]
    Closed(Handle),
}

impl RegistrationError {
    /// The handle that was rejected.
    pub fn handle(&self) -> Handle {
        match *self {
            RegistrationError::Negative(h) => h,
            RegistrationError::OutOfBound { handle, .. } => handle,
            RegistrationError::Closed(h) => h,
        }
    }
}

/// Errors raised by a readiness wait.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The readiness query itself failed. Not retried, even on `EINTR`.
    #[error("select() failed: {0}")]
    Select(Errno),

    /// A registered endpoint was destroyed before the wait
    #[error("endpoint for handle {0} was dropped while still registered")]
    EndpointDropped(Handle),
}

impl WaitError {
    /// OS errno, if the failure came from the kernel.
    pub fn errno(&self) -> Option<Errno> {
        match *self {
            WaitError::Select(errno) => Some(errno),
            WaitError::EndpointDropped(_) => None,
        }
    }

    /// True for an interrupted call (`EINTR`), which callers may choose to retry.
    pub fn is_interrupted(&self) -> bool {
        self.errno() == Some(Errno::EINTR)
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    InvalidValue(&'static str),
}

/// Umbrella error for callers that drive a full select loop.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("wait error: {0}")]
    Wait(#[from] WaitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = RegistrationError::OutOfBound { handle: 2048, limit: 1024 };
        assert_eq!(format!("{}", e), "handle 2048 exceeds the select limit of 1024");

        let e = WaitError::EndpointDropped(7);
        assert_eq!(
            format!("{}", e),
            "endpoint for handle 7 was dropped while still registered"
        );
    }

    #[test]
    fn test_wait_error_carries_os_text() {
        let e = WaitError::Select(Errno::EBADF);
        let text = format!("{}", e);
        assert!(text.starts_with("select() failed: "));
        assert!(text.contains(Errno::EBADF.desc()));
        assert_eq!(e.errno(), Some(Errno::EBADF));
        assert!(!e.is_interrupted());
        assert!(WaitError::Select(Errno::EINTR).is_interrupted());
    }

    #[test]
    fn test_error_conversion() {
        let reg = RegistrationError::Closed(5);
        assert_eq!(reg.handle(), 5);
        let err: SelectError = reg.into();
        assert!(matches!(err, SelectError::Registration(RegistrationError::Closed(5))));

        let err: SelectError = WaitError::EndpointDropped(3).into();
        assert!(matches!(err, SelectError::Wait(WaitError::EndpointDropped(3))));

        let err: SelectError = ConfigError::InvalidValue("max_handles must be > 0").into();
        assert_eq!(format!("{}", err), "invalid config: max_handles must be > 0");
    }
}
