//! Compiled-in defaults for `SelectConfig`

use crate::fdset::MAX_SELECT_HANDLES;

/// Highest handle count a descriptor set can hold
pub const MAX_HANDLES: usize = MAX_SELECT_HANDLES;

/// Probe each handle with `fcntl(F_GETFD)` at registration
pub const PROBE_CLOSED: bool = true;

/// Fallback filter when `RUST_LOG` is unset
pub const LOG_LEVEL: &str = "info";
