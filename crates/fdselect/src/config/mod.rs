//! fdselect configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls
//! 2. Environment variables (runtime)
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use fdselect::SelectConfig;
//!
//! let config = SelectConfig::from_env()
//!     .max_handles(256)
//!     .probe_closed(false);
//! config.validate()?;
//! ```

pub mod defaults;

use fdselect_core::env::{env_get, env_get_bool};
use fdselect_core::ConfigError;
use tracing::warn;

use crate::fdset::MAX_SELECT_HANDLES;

/// Readiness set configuration with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectConfig {
    /// Registration limit: handles must be `< max_handles`
    pub max_handles: usize,
    /// Reject handles that are not open descriptors
    pub probe_closed: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl SelectConfig {
    /// Create config from compile-time defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `FDS_MAX_HANDLES` - Registration limit (1..=FD_SETSIZE)
    /// - `FDS_PROBE_CLOSED` - Probe handles at registration (0/1)
    ///
    /// An invalid override is logged and replaced by the defaults.
    pub fn from_env() -> Self {
        let config = Self {
            max_handles: env_get("FDS_MAX_HANDLES", defaults::MAX_HANDLES),
            probe_closed: env_get_bool("FDS_PROBE_CLOSED", defaults::PROBE_CLOSED),
        };
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, max_handles = config.max_handles, "ignoring FDS_* overrides");
                Self::new()
            }
        }
    }

    /// Create config with explicit defaults (no env override).
    pub fn new() -> Self {
        Self {
            max_handles: defaults::MAX_HANDLES,
            probe_closed: defaults::PROBE_CLOSED,
        }
    }

    // Builder methods

    pub fn max_handles(mut self, n: usize) -> Self {
        self.max_handles = n;
        self
    }

    pub fn probe_closed(mut self, enable: bool) -> Self {
        self.probe_closed = enable;
        self
    }

    /// The limit actually enforced: never above what `fd_set` can hold.
    pub fn handle_limit(&self) -> usize {
        self.max_handles.min(MAX_SELECT_HANDLES)
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_handles == 0 {
            return Err(ConfigError::InvalidValue("max_handles must be > 0"));
        }
        if self.max_handles > MAX_SELECT_HANDLES {
            return Err(ConfigError::InvalidValue("max_handles must be <= FD_SETSIZE"));
        }
        Ok(())
    }
}
