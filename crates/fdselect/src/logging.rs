//! Logging setup
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. `init()` is the one-liner for binaries that have no
//! subscriber of their own.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Full `EnvFilter` directive, takes precedence
//! - `FDS_LOG_LEVEL` - Fallback level when `RUST_LOG` is unset (default: info)

use fdselect_core::env::env_get_str;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::defaults;

/// Filter directive used when `RUST_LOG` is not set.
pub fn fallback_directive() -> String {
    env_get_str("FDS_LOG_LEVEL", defaults::LOG_LEVEL)
}

/// Install a stderr fmt subscriber. Safe to call more than once; later calls
/// (or a subscriber installed elsewhere) win silently.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directive()));
    let _ = fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .try_init();
}
