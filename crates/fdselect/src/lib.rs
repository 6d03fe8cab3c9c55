//! # fdselect
//!
//! Readiness-based I/O multiplexing over `select(2)`.
//!
//! A single thread registers any number of endpoints (sockets, pipes, anything
//! implementing [`Endpoint`]) under Read and/or Write interest, then calls
//! [`ReadinessSet::wait`] to learn which of them are ready. Every wait is a
//! fresh query over the full registered set: there is no edge triggering and
//! no readiness caching between calls.
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use fdselect::{Interest, ReadinessSet};
//!
//! let listener = Rc::new(std::net::TcpListener::bind("127.0.0.1:0")?);
//! let mut set = ReadinessSet::new();
//! set.register(&listener, Interest::Read)?;
//!
//! // One second; 0 blocks until something is ready.
//! let (readable, writable) = set.wait(1_000_000)?;
//! ```
//!
//! ## Scale
//!
//! `select(2)` scans every descriptor up to the highest registered one and the
//! set recomputes that bound on each wait. This is fine for tens to low
//! hundreds of endpoints. Handles at or above `FD_SETSIZE` cannot be
//! represented and are rejected at registration.
//!
//! This crate provides:
//! - `ReadinessSet` - the interest registry and wait
//! - `FdSet` - a bounds-checked `fd_set`
//! - `SelectConfig` - defaults with environment overrides
//! - `logging::init` - tracing subscriber setup

pub mod config;
pub mod fdset;
pub mod logging;
pub mod readiness;

// Platform detection
cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod sys;
    } else {
        compile_error!("fdselect requires a unix select(2)");
    }
}

// Re-exports
pub use config::SelectConfig;
pub use fdset::{FdSet, MAX_SELECT_HANDLES};
pub use readiness::{ReadinessSet, ReadyLists};

pub use fdselect_core::env;
pub use fdselect_core::{
    ConfigError, Endpoint, Handle, Interest, RegistrationError, SelectError, SelectResult,
    WaitError,
};
