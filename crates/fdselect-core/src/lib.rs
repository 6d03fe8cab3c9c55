//! # fdselect-core
//!
//! Core types for the fdselect readiness multiplexer.
//!
//! This crate holds everything the multiplexer shares with its callers but
//! that does not touch `select(2)` itself. The syscall wrapper and the
//! `ReadinessSet` live in `fdselect`.
//!
//! ## Modules
//!
//! - `interest` - Read / Write interest kinds
//! - `endpoint` - The `Endpoint` capability trait (`handle()`)
//! - `error` - Registration, wait and config errors
//! - `env` - Environment variable utilities

pub mod interest;
pub mod endpoint;
pub mod error;
pub mod env;

// Re-exports for convenience
pub use interest::Interest;
pub use endpoint::{Endpoint, Handle};
pub use error::{ConfigError, RegistrationError, SelectError, SelectResult, WaitError};
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};
