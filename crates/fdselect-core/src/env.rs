//! Environment variable utilities
//!
//! All fdselect knobs are read with these helpers and fall back to the
//! compiled-in default when a variable is unset or does not parse.
//!
//! ```ignore
//! use fdselect_core::env::{env_get, env_get_bool};
//!
//! let limit: usize = env_get("FDS_MAX_HANDLES", 1024);
//! let probe: bool = env_get_bool("FDS_PROBE_CLOSED", true);
//! ```

use std::str::FromStr;

/// Parse `key` as `T`, or return `default`.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Parse `key` as `T` if it is set and valid.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read `key` as a flag.
///
/// "1", "true", "yes", "on" are true and "0", "false", "no", "off" are
/// false (case-insensitive). Unset or unrecognised values give `default`.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Read `key` verbatim, or return `default`.
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// True if `key` is set, whatever its value.
#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable names; tests run in parallel.

    #[test]
    fn test_unset_returns_default() {
        let val: usize = env_get("__FDS_TEST_UNSET__", 42);
        assert_eq!(val, 42);
        assert!(env_get_opt::<usize>("__FDS_TEST_UNSET__").is_none());
        assert!(env_get_bool("__FDS_TEST_UNSET__", true));
        assert_eq!(env_get_str("__FDS_TEST_UNSET__", "info"), "info");
    }

    #[test]
    fn test_is_set() {
        assert!(!env_is_set("__FDS_TEST_PRESENCE__"));
        std::env::set_var("__FDS_TEST_PRESENCE__", "");
        assert!(env_is_set("__FDS_TEST_PRESENCE__"));
        std::env::remove_var("__FDS_TEST_PRESENCE__");
        assert!(!env_is_set("__FDS_TEST_PRESENCE__"));
    }

    #[test]
    fn test_parse_and_fallback() {
        std::env::set_var("__FDS_TEST_NUM__", " 512 ");
        let val: usize = env_get("__FDS_TEST_NUM__", 0);
        assert_eq!(val, 512);

        std::env::set_var("__FDS_TEST_NUM__", "lots");
        let val: usize = env_get("__FDS_TEST_NUM__", 7);
        assert_eq!(val, 7);
        std::env::remove_var("__FDS_TEST_NUM__");
    }

    #[test]
    fn test_bool_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on"] {
            std::env::set_var("__FDS_TEST_BOOL__", yes);
            assert!(env_get_bool("__FDS_TEST_BOOL__", false), "{}", yes);
        }
        for no in ["0", "false", "No", "off"] {
            std::env::set_var("__FDS_TEST_BOOL__", no);
            assert!(!env_get_bool("__FDS_TEST_BOOL__", true), "{}", no);
        }
        // Garbage keeps the default either way
        std::env::set_var("__FDS_TEST_BOOL__", "maybe");
        assert!(env_get_bool("__FDS_TEST_BOOL__", true));
        assert!(!env_get_bool("__FDS_TEST_BOOL__", false));
        std::env::remove_var("__FDS_TEST_BOOL__");
    }
}
