//! Interest kinds

use core::fmt;

/// Which readiness condition a caller wants to learn about.
///
/// A handle may be registered under both kinds; each (handle, kind) pair
/// is tracked once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interest {
    /// Data can be read without blocking (or the peer hung up).
    Read,
    /// Data can be written without blocking.
    Write,
}

impl Interest {
    /// Both kinds, in the order results are reported.
    pub const ALL: [Interest; 2] = [Interest::Read, Interest::Write];

    pub fn is_read(self) -> bool {
        matches!(self, Interest::Read)
    }

    pub fn is_write(self) -> bool {
        matches!(self, Interest::Write)
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interest::Read => write!(f, "read"),
            Interest::Write => write!(f, "write"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(Interest::Read.is_read());
        assert!(!Interest::Read.is_write());
        assert!(Interest::Write.is_write());
        assert_eq!(Interest::ALL, [Interest::Read, Interest::Write]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Interest::Read), "read");
        assert_eq!(format!("{}", Interest::Write), "write");
    }
}
