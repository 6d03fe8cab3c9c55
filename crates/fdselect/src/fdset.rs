//! Bounds-checked wrapper around the kernel `fd_set` bitmap.
//!
//! `FD_SET`/`FD_ISSET` on a descriptor outside `0..FD_SETSIZE` writes or
//! reads past the bitmap, so every entry point checks the range first.

use std::fmt;

use fdselect_core::Handle;

/// Number of descriptors one `fd_set` can represent (`FD_SETSIZE`).
pub const MAX_SELECT_HANDLES: usize = libc::FD_SETSIZE as usize;

/// A descriptor set as passed to `select(2)`.
#[derive(Clone)]
pub struct FdSet {
    raw: libc::fd_set,
}

impl FdSet {
    /// Create an empty set.
    pub fn new() -> Self {
        // SAFETY: fd_set is a plain bitmap, all-zero is a valid value and
        // FD_ZERO only writes within it.
        let mut raw: libc::fd_set = unsafe { std::mem::zeroed() };
        unsafe { libc::FD_ZERO(&mut raw) };
        Self { raw }
    }

    /// True if `fd` can be stored in a set.
    #[inline]
    pub fn fits(fd: Handle) -> bool {
        fd >= 0 && (fd as usize) < MAX_SELECT_HANDLES
    }

    /// Add `fd`. Returns false (and leaves the set untouched) if it does not fit.
    #[inline]
    pub fn insert(&mut self, fd: Handle) -> bool {
        if !Self::fits(fd) {
            return false;
        }
        // SAFETY: range checked above.
        unsafe { libc::FD_SET(fd, &mut self.raw) };
        true
    }

    /// Remove `fd`. Out-of-range handles are never members.
    #[inline]
    pub fn remove(&mut self, fd: Handle) {
        if Self::fits(fd) {
            // SAFETY: range checked above.
            unsafe { libc::FD_CLR(fd, &mut self.raw) };
        }
    }

    /// Membership test (`FD_ISSET`).
    #[inline]
    pub fn contains(&self, fd: Handle) -> bool {
        // SAFETY: range checked before touching the bitmap.
        Self::fits(fd) && unsafe { libc::FD_ISSET(fd, &self.raw) }
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut libc::fd_set {
        &mut self.raw
    }
}

impl Default for FdSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<Handle> = (0..MAX_SELECT_HANDLES as Handle)
            .filter(|&fd| self.contains(fd))
            .collect();
        f.debug_set().entries(members).finish()
    }
}

impl FromIterator<Handle> for FdSet {
    fn from_iter<I: IntoIterator<Item = Handle>>(iter: I) -> Self {
        let mut set = FdSet::new();
        for fd in iter {
            set.insert(fd);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains_remove() {
        let mut set = FdSet::new();
        assert!(!set.contains(3));
        assert!(set.insert(3));
        assert!(set.insert(64));
        assert!(set.contains(3));
        assert!(set.contains(64));
        assert!(!set.contains(4));

        set.remove(3);
        assert!(!set.contains(3));
        assert!(set.contains(64));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut set = FdSet::new();
        assert!(!set.insert(-1));
        assert!(!set.insert(MAX_SELECT_HANDLES as Handle));
        assert!(!set.contains(-1));
        assert!(!set.contains(MAX_SELECT_HANDLES as Handle));
        set.remove(-1);

        let last = MAX_SELECT_HANDLES as Handle - 1;
        assert!(set.insert(last));
        assert!(set.contains(last));
    }

    #[test]
    fn test_collect_and_debug() {
        let set: FdSet = [5, 1, 9].into_iter().collect();
        assert_eq!(format!("{:?}", set), "{1, 5, 9}");
    }
}
