//! Thin unix syscall layer: `select(2)` and the open-descriptor probe.

use std::ptr;

use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg};

use fdselect_core::Handle;

use crate::fdset::FdSet;

const MICROS_PER_SEC: u64 = 1_000_000;

/// Convert a microsecond timeout into a `timeval`.
///
/// Zero means "no timeout" (block until ready) and yields `None`, which is
/// passed to the kernel as a null pointer.
pub(crate) fn timeval_from_micros(micros: u64) -> Option<libc::timeval> {
    if micros == 0 {
        return None;
    }
    Some(libc::timeval {
        tv_sec: (micros / MICROS_PER_SEC) as libc::time_t,
        tv_usec: (micros % MICROS_PER_SEC) as libc::suseconds_t,
    })
}

/// One `select(2)` call with no exceptional set. Returns the ready count.
///
/// `nfds` is the scan limit: highest handle + 1.
pub(crate) fn select(
    nfds: Handle,
    read: &mut FdSet,
    write: &mut FdSet,
    timeout: Option<libc::timeval>,
) -> Result<usize, Errno> {
    let mut timeout = timeout;
    let timeout_ptr = match timeout.as_mut() {
        Some(tv) => tv as *mut libc::timeval,
        None => ptr::null_mut(),
    };

    // SAFETY: both sets are valid fd_sets owned by the caller for the
    // duration of the call, and the timeval (if any) lives on this stack.
    let n = unsafe {
        libc::select(
            nfds,
            read.as_mut_ptr(),
            write.as_mut_ptr(),
            ptr::null_mut(),
            timeout_ptr,
        )
    };
    if n < 0 {
        return Err(Errno::last());
    }
    Ok(n as usize)
}

/// True unless the kernel says `fd` is not an open descriptor.
pub(crate) fn is_open(fd: Handle) -> bool {
    !matches!(fcntl(fd, FcntlArg::F_GETFD), Err(Errno::EBADF))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::AsRawFd;
    use std::os::unix::net::UnixStream;
    use std::time::{Duration, Instant};

    #[test]
    fn test_zero_timeout_blocks_forever() {
        assert!(timeval_from_micros(0).is_none());
    }

    #[test]
    fn test_timeout_split() {
        let tv = timeval_from_micros(2_500_000).unwrap();
        assert_eq!(tv.tv_sec, 2);
        assert_eq!(tv.tv_usec, 500_000);

        let tv = timeval_from_micros(100).unwrap();
        assert_eq!(tv.tv_sec, 0);
        assert_eq!(tv.tv_usec, 100);

        let tv = timeval_from_micros(3_000_000).unwrap();
        assert_eq!(tv.tv_sec, 3);
        assert_eq!(tv.tv_usec, 0);
    }

    #[test]
    fn test_select_times_out_with_empty_sets() {
        let mut r = FdSet::new();
        let mut w = FdSet::new();
        let start = Instant::now();
        let n = select(1, &mut r, &mut w, timeval_from_micros(2_000)).unwrap();
        assert_eq!(n, 0);
        assert!(start.elapsed() >= Duration::from_micros(2_000));
    }

    #[test]
    fn test_is_open() {
        let (a, _b) = UnixStream::pair().unwrap();
        assert!(is_open(a.as_raw_fd()));
        assert!(!is_open(-1));
    }
}
