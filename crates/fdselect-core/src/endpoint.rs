//! Endpoint capability trait
//!
//! The multiplexer never opens, reads, writes or closes endpoints. All it
//! needs is the OS handle, so that is the whole interface.

use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::{UnixDatagram, UnixListener, UnixStream};
use std::net::{TcpListener, TcpStream, UdpSocket};

/// OS-level endpoint handle (a file descriptor on unix).
pub type Handle = RawFd;

/// Anything backed by an OS handle that can be watched for readiness.
///
/// **Contract:**
/// - `handle()` must return the same value for the lifetime of the endpoint.
/// - The handle must stay open while the endpoint is registered with a
///   `ReadinessSet`. Closing it underneath a registration is a caller bug;
///   the set reports it as a wait failure at best.
pub trait Endpoint {
    /// The endpoint's OS handle.
    fn handle(&self) -> Handle;
}

macro_rules! impl_endpoint_for_fd {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Endpoint for $ty {
                #[inline]
                fn handle(&self) -> Handle {
                    self.as_raw_fd()
                }
            }
        )*
    };
}

impl_endpoint_for_fd!(
    TcpStream,
    TcpListener,
    UdpSocket,
    UnixStream,
    UnixListener,
    UnixDatagram,
);

impl<T: Endpoint + ?Sized> Endpoint for Box<T> {
    #[inline]
    fn handle(&self) -> Handle {
        (**self).handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_handles_match_raw_fd() {
        let (a, b) = UnixStream::pair().unwrap();
        assert_eq!(a.handle(), a.as_raw_fd());
        assert_ne!(a.handle(), b.handle());

        let udp = UdpSocket::bind("127.0.0.1:0").unwrap();
        assert_eq!(udp.handle(), udp.as_raw_fd());
    }

    #[test]
    fn test_boxed_dyn_endpoint() {
        let (a, _b) = UnixStream::pair().unwrap();
        let fd = a.as_raw_fd();
        let boxed: Box<dyn Endpoint> = Box::new(a);
        assert_eq!(boxed.handle(), fd);
    }
}
