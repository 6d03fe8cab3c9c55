//! select() Echo Server
//!
//! Single-threaded TCP echo server driven entirely by one
//! `fdselect::ReadinessSet`: the listener is registered for Read, every
//! accepted connection for Read, and for Write only while it has unsent
//! bytes.
//!
//! Usage:
//!     cargo build --release -p select-echo
//!     ./target/release/select-echo [port] [max_conns]
//!
//! Test with:
//!     echo "hello" | nc localhost 9999
//!
//! Environment:
//!     FDS_ECHO_TICK_US   wait timeout per loop iteration (default 1s, 0 = block)
//!     RUST_LOG / FDS_LOG_LEVEL   log filter

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::rc::Rc;

use fdselect::{Endpoint, Handle, Interest, ReadinessSet, SelectConfig, SelectResult};
use fdselect::env::env_get;
use tracing::{debug, info, trace, warn};

const BUF_SIZE: usize = 4096;

/// Everything the set watches. The listener and connections share one
/// endpoint type so a single set covers both.
enum Peer {
    Listener(TcpListener),
    Client {
        stream: TcpStream,
        /// Received but not yet echoed
        pending: RefCell<Vec<u8>>,
    },
}

impl Endpoint for Peer {
    fn handle(&self) -> Handle {
        match self {
            Peer::Listener(listener) => listener.handle(),
            Peer::Client { stream, .. } => stream.handle(),
        }
    }
}

/// What to do with a connection after servicing it.
enum Next {
    Keep,
    Close,
}

struct Server {
    set: ReadinessSet<Peer>,
    /// Owns every endpoint; the set only holds weak references.
    peers: HashMap<Handle, Rc<Peer>>,
    max_conns: usize,
}

impl Server {
    fn new(listener: TcpListener, max_conns: usize) -> SelectResult<Self> {
        let config = SelectConfig::from_env();
        config.validate()?;

        listener.set_nonblocking(true)?;
        let listener = Rc::new(Peer::Listener(listener));

        let mut set = ReadinessSet::with_config(config);
        set.register(&listener, Interest::Read)?;

        let mut peers = HashMap::new();
        peers.insert(listener.handle(), listener);
        Ok(Self { set, peers, max_conns })
    }

    fn run(&mut self, tick_us: u64) -> SelectResult<()> {
        loop {
            let (readable, writable) = self.set.wait(tick_us)?;
            if readable.is_empty() && writable.is_empty() {
                trace!(conns = self.peers.len() - 1, "idle");
                continue;
            }

            for peer in readable {
                match &*peer {
                    Peer::Listener(listener) => self.accept_all(listener)?,
                    Peer::Client { stream, pending } => {
                        if let Next::Close = self.on_readable(&peer, stream, pending)? {
                            self.close(peer.handle());
                        }
                    }
                }
            }

            for peer in writable {
                let handle = peer.handle();
                // Closed while handling the read list
                if !self.peers.contains_key(&handle) {
                    continue;
                }
                if let Peer::Client { stream, pending } = &*peer {
                    if let Next::Close = self.on_writable(handle, stream, pending) {
                        self.close(handle);
                    }
                }
            }
        }
    }

    fn accept_all(&mut self, listener: &TcpListener) -> SelectResult<()> {
        loop {
            let (stream, addr) = match listener.accept() {
                Ok(accepted) => accepted,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e.into()),
            };

            // Listener counts as one peer
            if self.peers.len() > self.max_conns {
                warn!(%addr, max = self.max_conns, "connection limit reached, dropping");
                continue;
            }

            stream.set_nonblocking(true)?;
            let peer = Rc::new(Peer::Client {
                stream,
                pending: RefCell::new(Vec::new()),
            });

            // A handle past FD_SETSIZE cannot be watched; drop the connection.
            if let Err(e) = self.set.register(&peer, Interest::Read) {
                warn!(%addr, error = %e, "cannot watch connection");
                continue;
            }
            debug!(%addr, handle = peer.handle(), "accepted");
            self.peers.insert(peer.handle(), peer);
        }
    }

    fn on_readable(
        &mut self,
        peer: &Rc<Peer>,
        mut stream: &TcpStream,
        pending: &RefCell<Vec<u8>>,
    ) -> SelectResult<Next> {
        let mut buf = [0u8; BUF_SIZE];
        match stream.read(&mut buf) {
            Ok(0) => {
                if pending.borrow().is_empty() {
                    return Ok(Next::Close);
                }
                // Peer half-closed: stop reading, close once the echo drains
                self.set.unregister(peer.handle(), Interest::Read);
                return Ok(Next::Keep);
            }
            Ok(n) => pending.borrow_mut().extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(Next::Keep),
            Err(e) => {
                debug!(handle = peer.handle(), error = %e, "read failed");
                return Ok(Next::Close);
            }
        }
        // Watch for writability until the echo is flushed
        self.set.register(peer, Interest::Write)?;
        Ok(Next::Keep)
    }

    fn on_writable(
        &mut self,
        handle: Handle,
        mut stream: &TcpStream,
        pending: &RefCell<Vec<u8>>,
    ) -> Next {
        let mut pending = pending.borrow_mut();
        match stream.write(&pending) {
            Ok(n) => {
                pending.drain(..n);
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Next::Keep,
            Err(e) => {
                debug!(handle, error = %e, "write failed");
                return Next::Close;
            }
        }
        if pending.is_empty() {
            self.set.unregister(handle, Interest::Write);
            if !self.set.contains(handle, Interest::Read) {
                return Next::Close;
            }
        }
        Next::Keep
    }

    /// Unregister before the endpoint (and its handle) is dropped.
    fn close(&mut self, handle: Handle) {
        for interest in Interest::ALL {
            self.set.unregister(handle, interest);
        }
        if self.peers.remove(&handle).is_some() {
            debug!(handle, conns = self.peers.len() - 1, "closed");
        }
    }
}

fn main() -> SelectResult<()> {
    fdselect::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let port: u16 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(9999);
    let max_conns: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(256);
    let tick_us: u64 = env_get("FDS_ECHO_TICK_US", 1_000_000);

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))?;
    info!(port, max_conns, tick_us, "select-echo listening");

    let mut server = Server::new(listener, max_conns)?;
    server.run(tick_us)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Shutdown;
    use std::time::Duration;

    /// Serve `listener` on a background thread. The server is `!Send`, so it
    /// is built on the thread that runs it.
    fn spawn_server(listener: TcpListener) {
        std::thread::spawn(move || {
            let mut server = Server::new(listener, 16).unwrap();
            let _ = server.run(10_000);
        });
    }

    fn connect() -> TcpStream {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let addr = listener.local_addr().unwrap();
        spawn_server(listener);
        let client = TcpStream::connect(addr).unwrap();
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        client
    }

    #[test]
    fn test_echo_flushes_before_half_close() {
        let mut client = connect();
        client.write_all(b"hello\n").unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut echoed = Vec::new();
        client.read_to_end(&mut echoed).unwrap();
        assert_eq!(echoed, b"hello\n");
    }

    #[test]
    fn test_echo_round_trips_while_open() {
        let mut client = connect();
        client.write_all(b"ping").unwrap();

        let mut buf = [0u8; 4];
        client.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");

        client.shutdown(Shutdown::Write).unwrap();
        let mut rest = Vec::new();
        client.read_to_end(&mut rest).unwrap();
        assert!(rest.is_empty());
    }
}
