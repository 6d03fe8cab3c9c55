//! # ReadinessSet — the select(2) multiplexer
//!
//! Holds the interest registry and answers "which of these endpoints are
//! ready?" with one `select(2)` call per wait:
//! 1. Upgrade every registered endpoint (fail if one was dropped)
//! 2. Compute the descriptor bound (highest registered handle)
//! 3. Build fresh read/write `fd_set`s from the interest collections
//! 4. Call `select(bound + 1, read, write, NULL, timeout)`
//! 5. Walk the handles in registration order and collect the ready endpoints
//!
//! Endpoints are not owned: the set keeps a `Weak` per handle and hands back
//! `Rc`s for the ready ones. Closing a registered endpoint's handle without
//! unregistering it first is a caller bug.
//!
//! The set is `!Send` and `!Sync` (it holds `Weak`), so registration and
//! waits are always serialized on the owning thread.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use fdselect_core::{Endpoint, Handle, Interest, RegistrationError, WaitError};
use tracing::{debug, error, trace, warn};

use crate::config::SelectConfig;
use crate::fdset::FdSet;
use crate::sys;

/// Result of a wait: (ready for read, ready for write), each in registration order.
pub type ReadyLists<E> = (Vec<Rc<E>>, Vec<Rc<E>>);

/// A mutable interest set over externally owned endpoints.
pub struct ReadinessSet<E: Endpoint + ?Sized> {
    /// handle → endpoint. Exactly one entry per registered handle.
    registry: HashMap<Handle, Weak<E>>,
    /// Handles with Read interest
    readers: HashSet<Handle>,
    /// Handles with Write interest
    writers: HashSet<Handle>,
    /// Registered handles, in first-registration order, no duplicates
    handles: Vec<Handle>,
    config: SelectConfig,
}

impl<E: Endpoint + ?Sized> ReadinessSet<E> {
    /// Create an empty set using `SelectConfig::default()` (env overrides applied).
    pub fn new() -> Self {
        Self::with_config(SelectConfig::default())
    }

    /// Create an empty set with an explicit configuration.
    pub fn with_config(config: SelectConfig) -> Self {
        Self {
            registry: HashMap::new(),
            readers: HashSet::new(),
            writers: HashSet::new(),
            handles: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Register `endpoint` for `interest`.
    ///
    /// Registering the same (handle, kind) twice is a no-op apart from
    /// refreshing the handle → endpoint mapping. A handle may be registered
    /// for both kinds.
    pub fn register(&mut self, endpoint: &Rc<E>, interest: Interest) -> Result<(), RegistrationError> {
        let handle = endpoint.handle();
        if let Err(e) = self.check_handle(handle) {
            warn!(handle, %interest, error = %e, "registration rejected");
            return Err(e);
        }

        let added = self.interest_mut(interest).insert(handle);
        self.registry.insert(handle, Rc::downgrade(endpoint));
        if !self.handles.contains(&handle) {
            self.handles.push(handle);
        }

        debug!(handle, %interest, added, registered = self.handles.len(), "registered");
        Ok(())
    }

    /// Drop `interest` for `handle`.
    ///
    /// The handle leaves the registry only once neither kind remains.
    /// Returns false if the (handle, kind) pair was not registered.
    pub fn unregister(&mut self, handle: Handle, interest: Interest) -> bool {
        if !self.interest_mut(interest).remove(&handle) {
            return false;
        }
        let forgotten = !self.readers.contains(&handle) && !self.writers.contains(&handle);
        if forgotten {
            self.registry.remove(&handle);
            self.handles.retain(|&h| h != handle);
        }
        debug!(handle, %interest, forgotten, registered = self.handles.len(), "unregistered");
        true
    }

    /// Forget every registration.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.readers.clear();
        self.writers.clear();
        self.handles.clear();
    }

    /// Number of distinct registered handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// True once at least one endpoint is registered.
    pub fn is_active(&self) -> bool {
        !self.handles.is_empty()
    }

    pub fn contains(&self, handle: Handle, interest: Interest) -> bool {
        match interest {
            Interest::Read => self.readers.contains(&handle),
            Interest::Write => self.writers.contains(&handle),
        }
    }

    /// Registered handles in registration order.
    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// Highest registered handle, or 0 when nothing is registered.
    ///
    /// Recomputed on every call: handles are neither contiguous nor sorted.
    pub fn descriptor_bound(&self) -> Handle {
        self.handles.iter().copied().max().unwrap_or(0)
    }

    /// Wait for readiness.
    ///
    /// `timeout_micros == 0` blocks until at least one endpoint is ready;
    /// there is no zero-wait poll. Any other value is the maximum wait in
    /// microseconds.
    ///
    /// Returns the endpoints ready for read and for write, each in
    /// registration order. An endpoint ready for both appears in both lists.
    /// Two empty lists mean the timeout elapsed.
    ///
    /// The query is attempted once; an interrupted call (`EINTR`) is
    /// reported as `WaitError::Select` like any other failure.
    pub fn wait(&self, timeout_micros: u64) -> Result<ReadyLists<E>, WaitError> {
        let endpoints = self.resolve()?;

        let bound = self.descriptor_bound();
        let mut readable: FdSet = self.readers.iter().copied().collect();
        let mut writable: FdSet = self.writers.iter().copied().collect();
        let timeout = sys::timeval_from_micros(timeout_micros);

        trace!(
            bound,
            timeout_micros,
            readers = self.readers.len(),
            writers = self.writers.len(),
            "select"
        );

        let ready = sys::select(bound + 1, &mut readable, &mut writable, timeout).map_err(|errno| {
            error!(bound, %errno, "select failed");
            WaitError::Select(errno)
        })?;

        if ready == 0 {
            trace!(timeout_micros, "select timed out");
            return Ok((Vec::new(), Vec::new()));
        }

        let mut for_read = Vec::new();
        let mut for_write = Vec::new();
        for (handle, endpoint) in endpoints {
            if readable.contains(handle) {
                for_read.push(Rc::clone(&endpoint));
            }
            if writable.contains(handle) {
                for_write.push(endpoint);
            }
        }

        trace!(ready, read = for_read.len(), write = for_write.len(), "select returned");
        Ok((for_read, for_write))
    }

    /// Upgrade every registration, in registration order.
    fn resolve(&self) -> Result<Vec<(Handle, Rc<E>)>, WaitError> {
        let mut endpoints = Vec::with_capacity(self.handles.len());
        for &handle in &self.handles {
            match self.registry.get(&handle).and_then(Weak::upgrade) {
                Some(endpoint) => endpoints.push((handle, endpoint)),
                None => {
                    warn!(handle, "registered endpoint was dropped");
                    return Err(WaitError::EndpointDropped(handle));
                }
            }
        }
        Ok(endpoints)
    }

    fn check_handle(&self, handle: Handle) -> Result<(), RegistrationError> {
        if handle < 0 {
            return Err(RegistrationError::Negative(handle));
        }
        let limit = self.config.handle_limit();
        if handle as usize >= limit {
            return Err(RegistrationError::OutOfBound { handle, limit });
        }
        if self.config.probe_closed && !sys::is_open(handle) {
            return Err(RegistrationError::Closed(handle));
        }
        Ok(())
    }

    fn interest_mut(&mut self, interest: Interest) -> &mut HashSet<Handle> {
        match interest {
            Interest::Read => &mut self.readers,
            Interest::Write => &mut self.writers,
        }
    }
}

impl<E: Endpoint + ?Sized> Default for ReadinessSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Endpoint + ?Sized> fmt::Debug for ReadinessSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut readers: Vec<Handle> = self.readers.iter().copied().collect();
        let mut writers: Vec<Handle> = self.writers.iter().copied().collect();
        readers.sort_unstable();
        writers.sort_unstable();
        f.debug_struct("ReadinessSet")
            .field("handles", &self.handles)
            .field("readers", &readers)
            .field("writers", &writers)
            .field("config", &self.config)
            .finish()
    }
}
