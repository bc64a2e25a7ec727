//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use salon_crm::domain::{DEFAULT_UNDO_CAPACITY, FollowUpPolicy};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policy: FollowUpPolicy,
    pub(crate) undo_capacity: NonZeroUsize,
    pub(crate) data_dir: Option<Utf8PathBuf>,
}

impl ServerConfig {
    /// Construct a configuration that keeps records in memory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, policy: FollowUpPolicy) -> Self {
        Self {
            bind_addr,
            policy,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            data_dir: None,
        }
    }

    /// Persist records and undo history as JSON files in `data_dir`.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: Utf8PathBuf) -> Self {
        self.data_dir = Some(data_dir);
        self
    }

    /// Keep at most `undo_capacity` snapshots.
    #[must_use]
    pub fn with_undo_capacity(mut self, undo_capacity: NonZeroUsize) -> Self {
        self.undo_capacity = undo_capacity;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
