//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CRM_*` environment variables and an optional
//! configuration file, in that order of precedence.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    DEFAULT_FOLLOW_UP_DAYS, DEFAULT_RETOUCH_DAYS, DEFAULT_UNDO_CAPACITY, FollowUpPolicy,
};

const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 5000);

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `undo_capacity` was set to zero.
    #[error("undo capacity must be at least 1")]
    ZeroUndoCapacity,
}

/// Configuration values for the CRM service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CRM")]
pub struct CrmSettings {
    /// Directory holding `crm_data.json` and `crm_undo.json`.
    pub data_dir: Option<PathBuf>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Maximum number of undo snapshots kept.
    pub undo_capacity: Option<usize>,
    /// Days from a service to its follow-up.
    pub follow_up_days: Option<u32>,
    /// Days from a touch-up to the next one. Zero means same day.
    pub retouch_days: Option<u32>,
    /// Keep records in memory only.
    #[ortho_config(default = false)]
    pub ephemeral: bool,
}

impl CrmSettings {
    /// Return the data directory, falling back to the working directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Return the bind address, falling back to `0.0.0.0:5000`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the undo capacity.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroUndoCapacity`] when configured as zero.
    pub fn undo_capacity(&self) -> Result<NonZeroUsize, SettingsError> {
        match self.undo_capacity {
            None => Ok(DEFAULT_UNDO_CAPACITY),
            Some(value) => NonZeroUsize::new(value).ok_or(SettingsError::ZeroUndoCapacity),
        }
    }

    /// Follow-up offsets built from the configured day counts.
    #[must_use]
    pub fn policy(&self) -> FollowUpPolicy {
        FollowUpPolicy::new(
            self.follow_up_days.unwrap_or(DEFAULT_FOLLOW_UP_DAYS),
            self.retouch_days.unwrap_or(DEFAULT_RETOUCH_DAYS),
        )
    }
}
