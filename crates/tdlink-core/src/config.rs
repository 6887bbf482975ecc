//! Centralized configuration for tdlink.
//!
//! Compile-time defaults live on [`Defaults`]; per-client overrides are set
//! through [`ClientOptions`]. [`TdlibParameters`] is the startup bundle that is
//! forwarded to the native client without interpretation.

use crate::error::{Result, TdError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default values for the dispatch core.
pub struct Defaults;

impl Defaults {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const RECEIVE_POLL_INTERVAL: Duration = Duration::from_secs(1);
    pub const UPDATE_CAPACITY: usize = 1000;
    pub const TOKEN_LENGTH: usize = 16;
    pub const REGISTRY_SHARDS: usize = 16;
    pub const RECEIVE_THREAD_NAME: &'static str = "tdlink-receive";
}

/// Runtime options for a single client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Deadline applied to every `call`/`call_raw` without an explicit override.
    pub request_timeout: Duration,
    /// Timeout passed to each blocking `receive` on the transport.
    pub receive_poll_interval: Duration,
    /// Maximum number of buffered updates before the oldest are dropped.
    pub update_capacity: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Defaults::REQUEST_TIMEOUT,
            receive_poll_interval: Defaults::RECEIVE_POLL_INTERVAL,
            update_capacity: Defaults::UPDATE_CAPACITY,
        }
    }
}

impl ClientOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the receive poll interval.
    ///
    /// Shutdown waits at most this long for the receive thread to notice.
    pub fn with_receive_poll_interval(mut self, interval: Duration) -> Self {
        self.receive_poll_interval = interval;
        self
    }

    /// Set the update queue capacity.
    pub fn with_update_capacity(mut self, capacity: usize) -> Self {
        self.update_capacity = capacity;
        self
    }

    /// Reject option combinations the core cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(TdError::Config {
                message: "request_timeout must be greater than zero".to_string(),
            });
        }
        if self.receive_poll_interval.is_zero() {
            return Err(TdError::Config {
                message: "receive_poll_interval must be greater than zero".to_string(),
            });
        }
        if self.update_capacity == 0 {
            return Err(TdError::Config {
                message: "update_capacity must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Startup parameters for the native client.
///
/// Serialized field-for-field into the `setTdlibParameters` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TdlibParameters {
    pub use_test_dc: bool,
    pub database_directory: PathBuf,
    pub files_directory: PathBuf,
    pub database_encryption_key: String,
    pub use_file_database: bool,
    pub use_chat_info_database: bool,
    pub use_message_database: bool,
    pub use_secret_chats: bool,
    pub api_id: i32,
    pub api_hash: String,
    pub system_language_code: String,
    pub device_model: String,
    pub system_version: String,
    pub application_version: String,
}
