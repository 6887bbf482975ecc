//! Boundary to the native JSON client.
//!
//! The dispatch core only ever talks to the native library through the four
//! operations of [`Transport`]. Connection handling, persistence and
//! cryptography all live on the other side of this trait.
//!
//! # Implementations
//!
//! - [`MemoryTransport`]: in-process loopback with an optional responder,
//!   used by tests and by embedders that bridge to something other than TDLib
//! - `NativeTransport` (feature `tdjson`): FFI to `libtdjson`

use crate::error::Result;
use bytes::Bytes;
use std::time::Duration;

pub mod memory;
#[cfg(feature = "tdjson")]
#[allow(unsafe_code)]
pub mod native;

pub use memory::MemoryTransport;
#[cfg(feature = "tdjson")]
pub use native::NativeTransport;

/// Operations exposed by a native JSON client instance.
///
/// Implementations must tolerate `send` and `execute` being called from many
/// threads while one thread sits in `receive`. If the underlying client cannot
/// do that, the implementation serializes access itself.
pub trait Transport: Send + Sync + 'static {
    /// Queue a request. Returns once the request has been handed over.
    fn send(&self, request: &str) -> Result<()>;

    /// Block for up to `timeout` waiting for the next inbound message.
    ///
    /// Returns `None` when nothing arrived in time or the transport is gone.
    fn receive(&self, timeout: Duration) -> Option<Bytes>;

    /// Run a request that the native client answers synchronously.
    fn execute(&self, request: &str) -> Result<Option<Bytes>>;

    /// Release the native instance. Must be idempotent.
    ///
    /// The client calls this only after its receive thread has stopped.
    fn destroy(&self);
}
