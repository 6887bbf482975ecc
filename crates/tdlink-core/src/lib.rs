//! tdlink Core - request/response correlation over the TDLib JSON interface.
//!
//! The native client exposes a single inbound message stream that mixes
//! replies to requests with unsolicited updates. This crate turns it into an
//! async method-call API: each request is tagged with a random `@extra` token,
//! a dedicated receive thread routes replies back to the task that issued
//! them, and everything else lands on a bounded update stream.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tdlink_core::{Client, NativeTransport, TdlibParameters};
//!
//! #[tokio::main]
//! async fn main() -> tdlink_core::Result<()> {
//!     let client = Client::builder(Arc::new(NativeTransport::create()?))
//!         .tdlib_parameters(TdlibParameters::default())
//!         .build()
//!         .await?;
//!
//!     let version = client.get_option("version").await?;
//!     println!("TDLib version: {:?}", version);
//!
//!     let updates = client.updates();
//!     while let Some(update) = updates.recv().await {
//!         println!("update: {:?}", update.kind());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod message;
pub mod registry;
pub mod shutdown;
pub mod token;
pub mod transport;
pub mod types;
pub mod updates;

mod api;
mod receiver;

pub use api::ClientBuilder;
pub use config::{ClientOptions, Defaults, TdlibParameters};
pub use decode::Polymorphic;
pub use error::{Result, TdError};
pub use message::{Message, Request};
pub use registry::CorrelationRegistry;
pub use token::Token;
pub use transport::{MemoryTransport, Transport};
#[cfg(feature = "tdjson")]
pub use transport::NativeTransport;
pub use updates::Updates;

// Used by `polymorphic!` expansions in downstream crates.
#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}

use parking_lot::Mutex;
use receiver::{ReceiveLoopHandle, Router};
use shutdown::ShutdownSignal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use updates::UpdateQueue;

/// Handle to one native client instance.
///
/// Cheap to clone; all clones share the same transport, registry and receive
/// thread. The instance shuts down on [`Client::shutdown`] or when the last
/// clone is dropped.
///
/// Dropping the last clone joins the receive thread on the dropping thread,
/// which can block for up to one receive poll interval (1 s by default).
/// From async code, call `shutdown().await` before letting the client go;
/// it joins on the blocking pool instead.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

/// State shared by every clone of a [`Client`].
struct ClientInner {
    transport: Arc<dyn Transport>,
    registry: Arc<CorrelationRegistry>,
    updates: Arc<UpdateQueue>,
    options: ClientOptions,
    shutdown: ShutdownSignal,
    receive_loop: Mutex<Option<ReceiveLoopHandle>>,
    /// Set once the queue is closed and the transport destroyed.
    finished: AtomicBool,
}

impl Client {
    /// Create a builder for a client over `transport`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let client = Client::builder(Arc::new(MemoryTransport::new()))
    ///     .options(ClientOptions::new().with_request_timeout(Duration::from_secs(30)))
    ///     .build()
    ///     .await?;
    /// ```
    pub fn builder(transport: Arc<dyn Transport>) -> ClientBuilder {
        ClientBuilder::new(transport)
    }

    /// Start the receive thread and assemble the client.
    pub(crate) fn start(transport: Arc<dyn Transport>, options: ClientOptions) -> Result<Self> {
        options.validate()?;

        let registry = Arc::new(CorrelationRegistry::new());
        let updates = Arc::new(UpdateQueue::new(options.update_capacity));
        let shutdown = ShutdownSignal::new();

        let receive_loop = ReceiveLoopHandle::spawn(
            transport.clone(),
            Router::new(registry.clone(), updates.clone()),
            options.receive_poll_interval,
            shutdown.clone(),
        )?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                registry,
                updates,
                options,
                shutdown,
                receive_loop: Mutex::new(Some(receive_loop)),
                finished: AtomicBool::new(false),
            }),
        })
    }

    /// Options this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    /// A consumer handle for the update stream.
    ///
    /// Handles share one queue: each update is delivered to exactly one of
    /// them.
    pub fn updates(&self) -> Updates {
        Updates::new(self.inner.updates.clone())
    }

    /// Number of requests still waiting for a reply.
    pub fn pending_requests(&self) -> usize {
        self.inner.registry.len()
    }

    /// Whether a reply for `token` is still awaited.
    pub fn is_pending(&self, token: &Token) -> bool {
        self.inner.registry.contains(token)
    }

    /// Whether [`Client::shutdown`] has run or begun.
    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_triggered()
    }

    /// Stop the receive thread and release the native instance.
    ///
    /// Pending calls fail with [`TdError::Closed`], consumers of the update
    /// stream drain what is buffered and then see the end of the stream, and
    /// every later call fails fast. Idempotent.
    ///
    /// Dropping this future early does not abandon the teardown: once the
    /// receive thread is being joined, the blocking task completes it.
    pub async fn shutdown(&self) {
        if self.inner.shutdown.trigger() {
            info!("Shutting down client");
        }

        let dropped = self.inner.registry.clear();
        if dropped > 0 {
            debug!("Woke {} pending callers", dropped);
        }

        let handle = self.inner.receive_loop.lock().take();
        if let Some(mut handle) = handle {
            // Joining waits up to one poll interval; keep it off the runtime.
            // The blocking task finishes the teardown even if this future is dropped.
            let inner = self.inner.clone();
            let join = tokio::task::spawn_blocking(move || {
                handle.stop();
                inner.finish();
            });
            if let Err(e) = join.await {
                warn!("Failed to join receive thread: {}", e);
            }
            self.inner.finish();
        }
        // Without the handle, an earlier call's blocking task owns the teardown.
    }
}

impl ClientInner {
    /// Tear-down steps that run once the receive thread is gone. Runs once.
    fn finish(&self) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        self.registry.clear();
        self.updates.close();
        self.transport.destroy();
        info!("Client shut down");
    }
}

impl Drop for ClientInner {
    fn drop(&mut self) {
        if *self.finished.get_mut() {
            return;
        }
        if self.shutdown.trigger() {
            debug!("Last client handle dropped, stopping receive loop");
        }
        self.registry.clear();
        if let Some(mut handle) = self.receive_loop.get_mut().take() {
            handle.stop();
        }
        self.finish();
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.inner.options)
            .field("pending_requests", &self.pending_requests())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
