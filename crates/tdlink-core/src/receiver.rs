//! Receive loop: pulls messages off the transport and routes them.
//!
//! The native `receive` call blocks, so the loop runs on its own OS thread
//! rather than on the async runtime. Each message goes to exactly one place:
//! the generic waiter for its `@extra`, the raw waiter for its `@extra`, the
//! update queue (no `@extra`, has `@type`), or nowhere.

use crate::config::Defaults;
use crate::error::{Result, TdError};
use crate::message::Message;
use crate::registry::CorrelationRegistry;
use crate::shutdown::ShutdownSignal;
use crate::token::Token;
use crate::transport::Transport;
use crate::updates::UpdateQueue;
use bytes::Bytes;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where a received message ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    /// Delivered to a generic-mapping waiter.
    Reply,
    /// Delivered to a raw-bytes waiter.
    RawReply,
    /// Carried an `@extra` nobody is waiting for.
    Orphaned,
    /// Pushed onto the update queue.
    Update,
    /// Valid JSON object with neither `@extra` nor `@type`.
    Unroutable,
    /// Not a JSON object.
    Malformed,
}

/// Stateless routing step shared by the receive thread and tests.
pub(crate) struct Router {
    registry: Arc<CorrelationRegistry>,
    updates: Arc<UpdateQueue>,
}

impl Router {
    pub(crate) fn new(registry: Arc<CorrelationRegistry>, updates: Arc<UpdateQueue>) -> Self {
        Self { registry, updates }
    }

    pub(crate) fn route(&self, raw: Bytes) -> Route {
        let message = match Message::parse(raw) {
            Ok(message) => message,
            Err(e) => {
                debug!("Dropping malformed inbound message: {}", e);
                return Route::Malformed;
            }
        };

        if let Some(extra) = message.extra() {
            let token = Token::from(extra);

            if let Some(waiter) = self.registry.replies().take(&token) {
                // A dropped receiver means the caller gave up; nothing to do.
                let _ = waiter.send(message);
                return Route::Reply;
            }
            if let Some(waiter) = self.registry.raw_replies().take(&token) {
                let _ = waiter.send(message.into_raw());
                return Route::RawReply;
            }

            debug!(
                %token,
                kind = message.kind().unwrap_or_default(),
                "No waiter for reply, discarding"
            );
            return Route::Orphaned;
        }

        if message.has_extra() {
            // Tokens are always strings; nothing can be waiting for this one.
            debug!(
                kind = message.kind().unwrap_or_default(),
                "Discarding reply with non-string @extra"
            );
            return Route::Orphaned;
        }

        if message.kind().is_some() {
            self.updates.push(message);
            return Route::Update;
        }

        debug!("Dropping inbound message without @type or @extra");
        Route::Unroutable
    }
}

/// Handle to a running receive thread. Dropping stops and joins it.
pub(crate) struct ReceiveLoopHandle {
    shutdown: ShutdownSignal,
    thread: Option<JoinHandle<()>>,
}

impl ReceiveLoopHandle {
    /// Spawn the receive thread.
    pub(crate) fn spawn(
        transport: Arc<dyn Transport>,
        router: Router,
        poll_interval: Duration,
        shutdown: ShutdownSignal,
    ) -> Result<Self> {
        let signal = shutdown.clone();
        let thread = std::thread::Builder::new()
            .name(Defaults::RECEIVE_THREAD_NAME.to_string())
            .spawn(move || Self::run(transport.as_ref(), &router, poll_interval, &signal))
            .map_err(|e| TdError::transport(format!("Failed to spawn receive thread: {}", e)))?;

        info!("Started receive loop (poll interval {:?})", poll_interval);

        Ok(Self {
            shutdown,
            thread: Some(thread),
        })
    }

    fn run(
        transport: &dyn Transport,
        router: &Router,
        poll_interval: Duration,
        shutdown: &ShutdownSignal,
    ) {
        while !shutdown.is_triggered() {
            if let Some(raw) = transport.receive(poll_interval) {
                router.route(raw);
            }
        }
        debug!("Receive loop stopping");
    }

    /// Signal the thread and wait for it to exit.
    ///
    /// Blocks for at most one poll interval plus the time to route the
    /// message in hand.
    pub(crate) fn stop(&mut self) {
        self.shutdown.trigger();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Receive thread panicked");
            }
        }
    }
}

impl Drop for ReceiveLoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
