//! In-process loopback transport.
//!
//! Everything a client sends is recorded; inbound messages are whatever the
//! owner pushes, plus the output of an optional responder that sees each
//! request as it is sent. Replies produced by the responder inherit the
//! request's `@extra` so they correlate without the responder knowing tokens.

use super::Transport;
use crate::error::{Result, TdError};
use crate::message::EXTRA_FIELD;
use bytes::Bytes;
use parking_lot::{Condvar, Mutex};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// Produces an optional reply body for a request.
pub type Responder = Box<dyn Fn(&Value) -> Option<Value> + Send + Sync + 'static>;

/// Loopback [`Transport`] backed by in-memory queues.
#[derive(Default)]
pub struct MemoryTransport {
    inbound: Mutex<VecDeque<Bytes>>,
    arrived: Condvar,
    sent: Mutex<Vec<Value>>,
    sent_signal: Notify,
    responder: Option<Responder>,
    destroyed: AtomicBool,
}

impl MemoryTransport {
    /// Create a transport that never answers on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that answers requests with `responder`.
    ///
    /// Returning `None` leaves the request unanswered.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    /// Queue raw bytes for the next `receive`.
    pub fn push(&self, message: impl Into<Bytes>) {
        self.inbound.lock().push_back(message.into());
        self.arrived.notify_one();
    }

    /// Queue a JSON value for the next `receive`.
    pub fn push_json(&self, message: &Value) {
        self.push(message.to_string());
    }

    /// Queue `reply` as the answer to `request`, copying its `@extra`.
    pub fn reply_to(&self, request: &Value, mut reply: Value) {
        if let (Some(extra), Some(fields)) = (request.get(EXTRA_FIELD), reply.as_object_mut()) {
            fields
                .entry(EXTRA_FIELD)
                .or_insert_with(|| extra.clone());
        }
        self.push_json(&reply);
    }

    /// Every request sent so far, in send order.
    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().clone()
    }

    /// Wait until at least `count` requests have been sent.
    pub async fn wait_sent(&self, count: usize) -> Vec<Value> {
        loop {
            let notified = self.sent_signal.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            notified.await;
        }
    }

    /// Whether `destroy` has been called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn parse_request(request: &str) -> Result<Value> {
        serde_json::from_str(request)
            .map_err(|e| TdError::transport(format!("request is not valid JSON: {}", e)))
    }
}

impl Transport for MemoryTransport {
    fn send(&self, request: &str) -> Result<()> {
        if self.is_destroyed() {
            return Err(TdError::transport("transport destroyed"));
        }
        let request = Self::parse_request(request)?;

        self.sent.lock().push(request.clone());
        self.sent_signal.notify_waiters();

        if let Some(reply) = self.responder.as_ref().and_then(|respond| respond(&request)) {
            self.reply_to(&request, reply);
        }
        Ok(())
    }

    fn receive(&self, timeout: Duration) -> Option<Bytes> {
        let deadline = Instant::now() + timeout;
        let mut inbound = self.inbound.lock();
        loop {
            if let Some(message) = inbound.pop_front() {
                return Some(message);
            }
            if self.is_destroyed() {
                return None;
            }
            if self.arrived.wait_until(&mut inbound, deadline).timed_out() {
                return inbound.pop_front();
            }
        }
    }

    fn execute(&self, request: &str) -> Result<Option<Bytes>> {
        if self.is_destroyed() {
            return Err(TdError::transport("transport destroyed"));
        }
        let request = Self::parse_request(request)?;
        let reply = self.responder.as_ref().and_then(|respond| respond(&request));
        Ok(reply.map(|value| Bytes::from(value.to_string())))
    }

    fn destroy(&self) {
        // Hold the queue lock so a receiver between its flag check and its
        // wait cannot miss the wakeup.
        let _inbound = self.inbound.lock();
        self.destroyed.store(true, Ordering::SeqCst);
        self.arrived.notify_all();
    }
}
