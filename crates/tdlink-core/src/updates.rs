//! Stream of unsolicited updates.
//!
//! The receive loop pushes every message that carries a discriminator but no
//! correlation token. The queue is bounded: when it is full the oldest
//! buffered update is dropped so the receive thread never blocks on a slow or
//! absent consumer.

use crate::message::Message;
use futures::stream::{self, Stream};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::warn;

struct QueueState {
    messages: VecDeque<Message>,
    dropped: u64,
    closed: bool,
}

/// Bounded drop-oldest queue shared by the receive loop and consumers.
pub(crate) struct UpdateQueue {
    state: Mutex<QueueState>,
    available: Notify,
    capacity: usize,
}

impl UpdateQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                messages: VecDeque::with_capacity(capacity.min(1024)),
                dropped: 0,
                closed: false,
            }),
            available: Notify::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append an update, evicting the oldest one when full.
    ///
    /// Returns `false` if the queue is closed and the update was discarded.
    pub(crate) fn push(&self, message: Message) -> bool {
        {
            let mut state = self.state.lock();
            if state.closed {
                return false;
            }
            if state.messages.len() >= self.capacity {
                if let Some(evicted) = state.messages.pop_front() {
                    state.dropped += 1;
                    warn!(
                        kind = evicted.kind().unwrap_or_default(),
                        dropped_total = state.dropped,
                        capacity = self.capacity,
                        "update queue full, dropped oldest update"
                    );
                }
            }
            state.messages.push_back(message);
        }
        self.available.notify_one();
        true
    }

    fn pop(&self) -> (Option<Message>, bool) {
        let mut state = self.state.lock();
        (state.messages.pop_front(), state.closed)
    }

    /// Stop accepting updates and wake every waiting consumer.
    ///
    /// Buffered updates stay readable.
    pub(crate) fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_waiters();
    }

    fn len(&self) -> usize {
        self.state.lock().messages.len()
    }

    fn dropped(&self) -> u64 {
        self.state.lock().dropped
    }
}

/// Consumer handle for the update stream.
///
/// Cheap to clone; clones share one queue, so each update is delivered to
/// exactly one consumer.
#[derive(Clone)]
pub struct Updates {
    queue: Arc<UpdateQueue>,
}

impl Updates {
    pub(crate) fn new(queue: Arc<UpdateQueue>) -> Self {
        Self { queue }
    }

    /// Wait for the next update.
    ///
    /// Returns `None` once the client has shut down and the buffer is drained.
    pub async fn recv(&self) -> Option<Message> {
        loop {
            let notified = self.queue.available.notified();
            tokio::pin!(notified);
            // Register before checking so a push between the check and the
            // await is not missed.
            notified.as_mut().enable();

            match self.queue.pop() {
                (Some(message), _) => return Some(message),
                (None, true) => return None,
                (None, false) => notified.await,
            }
        }
    }

    /// Take the next update if one is already buffered.
    pub fn try_recv(&self) -> Option<Message> {
        self.queue.pop().0
    }

    /// Number of updates currently buffered.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total updates evicted because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }

    /// Adapt into a `futures` stream that ends when the client shuts down.
    pub fn into_stream(self) -> impl Stream<Item = Message> {
        stream::unfold(self, |updates| async move {
            let next = updates.recv().await?;
            Some((next, updates))
        })
    }
}
