//! Correlation registry of outstanding requests.
//!
//! Maps correlation tokens to single-use waiters. Two independent keyspaces
//! exist, one delivering parsed [`Message`]s and one delivering raw bytes; a
//! request registers in exactly one of them.
//!
//! # Thread Safety
//!
//! Each keyspace is split into shards, each guarded by its own mutex, so
//! unrelated requests rarely contend. Locks are held only for the duration of
//! a single map operation and never across an `.await`.

use crate::config::Defaults;
use crate::message::Message;
use crate::token::Token;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::hash_map::{Entry, RandomState};
use std::collections::HashMap;
use std::hash::BuildHasher;
use tokio::sync::oneshot;
use tracing::debug;

/// Single-use delivery handle for one correlated reply.
pub type Waiter<T> = oneshot::Sender<T>;

/// One token → waiter keyspace.
pub struct Keyspace<T> {
    shards: Box<[Mutex<HashMap<Token, Waiter<T>>>]>,
    hasher: RandomState,
}

impl<T> Keyspace<T> {
    fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    fn shard(&self, token: &Token) -> &Mutex<HashMap<Token, Waiter<T>>> {
        let index = (self.hasher.hash_one(token) as usize) % self.shards.len();
        &self.shards[index]
    }

    /// Mint a token and register a fresh waiter under it.
    ///
    /// A token that is still registered is never handed out again; on the
    /// (practically impossible) collision a new token is minted.
    pub fn register(&self) -> (Token, oneshot::Receiver<T>) {
        loop {
            let token = Token::mint();
            let mut shard = self.shard(&token).lock();
            if let Entry::Vacant(slot) = shard.entry(token.clone()) {
                let (tx, rx) = oneshot::channel();
                slot.insert(tx);
                return (token, rx);
            }
            debug!(%token, "correlation token collision, minting another");
        }
    }

    /// Atomically remove and return the waiter for `token`.
    ///
    /// When the receive loop and a timing-out caller race on the same token,
    /// exactly one of them gets `Some`.
    pub fn take(&self, token: &Token) -> Option<Waiter<T>> {
        self.shard(token).lock().remove(token)
    }

    /// Check whether `token` is still outstanding.
    pub fn contains(&self, token: &Token) -> bool {
        self.shard(token).lock().contains_key(token)
    }

    /// Number of outstanding waiters.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every waiter, waking their receivers with a closed error.
    fn clear(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                let mut shard = shard.lock();
                let count = shard.len();
                shard.clear();
                count
            })
            .sum()
    }
}

/// Outstanding requests of one client, split by delivery flavor.
pub struct CorrelationRegistry {
    replies: Keyspace<Message>,
    raw_replies: Keyspace<Bytes>,
}

impl Default for CorrelationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationRegistry {
    pub fn new() -> Self {
        Self::with_shards(Defaults::REGISTRY_SHARDS)
    }

    pub fn with_shards(shard_count: usize) -> Self {
        Self {
            replies: Keyspace::new(shard_count),
            raw_replies: Keyspace::new(shard_count),
        }
    }

    /// Waiters that receive the parsed message.
    pub fn replies(&self) -> &Keyspace<Message> {
        &self.replies
    }

    /// Waiters that receive the original bytes.
    pub fn raw_replies(&self) -> &Keyspace<Bytes> {
        &self.raw_replies
    }

    /// Check whether `token` is outstanding in either keyspace.
    pub fn contains(&self, token: &Token) -> bool {
        self.replies.contains(token) || self.raw_replies.contains(token)
    }

    /// Total outstanding waiters across both keyspaces.
    pub fn len(&self) -> usize {
        self.replies.len() + self.raw_replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all waiters. Returns how many were outstanding.
    pub fn clear(&self) -> usize {
        self.replies.clear() + self.raw_replies.clear()
    }
}
