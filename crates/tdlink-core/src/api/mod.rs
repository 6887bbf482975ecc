//! API implementation submodules.
//!
//! Each submodule contains `impl Client` blocks that extend the public API.
//! The struct definitions remain in `lib.rs`. Typed operations only build a
//! request, dispatch it and decode the reply.

mod builder;
mod dispatch;
mod logging;
mod network;
mod options;
mod session;
mod testing;
mod usernames;

pub use builder::ClientBuilder;

use crate::error::{Result, TdError};
use crate::message::Message;
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// Decode a single-shape reply whose `@type` must be `expected`.
///
/// Remote `error` replies become [`TdError::Remote`].
pub(crate) fn decode_reply<T: DeserializeOwned>(
    message: &Message,
    expected: &'static str,
) -> Result<T> {
    if let Some(err) = message.remote_error() {
        return Err(err);
    }
    match message.kind() {
        Some(kind) if kind == expected => message.decode(),
        Some(kind) => Err(TdError::UnknownVariant {
            category: expected,
            kind: kind.to_string(),
        }),
        None => Err(TdError::MissingDiscriminator { category: expected }),
    }
}

/// Same as [`decode_reply`] for replies obtained through `call_raw`.
pub(crate) fn decode_raw_reply<T: DeserializeOwned>(
    raw: Bytes,
    expected: &'static str,
) -> Result<T> {
    decode_reply(&Message::parse(raw)?, expected)
}
