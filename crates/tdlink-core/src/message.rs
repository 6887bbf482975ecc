//! Wire messages exchanged with the native client.
//!
//! A received [`Message`] keeps two views of the same JSON object: the
//! original bytes, used for strict decoding into concrete shapes, and a
//! loosely-typed field map, used for routing on `@type` and `@extra`. Both are
//! produced once at parse time and never mutated, so they cannot diverge.

use crate::error::{Result, TdError};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Discriminator field naming a message's concrete variant.
pub const TYPE_FIELD: &str = "@type";
/// Correlation field linking a reply to its request.
pub const EXTRA_FIELD: &str = "@extra";
/// Discriminator value reserved for remote errors.
pub const ERROR_TYPE: &str = "error";

/// An inbound message with its raw and generic views.
#[derive(Debug, Clone)]
pub struct Message {
    raw: Bytes,
    fields: Map<String, Value>,
}

impl Message {
    /// Parse bytes into a message.
    ///
    /// Fails with [`TdError::Malformed`] unless the bytes hold a JSON object.
    pub fn parse(raw: impl Into<Bytes>) -> Result<Self> {
        let raw = raw.into();
        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(fields)) => Ok(Self { raw, fields }),
            Ok(other) => Err(TdError::Malformed {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
            Err(e) => Err(TdError::Malformed {
                message: e.to_string(),
            }),
        }
    }

    /// The `@type` discriminator, if present and a string.
    pub fn kind(&self) -> Option<&str> {
        self.fields.get(TYPE_FIELD).and_then(Value::as_str)
    }

    /// The `@extra` correlation token, if present and a string.
    pub fn extra(&self) -> Option<&str> {
        self.fields.get(EXTRA_FIELD).and_then(Value::as_str)
    }

    /// Whether an `@extra` field is present, whatever its value.
    pub fn has_extra(&self) -> bool {
        self.fields.contains_key(EXTRA_FIELD)
    }

    /// Look up a top-level field in the generic view.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The generic-mapping view.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The original bytes as received.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Consume the message, keeping only the original bytes.
    pub fn into_raw(self) -> Bytes {
        self.raw
    }

    /// Strictly decode the original bytes into a concrete shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.raw)?)
    }

    /// Whether this message is the reserved `error` variant.
    pub fn is_error(&self) -> bool {
        self.kind() == Some(ERROR_TYPE)
    }

    /// Translate an `error` reply into [`TdError::Remote`].
    ///
    /// Returns `None` for any other discriminator.
    pub fn remote_error(&self) -> Option<TdError> {
        if !self.is_error() {
            return None;
        }
        let code = self
            .get("code")
            .and_then(Value::as_i64)
            .and_then(|c| i32::try_from(c).ok())
            .unwrap_or_default();
        let message = self
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Some(TdError::Remote { code, message })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An outgoing request in generic-mapping form.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    fields: Map<String, Value>,
}

impl Request {
    /// Start a request whose `@type` names the operation.
    pub fn new(kind: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(TYPE_FIELD.to_string(), Value::String(kind.into()));
        Self { fields }
    }

    /// Build a request from an existing JSON object.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Set a field from any serializable value.
    ///
    /// Fails with [`TdError::Json`] if the value cannot be represented as JSON.
    pub fn with(mut self, field: impl Into<String>, value: impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.fields.insert(field.into(), value);
        Ok(self)
    }

    /// Merge every field of a serializable struct into the request.
    pub fn with_flattened(mut self, value: impl Serialize) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(extra) => {
                self.fields.extend(extra);
                Ok(self)
            }
            other => Err(TdError::Malformed {
                message: format!("cannot flatten {} into a request", json_kind(&other)),
            }),
        }
    }

    /// Set the `@extra` correlation token, replacing any existing value.
    pub fn set_extra(&mut self, token: &str) {
        self.fields
            .insert(EXTRA_FIELD.to_string(), Value::String(token.to_string()));
    }

    /// The `@type` discriminator.
    pub fn kind(&self) -> Option<&str> {
        self.fields.get(TYPE_FIELD).and_then(Value::as_str)
    }

    /// The generic-mapping view.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Encode as JSON text for the transport.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }
}
