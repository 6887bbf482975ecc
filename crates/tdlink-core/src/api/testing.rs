//! Connectivity test calls on Client.
//!
//! These exercise the full request path without touching any account state,
//! which makes them handy for health checks.

use crate::error::Result;
use crate::message::Request;
use crate::types::{self, TestInt, Text};
use crate::Client;

use super::{decode_raw_reply, decode_reply};

impl Client {
    /// Does nothing; answers with `ok`.
    pub async fn test_call_empty(&self) -> Result<types::Ok> {
        decode_reply(&self.call(Request::new("testCallEmpty")).await?, "ok")
    }

    /// Echoes `x` back.
    pub async fn test_call_string(&self, x: &str) -> Result<Text> {
        let request = Request::new("testCallString").with("x", x)?;
        decode_reply(&self.call(request).await?, "text")
    }

    /// Squares `x`.
    pub async fn test_square_int(&self, x: i32) -> Result<TestInt> {
        let request = Request::new("testSquareInt").with("x", x)?;
        decode_raw_reply(self.call_raw(request).await?, "testInt")
    }
}
