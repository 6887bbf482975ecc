//! Correlated request dispatch on Client.
//!
//! Every call registers a one-shot waiter under a fresh token, stamps the
//! token into `@extra`, hands the request to the transport and waits. The
//! receive thread completes the waiter; the caller removes it on timeout.
//! Whichever side takes the registry entry first owns the outcome.

use std::time::Duration;

use bytes::Bytes;
use tokio::time;
use tracing::debug;

use crate::error::{Result, TdError};
use crate::message::{Message, Request};
use crate::registry::Keyspace;
use crate::Client;

impl Client {
    // ========================================
    // Correlated Dispatch
    // ========================================

    /// Send `request` and wait for its reply as a parsed [`Message`].
    ///
    /// Uses the client's default request timeout. The reply is returned as
    /// is; an `error` reply is not translated here.
    pub async fn call(&self, request: Request) -> Result<Message> {
        self.call_with_timeout(request, self.inner.options.request_timeout)
            .await
    }

    /// [`Client::call`] with an explicit deadline.
    pub async fn call_with_timeout(&self, request: Request, timeout: Duration) -> Result<Message> {
        self.roundtrip(self.inner.registry.replies(), request, timeout)
            .await
    }

    /// Send `request` and wait for the reply's original bytes.
    ///
    /// Use this when the reply must be strictly decoded without going through
    /// a generic JSON value first.
    pub async fn call_raw(&self, request: Request) -> Result<Bytes> {
        self.call_raw_with_timeout(request, self.inner.options.request_timeout)
            .await
    }

    /// [`Client::call_raw`] with an explicit deadline.
    pub async fn call_raw_with_timeout(&self, request: Request, timeout: Duration) -> Result<Bytes> {
        self.roundtrip(self.inner.registry.raw_replies(), request, timeout)
            .await
    }

    /// Run a request the native client answers synchronously.
    ///
    /// No token is attached and the receive thread is not involved.
    pub fn execute(&self, request: &Request) -> Result<Message> {
        self.inner.shutdown.check()?;
        let reply = self.inner.transport.execute(&request.to_json()?)?;
        match reply {
            Some(raw) => Message::parse(raw),
            None => Err(TdError::transport(format!(
                "no synchronous reply to {}",
                request.kind().unwrap_or("request")
            ))),
        }
    }

    async fn roundtrip<T: Send>(
        &self,
        waiters: &Keyspace<T>,
        mut request: Request,
        timeout: Duration,
    ) -> Result<T> {
        let inner = &self.inner;
        inner.shutdown.check()?;

        let (token, mut reply) = waiters.register();
        // Shutdown may have cleared the registry between the check and the insert.
        if inner.shutdown.is_triggered() {
            waiters.take(&token);
            return Err(TdError::Closed);
        }

        request.set_extra(token.as_str());
        let sent = request
            .to_json()
            .and_then(|json| inner.transport.send(&json));
        if let Err(e) = sent {
            waiters.take(&token);
            return Err(e);
        }
        debug!(%token, kind = request.kind().unwrap_or_default(), "Sent request");

        match time::timeout(timeout, &mut reply).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(TdError::Closed),
            Err(_) => {
                if waiters.take(&token).is_some() {
                    debug!(%token, "Request timed out after {:?}", timeout);
                    return Err(TdError::Timeout {
                        token: token.to_string(),
                        after: timeout,
                    });
                }
                // The receive thread took the waiter first and completes it
                // without blocking; collect what it delivered.
                debug!(%token, "Reply raced the deadline, keeping it");
                reply.await.map_err(|_| TdError::Closed)
            }
        }
    }
}
