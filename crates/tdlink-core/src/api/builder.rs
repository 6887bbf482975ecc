//! Builder for configuring Client initialization.

use std::sync::Arc;

use crate::config::{ClientOptions, TdlibParameters};
use crate::error::Result;
use crate::transport::Transport;
use crate::Client;
use tracing::debug;

/// Builder for configuring [`Client`] initialization.
///
/// # Example
///
/// ```rust,ignore
/// let client = Client::builder(transport)
///     .options(ClientOptions::new().with_update_capacity(10_000))
///     .tdlib_parameters(params)
///     .build()
///     .await?;
/// ```
pub struct ClientBuilder {
    transport: Arc<dyn Transport>,
    options: ClientOptions,
    tdlib_parameters: Option<TdlibParameters>,
}

impl ClientBuilder {
    /// Create a new builder over `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            options: ClientOptions::default(),
            tdlib_parameters: None,
        }
    }

    /// Replace the runtime options.
    ///
    /// Default: [`ClientOptions::default`]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Parameters sent as the first request once the client is running.
    ///
    /// They are forwarded verbatim through `setTdlibParameters`; `build`
    /// fails if the native client rejects them.
    ///
    /// Default: none (the caller sends them later, if at all)
    pub fn tdlib_parameters(mut self, parameters: TdlibParameters) -> Self {
        self.tdlib_parameters = Some(parameters);
        self
    }

    /// Build the client: start the receive thread, then forward the
    /// startup parameters if any were given.
    pub async fn build(self) -> Result<Client> {
        let client = Client::start(self.transport, self.options)?;

        if let Some(parameters) = self.tdlib_parameters {
            debug!("Forwarding TDLib parameters");
            if let Err(e) = client.set_tdlib_parameters(&parameters).await {
                client.shutdown().await;
                return Err(e);
            }
        }

        Ok(client)
    }
}
