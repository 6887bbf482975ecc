//! Proxy configuration methods on Client.

use crate::error::Result;
use crate::message::Request;
use crate::types::{Proxy, ProxyType};
use crate::Client;

use super::decode_reply;

impl Client {
    /// Register a proxy server, optionally enabling it right away.
    pub async fn add_proxy(
        &self,
        server: &str,
        port: i32,
        enable: bool,
        proxy_type: ProxyType,
    ) -> Result<Proxy> {
        let request = Request::new("addProxy")
            .with("server", server)?
            .with("port", port)?
            .with("enable", enable)?
            .with("type", proxy_type)?;
        decode_reply(&self.call(request).await?, "proxy")
    }
}
