use crate::polymorphic;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTypeSocks5 {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTypeHttp {
    pub username: String,
    pub password: String,
    /// Only HTTP requests may be sent through the proxy.
    pub http_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTypeMtproto {
    pub secret: String,
}

polymorphic! {
    /// Kind of proxy server.
    pub enum ProxyType: "ProxyType" {
        "proxyTypeSocks5" => Socks5(ProxyTypeSocks5),
        "proxyTypeHttp" => Http(ProxyTypeHttp),
        "proxyTypeMtproto" => Mtproto(ProxyTypeMtproto),
    }
}

/// A configured proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proxy {
    pub id: i32,
    pub server: String,
    pub port: i32,
    /// Unix time of the last successful connection, 0 if never.
    pub last_used_date: i32,
    pub is_enabled: bool,
    #[serde(rename = "type")]
    pub proxy_type: ProxyType,
}
