use crate::polymorphic;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStateWaitingForNetwork {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStateConnectingToProxy {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStateConnecting {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStateUpdating {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStateReady {}

polymorphic! {
    /// Network connection state of the native client.
    pub enum ConnectionState: "ConnectionState" {
        "connectionStateWaitingForNetwork" => WaitingForNetwork(ConnectionStateWaitingForNetwork),
        "connectionStateConnectingToProxy" => ConnectingToProxy(ConnectionStateConnectingToProxy),
        "connectionStateConnecting" => Connecting(ConnectionStateConnecting),
        "connectionStateUpdating" => Updating(ConnectionStateUpdating),
        "connectionStateReady" => Ready(ConnectionStateReady),
    }
}
