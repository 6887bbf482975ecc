use super::{AuthorizationState, ConnectionState, OptionValue};
use crate::polymorphic;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAuthorizationState {
    pub authorization_state: AuthorizationState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOption {
    pub name: String,
    pub value: OptionValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateConnectionState {
    pub state: ConnectionState,
}

polymorphic! {
    /// Unsolicited push messages this crate knows how to type.
    ///
    /// Anything else is still delivered on the update stream as a raw
    /// [`Message`](crate::Message); decoding it here yields an
    /// unknown-variant error.
    pub enum Update: "Update" {
        "updateAuthorizationState" => AuthorizationState(UpdateAuthorizationState),
        "updateOption" => Option(UpdateOption),
        "updateConnectionState" => ConnectionState(UpdateConnectionState),
    }
}
