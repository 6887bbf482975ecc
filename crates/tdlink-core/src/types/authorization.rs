use crate::polymorphic;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStateWaitTdlibParameters {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStateWaitPhoneNumber {}

/// Waiting for a login code. The code descriptor is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateWaitCode {
    pub code_info: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStateWaitPassword {
    pub password_hint: String,
    pub has_recovery_email_address: bool,
    #[serde(default)]
    pub recovery_email_address_pattern: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStateReady {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStateLoggingOut {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStateClosing {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStateClosed {}

polymorphic! {
    /// Lifecycle state of the native client's session.
    pub enum AuthorizationState: "AuthorizationState" {
        "authorizationStateWaitTdlibParameters" => WaitTdlibParameters(AuthorizationStateWaitTdlibParameters),
        "authorizationStateWaitPhoneNumber" => WaitPhoneNumber(AuthorizationStateWaitPhoneNumber),
        "authorizationStateWaitCode" => WaitCode(AuthorizationStateWaitCode),
        "authorizationStateWaitPassword" => WaitPassword(AuthorizationStateWaitPassword),
        "authorizationStateReady" => Ready(AuthorizationStateReady),
        "authorizationStateLoggingOut" => LoggingOut(AuthorizationStateLoggingOut),
        "authorizationStateClosing" => Closing(AuthorizationStateClosing),
        "authorizationStateClosed" => Closed(AuthorizationStateClosed),
    }
}

impl AuthorizationState {
    /// Whether the native instance has shut down for good.
    pub fn is_closed(&self) -> bool {
        matches!(self, AuthorizationState::Closed(_))
    }
}
