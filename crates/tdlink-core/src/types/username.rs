use crate::polymorphic;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckChatUsernameResultOk {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckChatUsernameResultUsernameInvalid {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckChatUsernameResultUsernameOccupied {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckChatUsernameResultUsernamePurchasable {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckChatUsernameResultPublicChatsTooMany {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckChatUsernameResultPublicGroupsUnavailable {}

polymorphic! {
    /// Outcome of checking whether a username can be set.
    pub enum CheckChatUsernameResult: "CheckChatUsernameResult" {
        "checkChatUsernameResultOk" => Ok(CheckChatUsernameResultOk),
        "checkChatUsernameResultUsernameInvalid" => UsernameInvalid(CheckChatUsernameResultUsernameInvalid),
        "checkChatUsernameResultUsernameOccupied" => UsernameOccupied(CheckChatUsernameResultUsernameOccupied),
        "checkChatUsernameResultUsernamePurchasable" => UsernamePurchasable(CheckChatUsernameResultUsernamePurchasable),
        "checkChatUsernameResultPublicChatsTooMany" => PublicChatsTooMany(CheckChatUsernameResultPublicChatsTooMany),
        "checkChatUsernameResultPublicGroupsUnavailable" => PublicGroupsUnavailable(CheckChatUsernameResultPublicGroupsUnavailable),
    }
}
