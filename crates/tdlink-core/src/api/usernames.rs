//! Username checks on Client.

use crate::decode::Polymorphic;
use crate::error::Result;
use crate::message::Request;
use crate::types::CheckChatUsernameResult;
use crate::Client;

impl Client {
    /// Check whether `username` can be set for a chat.
    ///
    /// Pass chat id 0 to check a username for a chat that is not created yet.
    pub async fn check_chat_username(
        &self,
        chat_id: i64,
        username: &str,
    ) -> Result<CheckChatUsernameResult> {
        let request = Request::new("checkChatUsername")
            .with("chat_id", chat_id)?
            .with("username", username)?;
        CheckChatUsernameResult::from_message(&self.call(request).await?)
    }
}
