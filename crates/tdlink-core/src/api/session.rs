//! Session lifecycle methods on Client.

use crate::config::TdlibParameters;
use crate::decode::Polymorphic;
use crate::error::Result;
use crate::message::Request;
use crate::types::{self, AuthorizationState};
use crate::Client;

use super::decode_reply;

impl Client {
    /// Current authorization state of the native client.
    pub async fn get_authorization_state(&self) -> Result<AuthorizationState> {
        let reply = self.call(Request::new("getAuthorizationState")).await?;
        AuthorizationState::from_message(&reply)
    }

    /// Forward startup parameters. The fields are sent as given.
    pub async fn set_tdlib_parameters(&self, parameters: &TdlibParameters) -> Result<types::Ok> {
        let request = Request::new("setTdlibParameters").with_flattened(parameters)?;
        decode_reply(&self.call(request).await?, "ok")
    }

    /// Ask the native client to close its session.
    ///
    /// This is a request to the remote side; it does not stop the receive
    /// thread. The client reports `authorizationStateClosed` on the update
    /// stream once done, after which [`Client::shutdown`] should be called.
    pub async fn close(&self) -> Result<types::Ok> {
        decode_reply(&self.call(Request::new("close")).await?, "ok")
    }
}
