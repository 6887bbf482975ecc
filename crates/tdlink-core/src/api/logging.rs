//! Native log control on Client.
//!
//! Both operations go through `execute` and answer synchronously.

use crate::error::Result;
use crate::message::Request;
use crate::types::{self, LogVerbosityLevel};
use crate::Client;

use super::decode_reply;

impl Client {
    /// Set the verbosity of the native library's own log.
    ///
    /// 0 is fatal errors only, 1 errors, 2 warnings, 3 info, 4 debug and 5
    /// verbose debug.
    pub fn set_log_verbosity_level(&self, level: i32) -> Result<types::Ok> {
        let request = Request::new("setLogVerbosityLevel").with("new_verbosity_level", level)?;
        decode_reply(&self.execute(&request)?, "ok")
    }

    /// Current verbosity of the native library's own log.
    pub fn get_log_verbosity_level(&self) -> Result<LogVerbosityLevel> {
        decode_reply(
            &self.execute(&Request::new("getLogVerbosityLevel"))?,
            "logVerbosityLevel",
        )
    }
}
