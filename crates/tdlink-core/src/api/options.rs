//! Client option methods on Client.

use crate::decode::Polymorphic;
use crate::error::Result;
use crate::message::Request;
use crate::types::{self, OptionValue};
use crate::Client;

use super::decode_reply;

impl Client {
    /// Read the value of a client option.
    ///
    /// Decoded from the raw reply so 64-bit values keep full precision.
    pub async fn get_option(&self, name: &str) -> Result<OptionValue> {
        let raw = self
            .call_raw(Request::new("getOption").with("name", name)?)
            .await?;
        OptionValue::from_bytes(raw)
    }

    /// Set the value of a client option.
    pub async fn set_option(&self, name: &str, value: OptionValue) -> Result<types::Ok> {
        let request = Request::new("setOption")
            .with("name", name)?
            .with("value", value)?;
        decode_reply(&self.call(request).await?, "ok")
    }
}

#[cfg(test)]
mod tests {
    use crate::transport::MemoryTransport;
    use crate::types::OptionValue;
    use crate::Client;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_option_keeps_int64_precision() {
        let transport = Arc::new(MemoryTransport::with_responder(|req| {
            (req["@type"] == "getOption" && req["name"] == "my_id")
                .then(|| json!({"@type": "optionValueInteger", "value": "9007199254740993"}))
        }));
        let client = Client::builder(transport).build().await.unwrap();

        let value = client.get_option("my_id").await.unwrap();
        assert_eq!(value, OptionValue::integer(9_007_199_254_740_993));
    }

    #[tokio::test]
    async fn test_set_option_sends_tagged_value() {
        let transport = Arc::new(MemoryTransport::with_responder(|_| Some(json!({"@type": "ok"}))));
        let client = Client::builder(transport.clone()).build().await.unwrap();

        client
            .set_option("online", OptionValue::boolean(true))
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0]["@type"], "setOption");
        assert_eq!(sent[0]["name"], "online");
        assert_eq!(
            sent[0]["value"],
            json!({"@type": "optionValueBoolean", "value": true})
        );
    }
}
