//! Integration tests for the Client public interface.
//!
//! Every test drives a real client, with its receive thread, over an
//! in-memory transport so reply order and timing are under test control.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::StreamExt;
use serde_json::{json, Value};
use tdlink_core::types::{OptionValue, Update, UpdateOption};
use tdlink_core::{
    Client, ClientOptions, MemoryTransport, Polymorphic, Request, TdError, Token,
};

fn options() -> ClientOptions {
    ClientOptions::new()
        .with_request_timeout(Duration::from_secs(5))
        .with_receive_poll_interval(Duration::from_millis(10))
}

async fn start(transport: &Arc<MemoryTransport>, options: ClientOptions) -> Client {
    Client::builder(transport.clone())
        .options(options)
        .build()
        .await
        .expect("client should start")
}

fn token_of(request: &Value) -> Token {
    Token::from(request["@extra"].as_str().expect("request carries @extra"))
}

// ========================================
// End-to-end scenarios
// ========================================

#[tokio::test]
async fn test_reply_is_returned_to_caller() {
    let transport = Arc::new(MemoryTransport::with_responder(|req| {
        (req["@type"] == "getOption")
            .then(|| json!({"@type": "optionValueInteger", "value": 42}))
    }));
    let client = start(&transport, options()).await;

    let reply = client
        .call(Request::new("getOption").with("name", "x").unwrap())
        .await
        .unwrap();

    assert_eq!(reply.kind(), Some("optionValueInteger"));
    assert_eq!(reply.get("value"), Some(&json!(42)));
    assert_eq!(reply.extra(), transport.sent()[0]["@extra"].as_str());
    assert_eq!(client.pending_requests(), 0);
}

#[tokio::test]
async fn test_unanswered_call_times_out_and_cleans_up() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(
        &transport,
        options().with_request_timeout(Duration::from_millis(100)),
    )
    .await;

    let err = client.call(Request::new("getOption")).await.unwrap_err();

    assert!(matches!(err, TdError::Timeout { .. }));
    assert!(err.is_retryable());
    let token = token_of(&transport.sent()[0]);
    assert!(!client.is_pending(&token));
    assert_eq!(client.pending_requests(), 0);
}

#[tokio::test]
async fn test_out_of_order_replies_reach_their_callers() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;

    let first = client.call(Request::new("testCallString").with("x", "one").unwrap());
    let second = client.call(Request::new("testCallString").with("x", "two").unwrap());
    let driver = async {
        let sent = transport.wait_sent(2).await;
        // Answer in reverse order of sending.
        for request in sent.iter().rev() {
            transport.reply_to(request, json!({"@type": "text", "text": request["x"]}));
        }
    };

    let (first, second, ()) = tokio::join!(first, second, driver);

    assert_eq!(first.unwrap().get("text"), Some(&json!("one")));
    assert_eq!(second.unwrap().get("text"), Some(&json!("two")));
}

#[tokio::test]
async fn test_update_is_buffered_without_consumer() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;

    transport.push_json(&json!({
        "@type": "updateOption",
        "name": "version",
        "value": {"@type": "optionValueString", "value": "1.8.29"}
    }));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let update = client.updates().recv().await.unwrap();
    assert_eq!(update.kind(), Some("updateOption"));
    assert_eq!(
        Update::from_message(&update).unwrap(),
        Update::Option(UpdateOption {
            name: "version".to_string(),
            value: OptionValue::string("1.8.29"),
        })
    );
}

// ========================================
// Correlation properties
// ========================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_calls_are_correlated() {
    const CALLS: usize = 200;
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;

    let calls = (0..CALLS).map(|i| {
        let client = client.clone();
        tokio::spawn(async move {
            let reply = client
                .call(Request::new("testCallString").with("x", i.to_string()).unwrap())
                .await?;
            Ok::<_, TdError>((i, reply))
        })
    });
    let driver = {
        let transport = transport.clone();
        tokio::spawn(async move {
            let mut sent = transport.wait_sent(CALLS).await;
            sent.reverse();
            for request in &sent {
                transport.reply_to(request, json!({"@type": "text", "text": request["x"]}));
            }
            sent
        })
    };

    let results = join_all(calls).await;
    let sent = driver.await.unwrap();

    let tokens: HashSet<_> = sent.iter().map(token_of).collect();
    assert_eq!(tokens.len(), CALLS);
    for result in results {
        let (i, reply) = result.unwrap().unwrap();
        assert_eq!(reply.get("text"), Some(&json!(i.to_string())));
    }
    assert_eq!(client.pending_requests(), 0);
}

#[tokio::test]
async fn test_duplicate_reply_is_discarded() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;
    let updates = client.updates();

    let call = client.call(Request::new("testCallString").with("x", "a").unwrap());
    let driver = async {
        let sent = transport.wait_sent(1).await;
        transport.reply_to(&sent[0], json!({"@type": "text", "text": "first"}));
        transport.reply_to(&sent[0], json!({"@type": "text", "text": "second"}));
    };
    let (reply, ()) = tokio::join!(call, driver);

    assert_eq!(reply.unwrap().get("text"), Some(&json!("first")));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(updates.is_empty());
}

#[tokio::test]
async fn test_raw_call_timeout_cleans_up() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;

    let err = client
        .call_raw_with_timeout(
            Request::new("testSquareInt").with("x", 3).unwrap(),
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TdError::Timeout { .. }));
    assert!(!client.is_pending(&token_of(&transport.sent()[0])));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reply_racing_timeout_resolves_once() {
    let transport = Arc::new(MemoryTransport::with_responder(|_| Some(json!({"@type": "ok"}))));
    let client = start(&transport, options()).await;

    for _ in 0..200 {
        let result = client
            .call_with_timeout(Request::new("testCallEmpty"), Duration::from_micros(1))
            .await;
        match result {
            Ok(reply) => assert_eq!(reply.kind(), Some("ok")),
            Err(TdError::Timeout { .. }) => {}
            Err(other) => panic!("Expected reply or timeout, got: {:?}", other),
        }
    }

    assert_eq!(client.pending_requests(), 0);
}

#[tokio::test]
async fn test_updates_keep_arrival_order_and_skip_waiters() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;
    let updates = client.updates();

    let call = client.call(Request::new("getAuthorizationState"));
    let driver = async {
        let sent = transport.wait_sent(1).await;
        for state in ["connectionStateConnecting", "connectionStateUpdating"] {
            transport.push_json(&json!({
                "@type": "updateConnectionState",
                "state": {"@type": state}
            }));
        }
        transport.reply_to(&sent[0], json!({"@type": "authorizationStateReady"}));
        transport.push_json(&json!({
            "@type": "updateConnectionState",
            "state": {"@type": "connectionStateReady"}
        }));
    };
    let (reply, ()) = tokio::join!(call, driver);
    assert_eq!(reply.unwrap().kind(), Some("authorizationStateReady"));

    let mut states = Vec::new();
    for _ in 0..3 {
        let update = updates.recv().await.unwrap();
        assert!(update.extra().is_none());
        states.push(update.get("state").unwrap()["@type"].clone());
    }
    assert_eq!(
        states,
        vec![
            json!("connectionStateConnecting"),
            json!("connectionStateUpdating"),
            json!("connectionStateReady"),
        ]
    );
}

#[tokio::test]
async fn test_typed_decode_is_closed_over_known_tags() {
    let transport = Arc::new(MemoryTransport::with_responder(|req| {
        let reply = match req["name"].as_str()? {
            "a" => json!({"@type": "optionValueBoolean", "value": false}),
            "b" => json!({"@type": "optionValueEmpty"}),
            "c" => json!({"@type": "optionValueInteger", "value": "-5"}),
            "d" => json!({"@type": "optionValueString", "value": "text"}),
            _ => json!({"@type": "optionValueDouble", "value": 0.5}),
        };
        Some(reply)
    }));
    let client = start(&transport, options()).await;

    assert_eq!(client.get_option("a").await.unwrap(), OptionValue::boolean(false));
    assert_eq!(client.get_option("b").await.unwrap(), OptionValue::empty());
    assert_eq!(client.get_option("c").await.unwrap(), OptionValue::integer(-5));
    assert_eq!(client.get_option("d").await.unwrap(), OptionValue::string("text"));

    match client.get_option("e").await.unwrap_err() {
        TdError::UnknownVariant { category, kind } => {
            assert_eq!(category, "OptionValue");
            assert_eq!(kind, "optionValueDouble");
        }
        other => panic!("Expected UnknownVariant, got: {:?}", other),
    }
}

// ========================================
// Errors and lifecycle
// ========================================

#[tokio::test]
async fn test_remote_error_surfaces_from_typed_operation() {
    let transport = Arc::new(MemoryTransport::with_responder(|_| {
        Some(json!({"@type": "error", "code": 400, "message": "Option not found"}))
    }));
    let client = start(&transport, options()).await;

    let err = client.get_option("nope").await.unwrap_err();

    assert_eq!(err.code(), Some(400));
    assert!(!err.is_retryable());
    assert!(matches!(err, TdError::Remote { ref message, .. } if message == "Option not found"));
}

#[tokio::test]
async fn test_update_overflow_drops_oldest() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options().with_update_capacity(3)).await;
    let updates = client.updates();

    for n in 0..5 {
        transport.push_json(&json!({"@type": "updateOption", "name": n.to_string()}));
    }
    tokio::time::timeout(Duration::from_secs(2), async {
        while updates.dropped() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("receive loop should route all updates");

    let names: Vec<_> = std::iter::from_fn(|| updates.try_recv())
        .map(|u| u.get("name").cloned().unwrap())
        .collect();
    assert_eq!(names, vec![json!("2"), json!("3"), json!("4")]);
}

#[tokio::test]
async fn test_shutdown_wakes_pending_callers() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;

    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.call(Request::new("getOption")).await })
    };
    transport.wait_sent(1).await;
    client.shutdown().await;

    assert!(matches!(pending.await.unwrap(), Err(TdError::Closed)));
    assert!(transport.is_destroyed());
    assert!(client.is_shut_down());
    assert_eq!(client.pending_requests(), 0);

    // Idempotent.
    client.shutdown().await;
}

#[tokio::test]
async fn test_update_stream_drains_then_ends() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;
    let updates = client.updates();

    transport.push_json(&json!({"@type": "updateOption", "name": "a"}));
    transport.push_json(&json!({"@type": "updateOption", "name": "b"}));
    tokio::time::timeout(Duration::from_secs(2), async {
        while updates.len() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("updates should arrive");

    client.shutdown().await;

    let drained: Vec<_> = updates.into_stream().collect().await;
    assert_eq!(drained.len(), 2);
}

#[tokio::test]
async fn test_dropping_last_handle_releases_transport() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(&transport, options()).await;
    let clone = client.clone();

    drop(client);
    assert!(!transport.is_destroyed());

    drop(clone);
    assert!(transport.is_destroyed());
}

#[tokio::test]
async fn test_cancelled_shutdown_still_ends_update_stream() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(
        &transport,
        options().with_receive_poll_interval(Duration::from_millis(200)),
    )
    .await;
    let updates = client.updates();

    // Polled once, then dropped while the receive thread is still being joined.
    let cancelled = tokio::time::timeout(Duration::ZERO, client.shutdown()).await;
    assert!(cancelled.is_err());
    assert!(client.is_shut_down());
    drop(client);

    let end = tokio::time::timeout(Duration::from_secs(2), updates.recv())
        .await
        .expect("update stream should end");
    assert!(end.is_none());
    assert!(transport.is_destroyed());
}

#[tokio::test]
async fn test_shutdown_after_cancelled_shutdown_completes() {
    let transport = Arc::new(MemoryTransport::new());
    let client = start(
        &transport,
        options().with_receive_poll_interval(Duration::from_millis(200)),
    )
    .await;

    let _ = tokio::time::timeout(Duration::ZERO, client.shutdown()).await;
    client.shutdown().await;

    tokio::time::timeout(Duration::from_secs(2), async {
        while !transport.is_destroyed() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("transport should be released");
    assert!(client.updates().try_recv().is_none());
}
