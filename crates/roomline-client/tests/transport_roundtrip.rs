//! Transport tests against an in-process WebSocket peer.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use roomline_client::{Generation, TransportConfig, TransportEvent, TransportEventKind, spawn};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Accept one client, greet it, then echo text frames until it closes.
async fn echo_peer() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = accept_async(stream).await.unwrap();
        socket.send(Message::text("[user_id:1000 12:00:00]: welcome")).await.unwrap();

        while let Some(Ok(message)) = socket.next().await {
            match message {
                Message::Text(text) => {
                    socket.send(Message::text(format!("echo {}", text.as_str()))).await.unwrap();
                },
                Message::Close(_) => break,
                _ => {},
            }
        }
    });

    format!("ws://{addr}/")
}

async fn next_event(events: &mut mpsc::Receiver<TransportEvent>) -> TransportEvent {
    timeout(TIMEOUT, events.recv()).await.expect("event within timeout").expect("channel open")
}

#[tokio::test]
async fn frames_flow_both_ways() {
    let address = echo_peer().await;
    let (tx, mut events) = mpsc::channel(16);
    let generation = Generation::new(1);

    let client = spawn(generation, address, &TransportConfig::default(), tx);
    assert_eq!(client.generation(), generation);

    assert_eq!(next_event(&mut events).await, TransportEvent::opened(generation));
    assert_eq!(
        next_event(&mut events).await,
        TransportEvent::frame(generation, "[user_id:1000 12:00:00]: welcome")
    );

    client.send("hi".to_string()).await.unwrap();
    assert_eq!(next_event(&mut events).await, TransportEvent::frame(generation, "echo hi"));

    client.close();
    let closed = next_event(&mut events).await;
    assert_eq!(closed.generation, generation);
    assert!(matches!(closed.kind, TransportEventKind::Closed { .. }));
}

#[tokio::test]
async fn refused_connection_reports_closed() {
    // Bind then drop to find a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (tx, mut events) = mpsc::channel(16);
    let generation = Generation::new(7);
    let _client = spawn(generation, format!("ws://{addr}/"), &TransportConfig::default(), tx);

    let event = next_event(&mut events).await;
    assert_eq!(event.generation, generation);
    let TransportEventKind::Closed { reason } = event.kind else {
        panic!("expected Closed, got {event:?}");
    };
    assert!(reason.starts_with("connection failed"), "unexpected reason: {reason}");
}

#[tokio::test]
async fn handshake_timeout_reports_closed() {
    // Accepts TCP but never answers the WebSocket handshake
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let (tx, mut events) = mpsc::channel(16);
    let config =
        TransportConfig { connect_timeout: Duration::from_millis(100), ..TransportConfig::default() };
    let _client = spawn(Generation::new(2), format!("ws://{addr}/"), &config, tx);

    let event = next_event(&mut events).await;
    let TransportEventKind::Closed { reason } = event.kind else {
        panic!("expected Closed, got {event:?}");
    };
    assert!(reason.contains("timed out"), "unexpected reason: {reason}");
}
