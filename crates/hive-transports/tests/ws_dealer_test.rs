// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the WebSocket dealer binding against an in-process
//! coordinator stub.

#![cfg(feature = "ws-transport")]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use hive_transports::{DealerTransport, TransportError, WsDealer};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;

/// Accept one WebSocket connection and return it together with the
/// request path the client used for its handshake.
async fn accept_one(
    listener: TcpListener,
) -> (
    tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    String,
) {
    let (stream, _) = listener.accept().await.expect("accept");

    let (path_tx, path_rx) = tokio::sync::oneshot::channel();
    let mut path_tx = Some(path_tx);
    let ws = tokio_tungstenite::accept_hdr_async(stream, move |req: &Request, resp: Response| {
        if let Some(tx) = path_tx.take() {
            let _ = tx.send(req.uri().to_string());
        }
        Ok(resp)
    })
    .await
    .expect("websocket handshake");

    let path = path_rx.await.expect("handshake path");
    (ws, path)
}

#[tokio::test]
async fn frames_go_both_ways_and_identity_is_registered() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    let server = tokio::spawn(async move {
        let (mut ws, path) = accept_one(listener).await;
        assert!(path.contains("identity=worker-1"));

        let frame = ws.next().await.expect("client frame").expect("ws frame");
        assert_eq!(frame, Message::Binary(b"status-report".to_vec()));

        ws.send(Message::Binary(b"assignment".to_vec()))
            .await
            .expect("server send");
    });

    let dealer = WsDealer::connect("127.0.0.1", port, "worker-1")
        .await
        .expect("connect");

    dealer
        .send_frame(b"status-report".to_vec())
        .await
        .expect("send frame");

    let received = timeout(Duration::from_secs(5), dealer.recv_frame())
        .await
        .expect("frame before timeout")
        .expect("recv frame");
    assert_eq!(received, b"assignment");

    server.await.expect("server task");
    dealer.close();
}

#[tokio::test]
async fn close_unblocks_a_pending_receive() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    // Keep the server half alive but silent so the receive genuinely blocks.
    let server = tokio::spawn(async move {
        let (ws, _) = accept_one(listener).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(ws);
    });

    let dealer = std::sync::Arc::new(
        WsDealer::connect("127.0.0.1", port, "worker-2")
            .await
            .expect("connect"),
    );

    let receiver = {
        let dealer = std::sync::Arc::clone(&dealer);
        tokio::spawn(async move { dealer.recv_frame().await })
    };

    // Give the receiver time to park in recv_frame before closing.
    tokio::time::sleep(Duration::from_millis(50)).await;
    dealer.close();

    let result = timeout(Duration::from_secs(1), receiver)
        .await
        .expect("receiver unblocked")
        .expect("receiver task");
    assert!(matches!(result, Err(TransportError::ConnectionClosed)));

    server.abort();
}

#[tokio::test]
async fn send_after_close_is_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    let server = tokio::spawn(async move {
        let (ws, _) = accept_one(listener).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(ws);
    });

    let dealer = WsDealer::connect("127.0.0.1", port, "worker-3")
        .await
        .expect("connect");

    dealer.close();
    dealer.close(); // second close is a no-op

    let result = dealer.send_frame(b"too late".to_vec()).await;
    assert!(matches!(result, Err(TransportError::ConnectionClosed)));

    server.abort();
}
