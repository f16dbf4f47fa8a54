// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end: a worker client over the real WebSocket binding against an
//! in-process coordinator stub.

#![cfg(feature = "ws-transport")]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsFrame;

use hive_worker::{CustomMessage, GenericMessage, Message, WorkerClient, WorkerConfig, WsDealer};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_session_against_a_coordinator_stub() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    let coordinator = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");

        // Noise for another worker, then a real command.
        let for_other = Message::from(CustomMessage::new("assign", json!(1), "worker-2"));
        ws.send(WsFrame::Binary(for_other.serialize().expect("encode")))
            .await
            .expect("send");
        let for_us = Message::from(CustomMessage::new("assign", json!(2), "worker-1"));
        ws.send(WsFrame::Binary(for_us.serialize().expect("encode")))
            .await
            .expect("send");

        // The worker reports back, then announces departure.
        let mut received = Vec::new();
        while received.len() < 2 {
            match ws.next().await.expect("worker frame").expect("ws frame") {
                WsFrame::Binary(frame) => {
                    received.push(Message::from_frame(&frame).expect("decode"))
                }
                _ => continue,
            }
        }
        received
    });

    let mut client: WorkerClient<WsDealer> =
        WorkerClient::new(WorkerConfig::new("127.0.0.1", port, "worker-1"));
    client.connect().await.expect("connect");

    // Only the command addressed to us surfaces.
    let command = timeout(Duration::from_secs(5), client.recv())
        .await
        .expect("command before timeout")
        .expect("inbound open");
    assert_eq!(command.node_id(), "worker-1");
    assert_eq!(command.msg_type(), "assign");

    client
        .send(CustomMessage::new("report", json!({"done": 2}), "worker-1").into())
        .await
        .expect("queue report");
    client
        .send(GenericMessage::quit("worker-1").into())
        .await
        .expect("queue quit");

    timeout(Duration::from_secs(5), client.disconnected())
        .await
        .expect("disconnect fired");

    let received = coordinator.await.expect("coordinator task");
    assert_eq!(received[0].msg_type(), "report");
    assert!(received[1].is_quit());

    client.close();
}
