// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! WebSocket dealer binding
//!
//! Connects to the coordinator over a plain WebSocket and maps one
//! application frame to one binary message. The worker identity travels in
//! the handshake URL so the coordinator can route by it from the first
//! byte.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{TransportError, TransportResult};
use crate::traits::DealerTransport;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket dealer socket implementation (client-side)
///
/// The stream is split once at connect time: the sink half belongs to the
/// sending task, the stream half to the receiving task. Each half sits
/// behind its own lock, so the two directions never contend.
pub struct WsDealer {
    address: String,
    writer: Mutex<SplitSink<WsStream, Message>>,
    reader: Mutex<SplitStream<WsStream>>,
    closed: CancellationToken,
}

#[async_trait]
impl DealerTransport for WsDealer {
    async fn connect(host: &str, port: u16, identity: &str) -> TransportResult<Self> {
        let address = format!("ws://{}:{}/?identity={}", host, port, identity);

        let (ws_stream, _) = connect_async(&address)
            .await
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        info!("[WS-DEALER] Connected to {}", address);

        let (writer, reader) = ws_stream.split();

        Ok(Self {
            address,
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
            closed: CancellationToken::new(),
        })
    }

    async fn send_frame(&self, frame: Vec<u8>) -> TransportResult<()> {
        if self.closed.is_cancelled() {
            return Err(TransportError::ConnectionClosed);
        }

        let mut writer = self.writer.lock().await;
        writer
            .send(Message::Binary(frame))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn recv_frame(&self) -> TransportResult<Vec<u8>> {
        let mut reader = self.reader.lock().await;

        loop {
            let item = tokio::select! {
                _ = self.closed.cancelled() => return Err(TransportError::ConnectionClosed),
                item = reader.next() => item,
            };

            match item {
                Some(Ok(Message::Binary(data))) => return Ok(data),
                // Control frames are the socket's business, not ours.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Text(_))) => continue,
                Some(Ok(_)) | None => return Err(TransportError::ConnectionClosed),
                Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
            }
        }
    }

    fn close(&self) {
        if !self.closed.is_cancelled() {
            debug!("[WS-DEALER] Closing connection to {}", self.address);
        }
        self.closed.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_to_nothing_fails() {
        // Reserve a port and release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let result = WsDealer::connect("127.0.0.1", port, "worker-1").await;
        assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    }
}
