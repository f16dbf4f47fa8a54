// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! ZMQ DEALER binding
//!
//! DEALER sockets give us exactly the shape the worker needs: a persistent
//! connection to a ROUTER coordinator, addressed by socket identity, with
//! frames flowing both ways independently.
//!
//! libzmq sockets are single-threaded by contract, so the socket lives
//! behind a mutex and every receive holds it for at most one poll window.
//! A concurrent send slips in between polls, and `close()` is observed at
//! the next window boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{TransportError, TransportResult};
use crate::traits::DealerTransport;

/// How long a single receive poll may hold the socket, in milliseconds.
/// Also bounds how long a pending receive can outlive `close()`.
const RECV_POLL_MS: i64 = 100;

/// ZMQ DEALER socket implementation (client-side)
pub struct ZmqDealer {
    socket: Arc<Mutex<Option<zmq::Socket>>>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl DealerTransport for ZmqDealer {
    async fn connect(host: &str, port: u16, identity: &str) -> TransportResult<Self> {
        let address = format!("tcp://{}:{}", host, port);

        let context = zmq::Context::new();
        let socket = context
            .socket(zmq::DEALER)
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        socket
            .set_identity(identity.as_bytes())
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
        socket
            .set_linger(0)
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        socket
            .connect(&address)
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        info!("[ZMQ-DEALER] Connected to {}", address);

        Ok(Self {
            socket: Arc::new(Mutex::new(Some(socket))),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    async fn send_frame(&self, frame: Vec<u8>) -> TransportResult<()> {
        let socket = Arc::clone(&self.socket);

        tokio::task::spawn_blocking(move || {
            let guard = socket.lock();
            let sock = guard.as_ref().ok_or(TransportError::NotConnected)?;
            sock.send(frame, 0)
                .map_err(|e| TransportError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| TransportError::Task(e.to_string()))?
    }

    async fn recv_frame(&self) -> TransportResult<Vec<u8>> {
        loop {
            if self.closed.load(Ordering::Acquire) {
                return Err(TransportError::ConnectionClosed);
            }

            let socket = Arc::clone(&self.socket);
            let polled = tokio::task::spawn_blocking(move || -> TransportResult<Option<Vec<u8>>> {
                let guard = socket.lock();
                let sock = guard.as_ref().ok_or(TransportError::NotConnected)?;

                let mut items = [sock.as_poll_item(zmq::POLLIN)];
                zmq::poll(&mut items, RECV_POLL_MS)
                    .map_err(|e| TransportError::ReceiveFailed(e.to_string()))?;
                if !items[0].is_readable() {
                    return Ok(None);
                }

                match sock.recv_bytes(zmq::DONTWAIT) {
                    Ok(frame) => Ok(Some(frame)),
                    // Raced another wakeup; poll again.
                    Err(zmq::Error::EAGAIN) => Ok(None),
                    Err(e) => Err(TransportError::ReceiveFailed(e.to_string())),
                }
            })
            .await
            .map_err(|e| TransportError::Task(e.to_string()))??;

            if let Some(frame) = polled {
                return Ok(frame);
            }
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        debug!("[ZMQ-DEALER] Releasing socket");
        // Dropping the socket out of the Option releases it; linger is 0 so
        // nothing lingers in the kernel.
        *self.socket.lock() = None;
    }
}
