// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! Transport trait definitions
//!
//! One contract, several bindings. The worker client is generic over
//! [`DealerTransport`] and never names a concrete library; swapping ZMQ for
//! WebSocket (or a test stub) is a type parameter, not a code change.

use async_trait::async_trait;

use crate::error::TransportResult;

/// A persistent, identity-addressed, bidirectional frame socket.
///
/// Concurrency contract: the connection is used by exactly one receiving
/// task and one sending task at a time. Implementations must keep the two
/// directions independently usable; a receive that is blocked waiting for
/// a frame may not starve a concurrent send indefinitely.
///
/// `recv_frame` futures must be cancel-safe (dropping one mid-wait loses no
/// frame), and a pending `recv_frame` must return promptly once [`close`]
/// has been called rather than waiting for the next incoming frame.
///
/// [`close`]: DealerTransport::close
#[async_trait]
pub trait DealerTransport: Send + Sync + Sized + 'static {
    /// Open the connection, registering `identity` with the coordinator.
    ///
    /// The address scheme is binding-specific (`tcp://` for ZMQ, `ws://`
    /// for WebSocket); implementations build their own address from
    /// `host` and `port`.
    async fn connect(host: &str, port: u16, identity: &str) -> TransportResult<Self>;

    /// Send one opaque frame. The frame is delivered whole or not at all.
    async fn send_frame(&self, frame: Vec<u8>) -> TransportResult<()>;

    /// Receive the next frame, waiting until one arrives, the connection
    /// dies, or the transport is closed.
    async fn recv_frame(&self) -> TransportResult<Vec<u8>>;

    /// Release the socket. Idempotent; unblocks any pending `recv_frame`.
    fn close(&self);
}
