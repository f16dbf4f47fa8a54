// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! Common error types for all transport bindings

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport-agnostic error type
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to establish the connection to the coordinator
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// Failed to send a frame
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Failed to receive a frame
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// The connection has been closed, locally or by the peer
    #[error("connection closed")]
    ConnectionClosed,

    /// Operation attempted before connect or after the socket was released
    #[error("transport is not connected")]
    NotConnected,

    /// A blocking helper task failed to run to completion
    #[error("transport task failed: {0}")]
    Task(String),
}
