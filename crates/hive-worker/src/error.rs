// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the worker client
//!
//! Only connecting can fail in the caller's face. Everything that goes
//! wrong inside the running loops is logged and either dropped or turned
//! into a termination message on the inbound queue, never an error
//! return.

use hive_transports::TransportError;

/// Errors surfaced by [`WorkerClient`](crate::WorkerClient) lifecycle calls.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The transport binding could not establish the socket. Not retried
    /// internally; retry policy belongs to the caller.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// `connect()` was called on a client that is already connected.
    #[error("worker already connected")]
    AlreadyConnected,

    /// The client has been closed; a closed client cannot be reused.
    #[error("worker client is closed")]
    Closed,

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
