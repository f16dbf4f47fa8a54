// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! # hive-worker
//!
//! Worker-side messaging client: one persistent, identity-addressed
//! connection to a coordinating node, typed envelope messages in both
//! directions, and a clean answer to "the coordinator told me to stop".
//!
//! The client owns a [`DealerTransport`] binding and runs two concurrent
//! loops. The receive loop decodes frames (generic variant first, custom
//! as fallback), drops anything not addressed to this worker, and feeds a
//! bounded inbound queue. The send loop drains a bounded outbound queue
//! onto the wire; sending a generic [`QUIT`] fires the one-shot disconnect
//! signal, and a failed send is folded back into the inbound queue as a
//! termination command so the caller has a single shutdown path.
//!
//! Transport selection is a feature flag on `hive-transports`
//! (`ws-transport` by default, `zmq-transport` for libzmq DEALER), or any
//! other [`DealerTransport`] implementation supplied as the type
//! parameter.

mod client;
mod config;
mod error;
mod message;

pub use client::WorkerClient;
pub use config::{WorkerConfig, DEFAULT_QUEUE_CAPACITY};
pub use error::ConnectionError;
pub use message::{CodecError, CustomMessage, GenericMessage, Message, QUIT};

pub use hive_transports::{DealerTransport, TransportError};

#[cfg(feature = "ws-transport")]
pub use hive_transports::WsDealer;

#[cfg(feature = "zmq-transport")]
pub use hive_transports::ZmqDealer;

/// Worker client over the WebSocket binding.
#[cfg(feature = "ws-transport")]
pub type WsWorkerClient = WorkerClient<hive_transports::WsDealer>;

/// Worker client over the ZMQ DEALER binding.
#[cfg(feature = "zmq-transport")]
pub type ZmqWorkerClient = WorkerClient<hive_transports::ZmqDealer>;
