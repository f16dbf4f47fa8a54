// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! # hive-transports
//!
//! Transport layer for hive workers: one dealer-style client contract and
//! interchangeable bindings built on different libraries.
//!
//! A worker keeps a single persistent, identity-addressed connection to its
//! coordinator. This crate owns everything below the message layer: opening
//! that connection, moving opaque binary frames in both directions, and
//! tearing the socket down. Which library does the moving is a build-time
//! choice; the client core upstairs is written once against
//! [`DealerTransport`].
//!
//! ## Feature Flags
//!
//! - `ws-transport` (default): WebSocket binding on `tokio-tungstenite`.
//!   Pure Rust, no system libraries.
//! - `zmq-transport`: ZeroMQ DEALER binding on the `zmq` crate. Requires
//!   libzmq on the build host.
//!
//! ```toml
//! # Default (WebSocket)
//! [dependencies]
//! hive-transports = "0.2"
//!
//! # ZMQ instead
//! [dependencies]
//! hive-transports = { version = "0.2", default-features = false, features = ["zmq-transport"] }
//! ```
//!
//! Both bindings are functionally equivalent: connect with an identity,
//! exchange whole frames, close. Frame boundaries are provided by the
//! transport (one WebSocket binary message or one ZMQ frame per
//! application message), so no length prefix is layered on top.

pub mod error;
pub mod traits;

#[cfg(feature = "ws-transport")]
pub mod websocket;

#[cfg(feature = "zmq-transport")]
pub mod zmq;

pub use error::{TransportError, TransportResult};
pub use traits::DealerTransport;

#[cfg(feature = "ws-transport")]
pub use websocket::WsDealer;

#[cfg(feature = "zmq-transport")]
pub use zmq::ZmqDealer;
