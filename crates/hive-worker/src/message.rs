// Copyright 2025 Hive Contributors
// SPDX-License-Identifier: Apache-2.0

//! Envelope messages exchanged with the coordinator
//!
//! Two variants share the wire: [`GenericMessage`] for the small closed set
//! of control verbs, [`CustomMessage`] for application payloads. There is
//! no discriminator byte; a frame is whatever decoder accepts it, generic
//! tried first. The generic decoder is strict (unknown fields rejected,
//! payload must be a map or null) so application payloads fall through to
//! the custom decoder honestly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Control verb announcing that the sending side is leaving the
/// conversation.
pub const QUIT: &str = "quit";

/// Result of encoding or decoding an envelope frame.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The message could not be serialized; it is dropped, never sent.
    #[error("message encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame matched neither message variant.
    #[error("message decode failed: {0}")]
    Decode(serde_json::Error),
}

/// Control-plane message: a verb, an optional map payload, an addressee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenericMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub data: Option<Map<String, Value>>,
    pub node_id: String,
}

impl GenericMessage {
    pub fn new(
        msg_type: impl Into<String>,
        data: Option<Map<String, Value>>,
        node_id: impl Into<String>,
    ) -> Self {
        Self {
            msg_type: msg_type.into(),
            data,
            node_id: node_id.into(),
        }
    }

    /// The termination message, addressed to `node_id`.
    pub fn quit(node_id: impl Into<String>) -> Self {
        Self::new(QUIT, None, node_id)
    }
}

/// Application-plane message: arbitrary payload, same addressing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub data: Value,
    pub node_id: String,
}

impl CustomMessage {
    pub fn new(msg_type: impl Into<String>, data: Value, node_id: impl Into<String>) -> Self {
        Self {
            msg_type: msg_type.into(),
            data,
            node_id: node_id.into(),
        }
    }
}

/// Either envelope variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Generic(GenericMessage),
    Custom(CustomMessage),
}

impl Message {
    /// The worker this message is addressed to.
    pub fn node_id(&self) -> &str {
        match self {
            Message::Generic(m) => &m.node_id,
            Message::Custom(m) => &m.node_id,
        }
    }

    pub fn msg_type(&self) -> &str {
        match self {
            Message::Generic(m) => &m.msg_type,
            Message::Custom(m) => &m.msg_type,
        }
    }

    /// True for a generic message carrying the termination verb.
    pub fn is_quit(&self) -> bool {
        matches!(self, Message::Generic(m) if m.msg_type == QUIT)
    }

    /// Encode to a single opaque frame.
    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            Message::Generic(m) => serde_json::to_vec(m),
            Message::Custom(m) => serde_json::to_vec(m),
        }
        .map_err(CodecError::Encode)
    }

    /// Decode a frame: generic first, custom as fallback, error only when
    /// both decoders reject it.
    pub fn from_frame(frame: &[u8]) -> Result<Self, CodecError> {
        if let Ok(generic) = serde_json::from_slice::<GenericMessage>(frame) {
            return Ok(Message::Generic(generic));
        }

        serde_json::from_slice::<CustomMessage>(frame)
            .map(Message::Custom)
            .map_err(CodecError::Decode)
    }
}

impl From<GenericMessage> for Message {
    fn from(message: GenericMessage) -> Self {
        Message::Generic(message)
    }
}

impl From<CustomMessage> for Message {
    fn from(message: CustomMessage) -> Self {
        Message::Custom(message)
    }
}
