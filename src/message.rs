//! Message protocol definitions
//!
//! JSON-based server-to-client protocol using Serde's tagged enum
//! for type-safe serialization.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// A single chat message as stored in history and broadcast to clients
///
/// Wire shape: `{"time": <epoch-millis>, "text": "...", "author": "...", "color": "..."}`.
/// Text and author are already sanitized when the message is created; the
/// record is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Creation time, milliseconds since the Unix epoch
    pub time: u64,
    /// Sanitized message body
    pub text: String,
    /// Sanitized author name
    pub author: String,
    /// Author's assigned color
    pub color: String,
}

impl ChatMessage {
    /// Create a message stamped with the current time
    pub fn new(text: String, author: String, color: String) -> Self {
        Self {
            time: epoch_millis(),
            text,
            author,
            color,
        }
    }
}

/// Current time as milliseconds since the Unix epoch
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Server → Client delivery
///
/// Serializes as `{"type": "...", "data": ...}` matching the three delivery
/// kinds: replay history on connect, color assignment on naming, and chat
/// message fan-out.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Replay buffer contents, oldest first (sent to a new connection)
    History(Vec<ChatMessage>),
    /// Color assigned to this client after naming
    Color(String),
    /// A chat message broadcast to all clients
    Message(ChatMessage),
}
