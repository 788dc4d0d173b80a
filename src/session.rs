//! Per-connection session state
//!
//! Tracks one connected participant through its lifecycle: every session
//! starts unnamed, claims a display name and a color with its first text
//! frame, and stays named until the connection closes.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::{ChatMessage, ServerMessage};
use crate::palette::{ColorPool, FALLBACK_COLOR};
use crate::sanitize;
use crate::types::ClientId;

/// Session lifecycle state
///
/// Name and color are carried only by the `Named` variant, so a session can
/// never be half-named. Once named, a session never reverts.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Connected, display name not yet claimed
    Unnamed,
    /// Display name claimed, color assigned
    Named {
        name: String,
        color: String,
        /// Whether `color` was taken from the pool (fallback colors are not)
        pooled: bool,
    },
}

/// Result of feeding one inbound text frame to a session
#[derive(Debug, Clone, PartialEq)]
pub enum TextOutcome {
    /// The frame was consumed as the display name; send this color back
    ColorAssigned(String),
    /// The frame produced a chat message to append and broadcast
    Chat(ChatMessage),
}

/// One connected participant
///
/// Holds the session state and the channel used to push deliveries out to
/// the connection's write task.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this connection
    pub id: ClientId,
    /// Current lifecycle state
    pub state: SessionState,
    /// Server → client delivery channel
    sender: mpsc::Sender<ServerMessage>,
}

impl Session {
    /// Create a new unnamed session
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id,
            state: SessionState::Unnamed,
            sender,
        }
    }

    /// Deliver a message to this client without blocking
    ///
    /// A full channel (slow peer) or a closed channel (disconnected peer)
    /// drops the delivery for this client only; the caller must never stall
    /// on one recipient.
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }

    /// Process one inbound text frame
    ///
    /// The first frame claims the sanitized text as the display name and
    /// acquires a color; if the pool is exhausted the session gets the
    /// fallback color instead. Every later frame produces a timestamped,
    /// sanitized chat message attributed to the claimed name.
    pub fn submit_text(&mut self, raw: &str, pool: &mut ColorPool) -> TextOutcome {
        match &self.state {
            SessionState::Unnamed => {
                let name = sanitize::escape(raw);
                let (color, pooled) = match pool.acquire() {
                    Some(color) => (color, true),
                    None => (FALLBACK_COLOR.to_string(), false),
                };
                self.state = SessionState::Named {
                    name,
                    color: color.clone(),
                    pooled,
                };
                TextOutcome::ColorAssigned(color)
            }
            SessionState::Named { name, color, .. } => TextOutcome::Chat(ChatMessage::new(
                sanitize::escape(raw),
                name.clone(),
                color.clone(),
            )),
        }
    }

    /// Tear down the session, returning its color to the pool if it held one
    pub fn release_color(self, pool: &mut ColorPool) {
        if let SessionState::Named {
            color,
            pooled: true,
            ..
        } = self.state
        {
            pool.release(color);
        }
    }

    /// The claimed display name, if any
    pub fn name(&self) -> Option<&str> {
        match &self.state {
            SessionState::Unnamed => None,
            SessionState::Named { name, .. } => Some(name),
        }
    }
}
