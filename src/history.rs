//! Bounded message history
//!
//! Keeps the most recent chat messages so new connections can replay what
//! they missed. Oldest entries are evicted first once the cap is reached.

use std::collections::VecDeque;

use crate::message::ChatMessage;

/// Maximum number of messages retained for replay
pub const HISTORY_CAP: usize = 100;

/// Bounded FIFO buffer of recent chat messages
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    messages: VecDeque<ChatMessage>,
}

impl HistoryBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(HISTORY_CAP),
        }
    }

    /// Append a message, evicting the oldest entries past the cap
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > HISTORY_CAP {
            self.messages.pop_front();
        }
    }

    /// Current contents, oldest first, as an owned copy
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Number of retained messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the buffer holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
