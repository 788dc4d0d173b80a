//! Connection registry
//!
//! The live set of active sessions, used for broadcast fan-out and cleanup.
//! Owned exclusively by the `ChatServer` actor, so no locking is needed and
//! the set cannot change underneath an in-progress broadcast.

use std::collections::HashMap;

use crate::message::ServerMessage;
use crate::session::Session;
use crate::types::ClientId;

/// Set of currently connected sessions, keyed by client id
#[derive(Debug, Default)]
pub struct Registry {
    sessions: HashMap<ClientId, Session>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Register a newly connected session
    pub fn add(&mut self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    /// Deregister a session, returning it for teardown
    pub fn remove(&mut self, id: ClientId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    /// Look up a session for mutation
    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Look up a session
    pub fn get(&self, id: ClientId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Number of connected sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are connected
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Deliver a message to every registered session
    ///
    /// A failed send means that client is slow or its write task is gone;
    /// the failure is ignored so the remaining recipients are still served.
    /// Iteration order is arbitrary.
    pub fn broadcast(&self, msg: &ServerMessage) {
        for session in self.sessions.values() {
            let _ = session.send(msg.clone());
        }
    }
}
