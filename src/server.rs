//! ChatServer actor implementation
//!
//! The central actor owning all shared state: the connection registry, the
//! color pool, and the message history. Commands arrive over an mpsc channel
//! and are processed one at a time, so no other synchronization is needed and
//! the palette/history invariants hold between commands.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::history::HistoryBuffer;
use crate::message::ServerMessage;
use crate::palette::ColorPool;
use crate::registry::Registry;
use crate::session::{Session, TextOutcome};
use crate::types::ClientId;

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Client sent a text frame
    Text { client_id: ClientId, text: String },
    /// Client disconnected
    Disconnect { client_id: ClientId },
}

/// The main ChatServer actor
///
/// On connect it replays history to the newcomer; a session's first text
/// frame claims a name and a color, every later frame is appended to history
/// and fanned out to all connected clients; on disconnect the session's color
/// returns to the pool.
pub struct ChatServer {
    /// All connected sessions
    registry: Registry,
    /// Colors not currently assigned to a named session
    palette: ColorPool,
    /// Recent messages replayed to newcomers
    history: HistoryBuffer,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: Registry::new(),
            palette: ColorPool::new(),
            history: HistoryBuffer::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are
    /// dropped. Command handling never awaits, so every command is one
    /// atomic step over the shared state.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender);
            }
            ServerCommand::Text { client_id, text } => {
                self.handle_text(client_id, text);
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
        }
    }

    /// Handle new client connection: register and replay history
    fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerMessage>) {
        let session = Session::new(client_id, sender);
        if !self.history.is_empty() {
            let _ = session.send(ServerMessage::History(self.history.snapshot()));
        }
        self.registry.add(session);

        info!("Client {} connected", client_id);
        debug!("Total clients: {}", self.registry.len());
    }

    /// Handle an inbound text frame
    ///
    /// The session state machine decides whether this frame names the user or
    /// carries a chat message.
    fn handle_text(&mut self, client_id: ClientId, text: String) {
        let Some(session) = self.registry.get_mut(client_id) else {
            return;
        };

        match session.submit_text(&text, &mut self.palette) {
            TextOutcome::ColorAssigned(color) => {
                info!(
                    "Client {} is known as '{}' with {} color",
                    client_id,
                    session.name().unwrap_or_default(),
                    color
                );
                let _ = session.send(ServerMessage::Color(color));
            }
            TextOutcome::Chat(msg) => {
                info!("Received message from {}: {}", msg.author, msg.text);
                self.history.append(msg.clone());
                self.registry.broadcast(&ServerMessage::Message(msg));
            }
        }
    }

    /// Handle client disconnection: deregister and recycle the color
    fn handle_disconnect(&mut self, client_id: ClientId) {
        if let Some(session) = self.registry.remove(client_id) {
            session.release_color(&mut self.palette);
            info!("Client {} disconnected", client_id);
            debug!("Total clients: {}", self.registry.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_CAP;
    use crate::message::ChatMessage;
    use crate::palette::PALETTE;

    fn new_server() -> ChatServer {
        let (_tx, rx) = mpsc::channel(8);
        ChatServer::new(rx)
    }

    /// Connect a client and return its id and delivery receiver
    fn connect(server: &mut ChatServer) -> (ClientId, mpsc::Receiver<ServerMessage>) {
        let id = ClientId::new();
        let (tx, rx) = mpsc::channel(256);
        server.handle_command(ServerCommand::Connect {
            client_id: id,
            sender: tx,
        });
        (id, rx)
    }

    fn send_text(server: &mut ChatServer, id: ClientId, text: &str) {
        server.handle_command(ServerCommand::Text {
            client_id: id,
            text: text.to_string(),
        });
    }

    #[test]
    fn test_connect_with_empty_history_sends_nothing() {
        let mut server = new_server();
        let (_id, mut rx) = connect(&mut server);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_newcomer_receives_history() {
        let mut server = new_server();

        let (alice, mut alice_rx) = connect(&mut server);
        send_text(&mut server, alice, "alice");
        send_text(&mut server, alice, "first!");
        alice_rx.try_recv().expect("color delivery");

        let (_bob, mut bob_rx) = connect(&mut server);
        let delivery = bob_rx.try_recv().expect("history delivery");
        let ServerMessage::History(messages) = delivery else {
            panic!("newcomer's first delivery must be history, got {:?}", delivery);
        };
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "first!");
        assert_eq!(messages[0].author, "alice");
    }

    #[test]
    fn test_first_frame_yields_color_and_no_broadcast() {
        let mut server = new_server();
        let (alice, mut alice_rx) = connect(&mut server);
        let (_bob, mut bob_rx) = connect(&mut server);

        send_text(&mut server, alice, "alice");

        let delivery = alice_rx.try_recv().expect("color delivery");
        assert!(matches!(delivery, ServerMessage::Color(_)));
        assert!(alice_rx.try_recv().is_err(), "naming must not broadcast");
        assert!(bob_rx.try_recv().is_err(), "naming is private to the namer");
    }

    #[test]
    fn test_chat_is_broadcast_to_everyone_including_sender() {
        let mut server = new_server();
        let (alice, mut alice_rx) = connect(&mut server);
        let (_bob, mut bob_rx) = connect(&mut server);

        send_text(&mut server, alice, "alice");
        alice_rx.try_recv().expect("color delivery");

        send_text(&mut server, alice, "hello all");

        for rx in [&mut alice_rx, &mut bob_rx] {
            let delivery = rx.try_recv().expect("broadcast delivery");
            let ServerMessage::Message(msg) = delivery else {
                panic!("expected message delivery, got {:?}", delivery);
            };
            assert_eq!(msg.text, "hello all");
            assert_eq!(msg.author, "alice");
        }
    }

    #[test]
    fn test_chat_text_is_sanitized_before_fanout() {
        let mut server = new_server();
        let (alice, mut alice_rx) = connect(&mut server);
        send_text(&mut server, alice, "alice");
        alice_rx.try_recv().expect("color delivery");

        send_text(&mut server, alice, "<b>bold</b>");
        let ServerMessage::Message(msg) = alice_rx.try_recv().unwrap() else {
            panic!("expected message delivery");
        };
        assert_eq!(msg.text, "&lt;b&gt;bold&lt;/b&gt;");
    }

    #[test]
    fn test_disconnect_recycles_color() {
        let mut server = new_server();

        let (alice, mut alice_rx) = connect(&mut server);
        send_text(&mut server, alice, "alice");
        let ServerMessage::Color(released) = alice_rx.try_recv().unwrap() else {
            panic!("expected color delivery");
        };

        server.handle_command(ServerCommand::Disconnect { client_id: alice });
        assert_eq!(server.palette.remaining(), PALETTE.len());

        // Two fresh sessions naming themselves see the released color at most
        // once, and in-use plus pooled colors still cover the palette.
        let mut assigned = Vec::new();
        for _ in 0..2 {
            let (id, mut rx) = connect(&mut server);
            send_text(&mut server, id, "user");
            let ServerMessage::Color(color) = rx.try_recv().unwrap() else {
                panic!("expected color delivery");
            };
            assigned.push(color);
        }
        assert!(assigned.iter().filter(|c| **c == released).count() <= 1);
        assert_eq!(assigned.len() + server.palette.remaining(), PALETTE.len());
    }

    #[test]
    fn test_unnamed_disconnect_leaves_pool_untouched() {
        let mut server = new_server();
        let (alice, _rx) = connect(&mut server);
        server.handle_command(ServerCommand::Disconnect { client_id: alice });
        assert_eq!(server.palette.remaining(), PALETTE.len());
    }

    #[test]
    fn test_dead_recipient_does_not_stop_fanout() {
        let mut server = new_server();

        let (alice, mut alice_rx) = connect(&mut server);
        send_text(&mut server, alice, "alice");
        alice_rx.try_recv().expect("color delivery");

        // A client whose write task has died.
        let (_dead, dead_rx) = connect(&mut server);
        drop(dead_rx);

        let (_carol, mut carol_rx) = connect(&mut server);

        send_text(&mut server, alice, "still here?");

        let ServerMessage::Message(msg) = carol_rx.try_recv().unwrap() else {
            panic!("live clients must still receive the broadcast");
        };
        assert_eq!(msg.text, "still here?");
        assert!(matches!(
            alice_rx.try_recv().unwrap(),
            ServerMessage::Message(_)
        ));
    }

    #[test]
    fn test_text_from_unknown_client_is_ignored() {
        let mut server = new_server();
        let (_alice, mut alice_rx) = connect(&mut server);

        send_text(&mut server, ClientId::new(), "ghost");
        assert!(alice_rx.try_recv().is_err());
    }

    #[test]
    fn test_history_snapshot_is_capped() {
        let mut server = new_server();
        let (alice, mut alice_rx) = connect(&mut server);
        send_text(&mut server, alice, "alice");
        alice_rx.try_recv().expect("color delivery");
        // Drop alice's receiver so the flood below is dropped at her channel
        // instead of filling it.
        drop(alice_rx);

        for n in 0..(HISTORY_CAP + 10) {
            send_text(&mut server, alice, &format!("msg {}", n));
        }

        let (_bob, mut bob_rx) = connect(&mut server);
        let ServerMessage::History(messages) = bob_rx.try_recv().unwrap() else {
            panic!("expected history delivery");
        };
        assert_eq!(messages.len(), HISTORY_CAP);
        assert_eq!(messages.first().unwrap().text, "msg 10");
        assert_eq!(
            messages.last().unwrap().text,
            format!("msg {}", HISTORY_CAP + 9)
        );
    }

    #[test]
    fn test_history_messages_carry_author_color_and_time() {
        let mut server = new_server();
        let (alice, mut alice_rx) = connect(&mut server);
        send_text(&mut server, alice, "alice");
        let ServerMessage::Color(color) = alice_rx.try_recv().unwrap() else {
            panic!("expected color delivery");
        };
        send_text(&mut server, alice, "hi");

        let (_bob, mut bob_rx) = connect(&mut server);
        let ServerMessage::History(messages) = bob_rx.try_recv().unwrap() else {
            panic!("expected history delivery");
        };
        let ChatMessage {
            text,
            author,
            color: msg_color,
            time,
        } = messages[0].clone();
        assert_eq!(text, "hi");
        assert_eq!(author, "alice");
        assert_eq!(msg_color, color);
        assert!(time > 0);
    }
}
