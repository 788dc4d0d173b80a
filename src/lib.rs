//! Broadcast WebSocket Chat Server Library
//!
//! A minimal broadcast chat server built with tokio-tungstenite using the
//! Actor pattern for state management.
//!
//! # Features
//! - WebSocket connection handling
//! - First text frame claims the display name
//! - Color assignment from a finite, shuffled palette (recycled on disconnect)
//! - Chat broadcast to every connected client
//! - Bounded replay history delivered to newcomers
//! - HTML-entity sanitization of names and messages
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the registry, color pool, and
//!   history
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use broadcast_chat::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("0.0.0.0:1337").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod error;
pub mod handler;
pub mod history;
pub mod message;
pub mod palette;
pub mod registry;
pub mod sanitize;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use history::{HistoryBuffer, HISTORY_CAP};
pub use message::{ChatMessage, ServerMessage};
pub use palette::{ColorPool, FALLBACK_COLOR, PALETTE};
pub use registry::Registry;
pub use server::{ChatServer, ServerCommand};
pub use session::{Session, SessionState, TextOutcome};
pub use types::ClientId;
