//! Match server networking.
//!
//! - [`messages`]: Typed wire messages for both directions.
//! - [`codec`]: Length-prefixed JSON framing over TCP.
//! - [`connection`]: Per-socket reader/writer tasks and the heartbeat flag.
//! - [`registry`]: Thread-safe match registry with random identifiers.
//! - [`controller`]: Per-match turn protocol and heartbeat loop.

pub mod codec;
pub mod connection;
pub mod controller;
pub mod messages;
pub mod registry;

pub use connection::Connection;
pub use controller::MatchController;
pub use messages::{ClientMessage, ServerMessage};
pub use registry::Registry;
