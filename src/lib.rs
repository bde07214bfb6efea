//! Two-player network chess.
//!
//! - [`engine`]: Rules engine (board, move templates, legality, game state).
//! - [`net`]: Match server (wire protocol, connections, registry, match loop).
//! - [`config`]: Environment-driven server configuration.
//! - [`server`]: Listening socket and first-message routing.

pub mod config;
pub mod engine;
pub mod net;
pub mod server;
