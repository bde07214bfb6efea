//! TCP accept loop and first-message routing.
//!
//! Every accepted socket gets its own routing task. The first decoded
//! message decides the socket's fate: `start_match` creates a match and
//! hands the socket to a new controller as White; `join_match` delivers
//! it to the waiting controller as Black; anything else closes the
//! socket. After routing, the socket belongs to its controller and the
//! accept side never touches it again.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::engine::game::STARTING_FEN;
use crate::net::connection::Connection;
use crate::net::controller::MatchController;
use crate::net::messages::{ClientMessage, ServerMessage};
use crate::net::registry::{PendingSeat, Registry};

/// Bind the configured address and serve forever.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "match server listening");
    serve(listener, &config).await
}

/// Accept loop over an already bound listener. Split out so tests can
/// bind an ephemeral port first.
pub async fn serve(listener: TcpListener, config: &AppConfig) -> std::io::Result<()> {
    let registry = Registry::new(config.match_id_len);
    let heartbeat = Duration::from_millis(config.heartbeat_interval_ms);

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "client connected");
        tokio::spawn(route_connection(stream, registry.clone(), heartbeat));
    }
}

/// Read the first message and seat the socket accordingly.
async fn route_connection(stream: TcpStream, registry: Arc<Registry>, heartbeat: Duration) {
    let (conn, mut inbound) = Connection::spawn(stream);

    match inbound.recv().await {
        Some(ClientMessage::StartMatch) => {
            let (id, gate) = registry.create().await;
            conn.send(ServerMessage::start_reply(&id, STARTING_FEN));
            let white = PendingSeat { conn, inbound };
            MatchController::spawn(id, registry, heartbeat, white, gate);
        }
        Some(ClientMessage::JoinMatch { match_id }) => {
            match registry.join(&match_id).await {
                Some(seat_tx) => {
                    let black = PendingSeat { conn, inbound };
                    if let Err(e) = seat_tx.try_send(black) {
                        // Controller died between registration and now;
                        // recover the seat to deliver the rejection.
                        let black = e.into_inner();
                        debug!(%match_id, "controller gone, join rejected");
                        black
                            .conn
                            .send(ServerMessage::join_rejected(&match_id));
                    }
                    // Acceptance is confirmed by the controller itself.
                }
                None => {
                    debug!(%match_id, "join for unknown or full match rejected");
                    conn.send(ServerMessage::join_rejected(&match_id));
                }
            }
        }
        Some(other) => {
            warn!(?other, "unexpected first message, closing connection");
        }
        None => {
            debug!("client left before sending anything");
        }
    }
}
