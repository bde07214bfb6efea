//! Per-match protocol loop.
//!
//! One controller task owns a match end to end: it waits for the second
//! seat, relays validated turns through the rules engine, pings both
//! seats on a fixed heartbeat cycle, and tears the match down on the
//! first terminal event (mate, draw, resignation, disconnect, or a
//! missed heartbeat). The controller is the only writer of its `Game`,
//! so no locking is needed around game state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::game::Game;
use crate::engine::types::{Color, Move, PieceType, Pos};
use crate::net::messages::{ClientMessage, ServerMessage};
use crate::net::registry::{PendingSeat, Registry};

/// One event per iteration of the protocol loop.
enum Event {
    /// Heartbeat ticker fired.
    Tick,
    /// A seat produced a message, or its stream ended (`None`).
    Inbound(Color, Option<ClientMessage>),
}

/// How the match ended, for the teardown notification.
enum Ending {
    /// Game concluded over the board; replies already sent.
    Played,
    /// `loser`'s seat resigned.
    Resigned { loser: Color },
    /// `loser`'s seat dropped or missed a heartbeat.
    Dropped { loser: Color },
}

/// Drives a single match from creation to teardown.
pub struct MatchController {
    id: String,
    registry: Arc<Registry>,
    game: Game,
    heartbeat_interval: Duration,
    created_at: DateTime<Utc>,
}

impl MatchController {
    /// Spawn the controller task for a freshly created match. `white` is
    /// the creator's seat; the second seat arrives through `gate` when a
    /// client joins under this match ID.
    pub fn spawn(
        id: String,
        registry: Arc<Registry>,
        heartbeat_interval: Duration,
        white: PendingSeat,
        gate: mpsc::Receiver<PendingSeat>,
    ) -> JoinHandle<()> {
        let controller = MatchController {
            id,
            registry,
            game: Game::new(),
            heartbeat_interval,
            created_at: Utc::now(),
        };
        tokio::spawn(controller.run(white, gate))
    }

    async fn run(mut self, mut white: PendingSeat, mut gate: mpsc::Receiver<PendingSeat>) {
        // Phase 1: wait for Black, watching White for early departure.
        let mut black = loop {
            tokio::select! {
                seat = gate.recv() => match seat {
                    Some(seat) => break seat,
                    // Registry side of the gate is gone; nothing to wait for.
                    None => {
                        self.teardown_single(white).await;
                        return;
                    }
                },
                msg = white.inbound.recv() => match msg {
                    None | Some(ClientMessage::Disconnect { .. }) => {
                        debug!(match_id = %self.id, "creator left before an opponent joined");
                        self.teardown_single(white).await;
                        return;
                    }
                    Some(other) => {
                        debug!(match_id = %self.id, ?other, "message before match start, dropped");
                    }
                },
            }
        };

        // Phase 2: both seats filled.
        black
            .conn
            .send(ServerMessage::join_accepted(&self.id, &self.game.to_fen()));
        white.conn.send(ServerMessage::OpponentConnected);
        black.conn.send(ServerMessage::OpponentConnected);
        info!(match_id = %self.id, "match started");

        let mut ticker = tokio::time::interval(self.heartbeat_interval);
        // A seat is late once it fails to answer between two ticks.
        let mut pinged = false;

        let ending = loop {
            let event = tokio::select! {
                _ = ticker.tick() => Event::Tick,
                msg = white.inbound.recv() => Event::Inbound(Color::White, msg),
                msg = black.inbound.recv() => Event::Inbound(Color::Black, msg),
            };

            match event {
                Event::Tick => {
                    if pinged {
                        if !white.conn.take_heartbeat() {
                            break Ending::Dropped {
                                loser: Color::White,
                            };
                        }
                        if !black.conn.take_heartbeat() {
                            break Ending::Dropped {
                                loser: Color::Black,
                            };
                        }
                    }
                    white.conn.send(ServerMessage::heartbeat(&self.id));
                    black.conn.send(ServerMessage::heartbeat(&self.id));
                    pinged = true;
                }
                Event::Inbound(seat, None) => {
                    break Ending::Dropped { loser: seat };
                }
                Event::Inbound(seat, Some(ClientMessage::Disconnect { .. })) => {
                    break Ending::Dropped { loser: seat };
                }
                Event::Inbound(seat, Some(ClientMessage::Resign { .. })) => {
                    break Ending::Resigned { loser: seat };
                }
                Event::Inbound(
                    seat,
                    Some(ClientMessage::Turn {
                        piece,
                        from,
                        to,
                        is_capture,
                        ..
                    }),
                ) => {
                    let over =
                        self.handle_turn(seat, piece, &from, &to, is_capture, &white, &black);
                    if over {
                        break Ending::Played;
                    }
                }
                Event::Inbound(seat, Some(other)) => {
                    debug!(match_id = %self.id, %seat, ?other, "unexpected message mid-match, dropped");
                }
            }
        };

        match ending {
            Ending::Played => {}
            Ending::Resigned { loser } => {
                let survivor = if loser == Color::White {
                    &black.conn
                } else {
                    &white.conn
                };
                survivor.send(ServerMessage::OpponentResigned {
                    match_id: self.id.clone(),
                });
                info!(match_id = %self.id, %loser, "match ended by resignation");
            }
            Ending::Dropped { loser } => {
                let survivor = if loser == Color::White {
                    &black.conn
                } else {
                    &white.conn
                };
                survivor.send(ServerMessage::OpponentDisconnected {
                    match_id: self.id.clone(),
                });
                warn!(match_id = %self.id, %loser, "seat lost, opponent notified");
            }
        }

        self.teardown(white, black).await;
    }

    /// Validate and apply one proposed move. Returns true when the move
    /// ended the game.
    ///
    /// A turn from the seat whose side is not to move is dropped without
    /// a reply; an illegal or unparseable turn is rejected to its sender
    /// alone; a legal turn is broadcast to both seats.
    fn handle_turn(
        &mut self,
        seat: Color,
        piece: PieceType,
        from: &str,
        to: &str,
        is_capture: bool,
        white: &PendingSeat,
        black: &PendingSeat,
    ) -> bool {
        if seat != self.game.side_to_move() {
            debug!(match_id = %self.id, %seat, "turn out of order, dropped");
            return false;
        }
        let sender = if seat == Color::White {
            &white.conn
        } else {
            &black.conn
        };

        let (from_sq, to_sq) = match (Pos::from_algebraic(from), Pos::from_algebraic(to)) {
            (Some(f), Some(t)) => (f, t),
            _ => {
                debug!(match_id = %self.id, %seat, from, to, "unparseable squares, turn rejected");
                sender.send(ServerMessage::turn_rejected(&self.id, &self.game.to_fen()));
                return false;
            }
        };

        let mv = Move::new(piece, from_sq, to_sq, is_capture);
        match self.game.make_move(mv) {
            Ok(()) => {
                let over = self.game.is_game_over();
                let reply = ServerMessage::turn_accepted(
                    &self.id,
                    &self.game.to_fen(),
                    over,
                    self.game.winner(),
                );
                white.conn.send(reply.clone());
                black.conn.send(reply);
                if over {
                    info!(match_id = %self.id, status = self.game.status().as_str(), "game over");
                }
                over
            }
            Err(e) => {
                debug!(match_id = %self.id, %seat, %mv, "illegal turn rejected: {e}");
                sender.send(ServerMessage::turn_rejected(&self.id, &self.game.to_fen()));
                false
            }
        }
    }

    /// Close one seat and evict the match. Used when the match ends
    /// before the second player arrives.
    async fn teardown_single(self, seat: PendingSeat) {
        seat.conn.close();
        self.registry.remove(&self.id).await;
        info!(
            match_id = %self.id,
            lived_secs = (Utc::now() - self.created_at).num_seconds(),
            "match closed",
        );
    }

    /// Close both seats and evict the match.
    async fn teardown(self, white: PendingSeat, black: PendingSeat) {
        black.conn.close();
        self.teardown_single(white).await;
    }
}
