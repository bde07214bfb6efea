//! Authoritative per-game state.
//!
//! `Game` owns the board, castling rights, clocks, side to move, and the
//! en-passant target, and is mutated only through `make_move`. It is the
//! type the match controller interacts with; legality questions are
//! delegated to the rules engine. Game state serializes to and from the
//! six-field FEN notation used on the wire.

use crate::engine::board::Board;
use crate::engine::rules::{self, CastleSide};
use crate::engine::types::{
    CastlingRights, ChessError, Color, DrawReason, GameStatus, Move, Piece, PieceType, Pos,
};

/// Standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A chess game: board plus the derived state the rules need.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Pos>,
    /// Plies since the last capture or pawn move.
    halfmove_clock: u16,
    /// Starts at 1, incremented after Black moves.
    fullmove_number: u16,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// A new game from the standard starting position.
    pub fn new() -> Self {
        Game {
            board: Board::starting(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Restore a game from a six-field FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let board = Board::from_placement(fields[0])?;
        let side_to_move = Color::from_fen(fields[1])
            .ok_or_else(|| ChessError::InvalidFen(format!("bad side to move: {}", fields[1])))?;
        let castling_rights = CastlingRights::from_fen(fields[2])
            .ok_or_else(|| ChessError::InvalidFen(format!("bad castling rights: {}", fields[2])))?;
        let en_passant = match fields[3] {
            "-" => None,
            sq => Some(
                Pos::from_algebraic(sq)
                    .ok_or_else(|| ChessError::InvalidFen(format!("bad en-passant square: {sq}")))?,
            ),
        };
        let halfmove_clock = fields[4]
            .parse()
            .map_err(|_| ChessError::InvalidFen(format!("bad halfmove clock: {}", fields[4])))?;
        let fullmove_number = fields[5]
            .parse()
            .map_err(|_| ChessError::InvalidFen(format!("bad fullmove number: {}", fields[5])))?;

        Ok(Game {
            board,
            side_to_move,
            castling_rights,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Serialize the full game state as FEN.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.board.to_placement(),
            self.side_to_move.to_fen(),
            self.castling_rights.to_fen(),
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant(&self) -> Option<Pos> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        rules::legal_moves(
            &self.board,
            self.side_to_move,
            self.en_passant,
            self.castling_rights,
        )
    }

    // -----------------------------------------------------------------
    // Status queries
    // -----------------------------------------------------------------

    /// Current status, derived from the rules engine.
    pub fn status(&self) -> GameStatus {
        let no_moves = self.legal_moves().is_empty();
        let in_check = rules::is_in_check(&self.board, self.side_to_move);

        if no_moves {
            return if in_check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if rules::insufficient_material(&self.board) {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        // Move-count draw when the clock exceeds 50 plies.
        if self.halfmove_clock > 50 {
            return GameStatus::Draw(DrawReason::MoveCountRule);
        }
        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_game_over()
    }

    /// The winning side. Defined only for checkmate; resignation and
    /// disconnect outcomes are decided by the protocol layer.
    pub fn winner(&self) -> Option<Color> {
        match self.status() {
            GameStatus::Checkmate => Some(!self.side_to_move),
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Apply a move for the side to move. On any validation failure the
    /// game state is left untouched.
    pub fn make_move(&mut self, mv: Move) -> Result<(), ChessError> {
        if self.is_game_over() {
            return Err(ChessError::GameOver(self.status().to_string()));
        }
        if !rules::is_move_valid(
            &self.board,
            mv,
            self.side_to_move,
            self.en_passant,
            self.castling_rights,
        ) {
            return Err(ChessError::InvalidMove(mv.to_string()));
        }

        let mover = self.side_to_move;
        let piece = self
            .board
            .clear(mv.from)
            .ok_or_else(|| ChessError::InvalidMove(mv.to_string()))?;
        let is_pawn = piece.kind == PieceType::Pawn;

        if mv.is_capture || is_pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // Castle, en passant, and normal execution are mutually exclusive,
        // tried in that order.
        if let Some(castle) = CastleSide::matching(&mv, mover) {
            self.board.set(castle.king_to(mover), piece);
            let (rook_from, rook_to) = castle.rook_squares(mover);
            if let Some(rook) = self.board.clear(rook_from) {
                self.board.set(rook_to, rook);
            }
        } else if is_pawn && mv.is_capture && Some(mv.to) == self.en_passant {
            // The captured pawn sits one rank behind the destination.
            if let Some(victim) = mv.en_passant_victim(mover) {
                self.board.clear(victim);
            }
            self.board.set(mv.to, piece.advanced());
        } else {
            let placed = if is_pawn && mv.to.row == mover.promotion_row() {
                // Promotion is always to a queen in this protocol.
                Piece::new(PieceType::Queen, mover)
            } else if is_pawn {
                piece.advanced()
            } else {
                piece
            };
            self.board.set(mv.to, placed);
        }

        // En-passant target lives for exactly one ply.
        self.en_passant = if mv.is_double_advance() {
            mv.from.offset(mover.forward(), 0)
        } else {
            None
        };

        // Rights are revoked only when the king or a rook moves off its
        // original square; a rook captured at home leaves the stale right
        // in place.
        if piece.kind == PieceType::King {
            self.castling_rights
                .remove(CastlingRights::color_flags(mover));
        } else if piece.kind == PieceType::Rook {
            let back = mover.back_row();
            if mv.from == Pos::new(back, 0) {
                self.castling_rights
                    .remove(CastlingRights::queenside_flag(mover));
            } else if mv.from == Pos::new(back, 7) {
                self.castling_rights
                    .remove(CastlingRights::kingside_flag(mover));
            }
        }

        if mover == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = !mover;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
