//! Legality checking and terminal-condition detection.
//!
//! Pipeline:
//!   1. Generate pure move templates for the piece on the start square.
//!   2. Filter against the board: path blocking, capture-flag agreement
//!      with destination occupancy (with the en-passant exception), and
//!      the own-king-safety probe.
//!   3. A move is valid iff it is a legal castle or appears in the
//!      filtered list; legality is containment in the engine's own
//!      exhaustive generation, not a second rule table.
//!
//! Nothing here mutates the caller's board: the king-safety probe applies
//! the candidate edit to a clone and drops it. Threat queries reuse the
//! capture templates without recursing into king safety, so check
//! detection cannot recurse into itself.

use crate::engine::board::Board;
use crate::engine::templates::template_moves;
use crate::engine::types::{CastlingRights, Color, Move, PieceType, Pos};

// =========================================================================
// Move validation
// =========================================================================

/// Is `mv` legal for `side` on this board?
pub fn is_move_valid(
    board: &Board,
    mv: Move,
    side: Color,
    en_passant: Option<Pos>,
    rights: CastlingRights,
) -> bool {
    let piece = match board.get(mv.from) {
        Some(p) => p,
        None => return false,
    };
    if piece.color != side || piece.kind != mv.piece {
        return false;
    }

    if let Some(castle) = CastleSide::matching(&mv, side) {
        return piece.kind == PieceType::King && is_castle_legal(board, side, castle, rights);
    }

    let candidates = filter_candidates(
        board,
        template_moves(piece, mv.from, mv.is_capture),
        side,
        en_passant,
    );
    candidates.contains(&mv)
}

/// Filter raw templates against the board: path must be clear, destination
/// occupancy must agree with the capture flag (empty + capture is only the
/// en-passant exception, for pawns), and the mover's own king must not be
/// left in check.
fn filter_candidates(
    board: &Board,
    candidates: Vec<Move>,
    side: Color,
    en_passant: Option<Pos>,
) -> Vec<Move> {
    candidates
        .into_iter()
        .filter(|mv| {
            if mv.path().iter().any(|&sq| !board.is_empty(sq)) {
                return false;
            }
            match board.get(mv.to) {
                None => {
                    if mv.is_capture
                        && !(mv.piece == PieceType::Pawn && Some(mv.to) == en_passant)
                    {
                        return false;
                    }
                }
                Some(target) => {
                    if target.color == side || !mv.is_capture {
                        return false;
                    }
                }
            }
            !leaves_king_in_check(board, *mv, side, en_passant)
        })
        .collect()
}

/// King-safety probe: apply the candidate edit to a clone of the board and
/// ask whether the opponent then threatens the mover's king square.
fn leaves_king_in_check(board: &Board, mv: Move, side: Color, en_passant: Option<Pos>) -> bool {
    let mut probe = board.clone();
    let piece = match probe.clear(mv.from) {
        Some(p) => p,
        None => return true,
    };
    if mv.is_capture && probe.is_empty(mv.to) && Some(mv.to) == en_passant {
        if let Some(victim) = mv.en_passant_victim(side) {
            probe.clear(victim);
        }
    }
    probe.set(mv.to, piece);

    match probe.king_pos(side) {
        Some(king) => is_square_attacked(&probe, king, !side),
        None => false,
    }
}

// =========================================================================
// Threat queries
// =========================================================================

/// Is `sq` attacked by any piece of color `by`?
///
/// Answered from capture templates alone: a square is attacked when some
/// piece has a clear capture path onto it. King safety is deliberately not
/// consulted here.
pub fn is_square_attacked(board: &Board, sq: Pos, by: Color) -> bool {
    board.pieces(by).any(|(from, piece)| {
        template_moves(piece, from, true)
            .into_iter()
            .any(|mv| mv.to == sq && mv.path().iter().all(|&p| board.is_empty(p)))
    })
}

/// Is `side`'s king currently in check?
pub fn is_in_check(board: &Board, side: Color) -> bool {
    match board.king_pos(side) {
        Some(king) => is_square_attacked(board, king, !side),
        None => false,
    }
}

// =========================================================================
// Castling
// =========================================================================

/// The two castle directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Match a move against the canonical king (start, end) pairs.
    pub fn matching(mv: &Move, side: Color) -> Option<CastleSide> {
        if mv.piece != PieceType::King {
            return None;
        }
        let back = side.back_row();
        if mv.from != Pos::new(back, 4) || mv.to.row != back {
            return None;
        }
        match mv.to.col {
            6 => Some(CastleSide::Kingside),
            2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    /// The king's destination square.
    pub fn king_to(self, side: Color) -> Pos {
        let back = side.back_row();
        match self {
            CastleSide::Kingside => Pos::new(back, 6),
            CastleSide::Queenside => Pos::new(back, 2),
        }
    }

    /// The rook's (from, to) squares.
    pub fn rook_squares(self, side: Color) -> (Pos, Pos) {
        let back = side.back_row();
        match self {
            CastleSide::Kingside => (Pos::new(back, 7), Pos::new(back, 5)),
            CastleSide::Queenside => (Pos::new(back, 0), Pos::new(back, 3)),
        }
    }

    fn right_flag(self, side: Color) -> u8 {
        match self {
            CastleSide::Kingside => CastlingRights::kingside_flag(side),
            CastleSide::Queenside => CastlingRights::queenside_flag(side),
        }
    }
}

/// Gate a castle on: the right still held, the squares the king or rook
/// cross being empty, and none of the king's transit squares (its start
/// square included) being attacked.
fn is_castle_legal(board: &Board, side: Color, castle: CastleSide, rights: CastlingRights) -> bool {
    if !rights.has(castle.right_flag(side)) {
        return false;
    }
    let back = side.back_row();
    let (crossed, transit): (&[u8], &[u8]) = match castle {
        CastleSide::Kingside => (&[5, 6], &[4, 5, 6]),
        CastleSide::Queenside => (&[1, 2, 3], &[4, 3, 2]),
    };
    if crossed.iter().any(|&col| !board.is_empty(Pos::new(back, col))) {
        return false;
    }
    !transit
        .iter()
        .any(|&col| is_square_attacked(board, Pos::new(back, col), !side))
}

// =========================================================================
// Exhaustive legal move generation
// =========================================================================

/// All legal moves for `side`: every filtered quiet and capture template
/// plus any legal castles.
pub fn legal_moves(
    board: &Board,
    side: Color,
    en_passant: Option<Pos>,
    rights: CastlingRights,
) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, piece) in board.pieces(side) {
        for is_capture in [false, true] {
            moves.extend(filter_candidates(
                board,
                template_moves(piece, from, is_capture),
                side,
                en_passant,
            ));
        }
    }
    for castle in [CastleSide::Kingside, CastleSide::Queenside] {
        if is_castle_legal(board, side, castle, rights) {
            let back = side.back_row();
            moves.push(Move::new(
                PieceType::King,
                Pos::new(back, 4),
                castle.king_to(side),
                false,
            ));
        }
    }
    moves
}

// =========================================================================
// Terminal conditions
// =========================================================================

/// Checkmate: in check with no legal move.
pub fn is_checkmate(
    board: &Board,
    side: Color,
    en_passant: Option<Pos>,
    rights: CastlingRights,
) -> bool {
    is_in_check(board, side) && legal_moves(board, side, en_passant, rights).is_empty()
}

/// Stalemate: not in check, but no legal move.
pub fn is_stalemate(
    board: &Board,
    side: Color,
    en_passant: Option<Pos>,
    rights: CastlingRights,
) -> bool {
    !is_in_check(board, side) && legal_moves(board, side, en_passant, rights).is_empty()
}

/// Insufficient material: at most three pieces in total and nothing beyond
/// the kings except a single minor piece.
pub fn insufficient_material(board: &Board) -> bool {
    if board.piece_count() > 3 {
        return false;
    }
    board.occupied().all(|(_, piece)| {
        matches!(
            piece.kind,
            PieceType::King | PieceType::Bishop | PieceType::Knight
        )
    })
}

// =========================================================================
// Tests
// =========================================================================
