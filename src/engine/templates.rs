//! Pure move-template generation.
//!
//! Each piece kind has a movement descriptor: a set of unit step directions
//! and a sliding flag. Template generation is pure geometry: it respects
//! board bounds and nothing else. Occupancy, check safety, and the
//! en-passant exception are the rules engine's job. The same templates
//! answer both "where may this piece move" and "which squares does this
//! piece threaten", which keeps check detection free of recursion.

use crate::engine::types::{Color, Move, Piece, PieceType, Pos};

/// Movement shape for a piece kind: unit step directions plus whether the
/// piece repeats the step until it leaves the board.
pub struct MoveDescriptor {
    pub steps: &'static [(i8, i8)],
    pub sliding: bool,
}

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const STRAIGHTS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const ALL_DIRS: [(i8, i8); 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING: MoveDescriptor = MoveDescriptor {
    steps: &ALL_DIRS,
    sliding: false,
};
pub const QUEEN: MoveDescriptor = MoveDescriptor {
    steps: &ALL_DIRS,
    sliding: true,
};
pub const ROOK: MoveDescriptor = MoveDescriptor {
    steps: &STRAIGHTS,
    sliding: true,
};
pub const BISHOP: MoveDescriptor = MoveDescriptor {
    steps: &DIAGONALS,
    sliding: true,
};
pub const KNIGHT: MoveDescriptor = MoveDescriptor {
    steps: &KNIGHT_JUMPS,
    sliding: false,
};

/// Descriptor lookup for the non-pawn kinds. Pawns have asymmetric quiet
/// and capture shapes and are generated separately.
fn descriptor(kind: PieceType) -> &'static MoveDescriptor {
    match kind {
        PieceType::King => &KING,
        PieceType::Queen => &QUEEN,
        PieceType::Rook => &ROOK,
        PieceType::Bishop => &BISHOP,
        PieceType::Knight => &KNIGHT,
        PieceType::Pawn => unreachable!("pawn templates are generated separately"),
    }
}

/// Generate all candidate moves for a piece standing on `from`, restricted
/// to quiet moves or captures by `is_capture`. Board-bounds aware only.
pub fn template_moves(piece: Piece, from: Pos, is_capture: bool) -> Vec<Move> {
    if piece.kind == PieceType::Pawn {
        return pawn_templates(piece, from, is_capture);
    }

    let desc = descriptor(piece.kind);
    let mut moves = Vec::new();
    for &(dr, dc) in desc.steps {
        let mut cur = from;
        while let Some(next) = cur.offset(dr, dc) {
            moves.push(Move::new(piece.kind, from, next, is_capture));
            if !desc.sliding {
                break;
            }
            cur = next;
        }
    }
    moves
}

/// Pawn templates. Quiet and capture shapes are mutually exclusive and
/// selected by the caller's flag, never inferred from the board:
/// quiet-unmoved is one or two squares forward, quiet-moved one square,
/// and the capture shape is both forward diagonals regardless of moved
/// state.
fn pawn_templates(piece: Piece, from: Pos, is_capture: bool) -> Vec<Move> {
    let dir = piece.color.forward();
    let mut moves = Vec::new();

    if is_capture {
        for dc in [-1, 1] {
            if let Some(to) = from.offset(dir, dc) {
                moves.push(Move::new(PieceType::Pawn, from, to, true));
            }
        }
    } else {
        if let Some(to) = from.offset(dir, 0) {
            moves.push(Move::new(PieceType::Pawn, from, to, false));
        }
        if !piece.moved {
            if let Some(to) = from.offset(dir * 2, 0) {
                moves.push(Move::new(PieceType::Pawn, from, to, false));
            }
        }
    }
    moves
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Pos {
        Pos::from_algebraic(s).unwrap()
    }

    fn targets(piece: Piece, from: &str, is_capture: bool) -> Vec<String> {
        let mut t: Vec<String> = template_moves(piece, pos(from), is_capture)
            .into_iter()
            .map(|m| m.to.to_algebraic())
            .collect();
        t.sort();
        t
    }

    #[test]
    fn knight_corner_has_two_targets() {
        let knight = Piece::new(PieceType::Knight, Color::White);
        assert_eq!(targets(knight, "a1", false), vec!["b3", "c2"]);
    }

    #[test]
    fn knight_center_has_eight_targets() {
        let knight = Piece::new(PieceType::Knight, Color::Black);
        assert_eq!(
            template_moves(knight, pos("d4"), false).len(),
            8,
            "knight on d4"
        );
    }

    #[test]
    fn king_center_has_eight_targets() {
        let king = Piece::new(PieceType::King, Color::White);
        assert_eq!(template_moves(king, pos("d4"), false).len(), 8);
    }

    #[test]
    fn rook_slides_to_board_edge() {
        let rook = Piece::new(PieceType::Rook, Color::White);
        // 7 along the rank + 7 along the file from a corner.
        assert_eq!(template_moves(rook, pos("a1"), false).len(), 14);
    }

    #[test]
    fn bishop_center_has_thirteen_targets() {
        let bishop = Piece::new(PieceType::Bishop, Color::White);
        assert_eq!(template_moves(bishop, pos("d4"), false).len(), 13);
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let queen = Piece::new(PieceType::Queen, Color::White);
        assert_eq!(template_moves(queen, pos("d4"), false).len(), 14 + 13);
    }

    #[test]
    fn templates_ignore_occupancy() {
        // Generation only respects bounds; a rook "through" anything still
        // emits one candidate per square along the ray.
        let rook = Piece::new(PieceType::Rook, Color::White);
        let moves = template_moves(rook, pos("d4"), true);
        assert!(moves.iter().all(|m| m.is_capture));
        assert_eq!(moves.len(), 14);
    }

    #[test]
    fn unmoved_pawn_has_two_quiet_moves() {
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        assert_eq!(targets(pawn, "e2", false), vec!["e3", "e4"]);
    }

    #[test]
    fn moved_pawn_has_one_quiet_move() {
        let pawn = Piece::new(PieceType::Pawn, Color::White).advanced();
        assert_eq!(targets(pawn, "e4", false), vec!["e5"]);
    }

    #[test]
    fn black_pawn_moves_down_the_board() {
        let pawn = Piece::new(PieceType::Pawn, Color::Black);
        assert_eq!(targets(pawn, "e7", false), vec!["e5", "e6"]);
    }

    #[test]
    fn pawn_capture_template_is_always_diagonal() {
        // Both moved and unmoved pawns capture the same way.
        let fresh = Piece::new(PieceType::Pawn, Color::White);
        let moved = fresh.advanced();
        assert_eq!(targets(fresh, "e4", true), vec!["d5", "f5"]);
        assert_eq!(targets(moved, "e4", true), vec!["d5", "f5"]);
    }

    #[test]
    fn pawn_capture_on_edge_file() {
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        assert_eq!(targets(pawn, "a2", true), vec!["b3"]);
        assert_eq!(targets(pawn, "h2", true), vec!["g3"]);
    }

    #[test]
    fn quiet_and_capture_templates_are_disjoint() {
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        let quiet = template_moves(pawn, pos("e2"), false);
        let capture = template_moves(pawn, pos("e2"), true);
        for q in &quiet {
            assert!(!capture.contains(q));
        }
    }
}
