//! Mailbox board representation.
//!
//! `Board` is a plain 8×8 grid of optional pieces, indexed by `Pos`
//! (row 0 = rank 1). It knows nothing about legality; the rules engine
//! layers movement and check semantics on top. Each board has exactly one
//! owner (the active game) and is cloned only by the rules engine's
//! simulation helper.

use crate::engine::types::{ChessError, Color, Piece, PieceType, Pos};

/// An 8×8 grid of optional pieces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        let back = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (col, &kind) in back.iter().enumerate() {
            let col = col as u8;
            board.set(Pos::new(0, col), Piece::new(kind, Color::White));
            board.set(Pos::new(7, col), Piece::new(kind, Color::Black));
            board.set(Pos::new(1, col), Piece::new(PieceType::Pawn, Color::White));
            board.set(Pos::new(6, col), Piece::new(PieceType::Pawn, Color::Black));
        }
        board
    }

    // -----------------------------------------------------------------
    // Square access
    // -----------------------------------------------------------------

    /// The piece on a square, if any.
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Piece> {
        self.squares[pos.row as usize][pos.col as usize]
    }

    /// Place a piece on a square, replacing whatever was there.
    #[inline]
    pub fn set(&mut self, pos: Pos, piece: Piece) {
        self.squares[pos.row as usize][pos.col as usize] = Some(piece);
    }

    /// Empty a square, returning the piece that was there.
    #[inline]
    pub fn clear(&mut self, pos: Pos) -> Option<Piece> {
        self.squares[pos.row as usize][pos.col as usize].take()
    }

    /// Whether a square is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos).is_none()
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Iterate over all occupied squares as (position, piece) pairs.
    pub fn occupied(&self) -> impl Iterator<Item = (Pos, Piece)> + '_ {
        (0..8u8).flat_map(move |row| {
            (0..8u8).filter_map(move |col| {
                let pos = Pos::new(row, col);
                self.get(pos).map(|piece| (pos, piece))
            })
        })
    }

    /// Iterate over one side's pieces.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Pos, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.color == color)
    }

    /// Total number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.occupied().count()
    }

    /// Find the king of a color. A legal position always has both kings.
    pub fn king_pos(&self, color: Color) -> Option<Pos> {
        self.pieces(color)
            .find(|(_, p)| p.kind == PieceType::King)
            .map(|(pos, _)| pos)
    }

    // -----------------------------------------------------------------
    // FEN piece placement field (ranks 8 → 1, '/'-separated)
    // -----------------------------------------------------------------

    /// Serialize the piece placement field of a FEN string.
    pub fn to_placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in (0..8u8).rev() {
            let mut empties = 0;
            for col in 0..8u8 {
                match self.get(Pos::new(row, col)) {
                    Some(piece) => {
                        if empties > 0 {
                            out.push(char::from(b'0' + empties));
                            empties = 0;
                        }
                        out.push(piece.to_char());
                    }
                    None => empties += 1,
                }
            }
            if empties > 0 {
                out.push(char::from(b'0' + empties));
            }
            if row > 0 {
                out.push('/');
            }
        }
        out
    }

    /// Parse the piece placement field of a FEN string.
    ///
    /// Pawns off their home rank are marked moved so the two-square
    /// advance template no longer applies to them.
    pub fn from_placement(s: &str) -> Result<Self, ChessError> {
        let ranks: Vec<&str> = s.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (i, rank) in ranks.iter().enumerate() {
            let row = 7 - i as u8; // FEN lists rank 8 first
            let mut col = 0u8;
            for c in rank.chars() {
                if let Some(d) = c.to_digit(10) {
                    col += d as u8;
                    if col > 8 {
                        return Err(ChessError::InvalidFen(format!("rank overflow: {rank}")));
                    }
                } else {
                    let (color, kind) = PieceType::from_char(c)
                        .ok_or_else(|| ChessError::InvalidFen(format!("bad piece char: {c}")))?;
                    if col >= 8 {
                        return Err(ChessError::InvalidFen(format!("rank overflow: {rank}")));
                    }
                    let mut piece = Piece::new(kind, color);
                    if kind == PieceType::Pawn && row != pawn_home_row(color) {
                        piece = piece.advanced();
                    }
                    board.set(Pos::new(row, col), piece);
                    col += 1;
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidFen(format!("short rank: {rank}")));
            }
        }
        Ok(board)
    }
}

/// The starting row for a color's pawns.
fn pawn_home_row(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
