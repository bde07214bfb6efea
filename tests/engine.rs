//! Integration tests for the rules engine's public surface.
//!
//! Plays complete games through `Game::make_move` and checks the derived
//! state (FEN, status, winner) the way the match server consumes it.

use netchess::engine::game::{Game, STARTING_FEN};
use netchess::engine::rules;
use netchess::engine::types::{Color, GameStatus, Move, PieceType, Pos};

/// Apply one move given in algebraic squares, panicking on rejection.
fn play(game: &mut Game, piece: PieceType, from: &str, to: &str, is_capture: bool) {
    let mv = Move::new(
        piece,
        Pos::from_algebraic(from).unwrap(),
        Pos::from_algebraic(to).unwrap(),
        is_capture,
    );
    game.make_move(mv).unwrap_or_else(|e| panic!("{mv} rejected: {e}"));
}

#[test]
fn starting_position_move_census() {
    let game = Game::new();
    let moves = game.legal_moves();

    assert_eq!(moves.len(), 20);
    assert!(moves.iter().all(|m| !m.is_capture));
    let pawn_moves = moves.iter().filter(|m| m.piece == PieceType::Pawn).count();
    let knight_moves = moves
        .iter()
        .filter(|m| m.piece == PieceType::Knight)
        .count();
    assert_eq!(pawn_moves, 16);
    assert_eq!(knight_moves, 4);
}

#[test]
fn every_generated_move_validates() {
    let positions = [
        STARTING_FEN,
        "r3k3/8/8/4B2b/8/8/8/R3K2R w KQq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    ];
    for fen in positions {
        let game = Game::from_fen(fen).unwrap();
        for mv in game.legal_moves() {
            assert!(
                rules::is_move_valid(
                    game.board(),
                    mv,
                    game.side_to_move(),
                    game.en_passant(),
                    game.castling_rights(),
                ),
                "generated move {mv} fails validation in {fen}"
            );
        }
    }
}

#[test]
fn fools_mate_ends_with_black_winning() {
    let mut game = Game::new();
    play(&mut game, PieceType::Pawn, "f2", "f3", false);
    play(&mut game, PieceType::Pawn, "e7", "e5", false);
    play(&mut game, PieceType::Pawn, "g2", "g4", false);
    play(&mut game, PieceType::Queen, "d8", "h4", false);

    assert_eq!(game.status(), GameStatus::Checkmate);
    assert!(game.is_game_over());
    assert_eq!(game.winner(), Some(Color::Black));
    // No further moves accepted.
    let mv = Move::new(
        PieceType::Pawn,
        Pos::from_algebraic("a2").unwrap(),
        Pos::from_algebraic("a3").unwrap(),
        false,
    );
    assert!(game.make_move(mv).is_err());
}

#[test]
fn scholars_mate_with_captures() {
    let mut game = Game::new();
    play(&mut game, PieceType::Pawn, "e2", "e4", false);
    play(&mut game, PieceType::Pawn, "e7", "e5", false);
    play(&mut game, PieceType::Bishop, "f1", "c4", false);
    play(&mut game, PieceType::Knight, "b8", "c6", false);
    play(&mut game, PieceType::Queen, "d1", "h5", false);
    play(&mut game, PieceType::Knight, "g8", "f6", false);
    play(&mut game, PieceType::Queen, "h5", "f7", true);

    assert_eq!(game.status(), GameStatus::Checkmate);
    assert_eq!(game.winner(), Some(Color::White));
    // Capture resets the halfmove clock.
    assert_eq!(game.halfmove_clock(), 0);
    assert_eq!(game.fullmove_number(), 4);
}

#[test]
fn kingside_castle_plays_out() {
    let mut game = Game::from_fen("r3k3/8/8/4B2b/8/8/8/R3K2R w KQq - 0 1").unwrap();
    let castle = Move::new(
        PieceType::King,
        Pos::from_algebraic("e1").unwrap(),
        Pos::from_algebraic("g1").unwrap(),
        false,
    );
    assert!(game.legal_moves().contains(&castle));
    game.make_move(castle).unwrap();

    let fen = game.to_fen();
    // King on g1, rook on f1, White rights gone, Black queenside kept.
    assert!(fen.starts_with("r3k3/8/8/4B2b/8/8/8/R4RK1 b"));
    assert!(fen.contains(" q "));
}

#[test]
fn black_cannot_castle_through_attack() {
    // The h5 bishop covers e8's transit; Black holds only the queenside
    // right, and the king may not castle out of an attacked square.
    let game = Game::from_fen("r3k3/8/8/4B2b/8/8/8/R3K2R b KQq - 0 1").unwrap();
    let to_c8 = Pos::from_algebraic("c8").unwrap();
    assert!(!game
        .legal_moves()
        .iter()
        .any(|m| m.piece == PieceType::King && m.to == to_c8));
}

#[test]
fn en_passant_removes_the_bypassing_pawn() {
    let mut game =
        Game::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    play(&mut game, PieceType::Pawn, "e5", "f6", true);

    let fen = game.to_fen();
    // The f5 pawn is gone and the capturer stands on f6.
    assert!(fen.starts_with("rnbqkbnr/ppp1p1pp/5P2/3p4/8/8/PPPP1PPP/RNBQKBNR b"));
    assert_eq!(game.en_passant(), None);
}

#[test]
fn promotion_yields_a_queen() {
    let mut game = Game::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
    play(&mut game, PieceType::Pawn, "a7", "a8", false);
    assert!(game.to_fen().starts_with("Q7/8/8/8/8/8/8/k6K b"));
}

#[test]
fn move_count_rule_draws_the_game() {
    let game = Game::from_fen("k7/8/8/8/8/8/8/K6R w - - 51 80").unwrap();
    assert_eq!(
        game.status(),
        GameStatus::Draw(netchess::engine::types::DrawReason::MoveCountRule)
    );
    assert!(game.is_game_over());
    assert_eq!(game.winner(), None);
}

#[test]
fn bare_kings_are_a_draw() {
    let game = Game::from_fen("k7/8/8/8/8/8/8/K7 w - - 0 40").unwrap();
    assert_eq!(
        game.status(),
        GameStatus::Draw(netchess::engine::types::DrawReason::InsufficientMaterial)
    );
}

#[test]
fn fen_round_trips_through_game_state() {
    let fens = [
        STARTING_FEN,
        "r3k3/8/8/4B2b/8/8/8/R3K2R w KQq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        "8/P7/8/8/8/8/8/k6K w - - 12 34",
    ];
    for fen in fens {
        assert_eq!(Game::from_fen(fen).unwrap().to_fen(), fen);
    }
}

#[test]
fn sliding_path_is_the_strictly_between_squares() {
    let mv = Move::new(PieceType::Rook, Pos::new(0, 0), Pos::new(5, 0), false);
    let path = mv.path();
    assert_eq!(
        path,
        vec![Pos::new(1, 0), Pos::new(2, 0), Pos::new(3, 0), Pos::new(4, 0)]
    );
}
