use super::*;
use crate::codec::PositionText;

fn position(fen: &str) -> Position {
    Position::parse(&PositionText::from(fen)).unwrap()
}

fn play(fen: &str, mv: &str) -> String {
    apply(&position(fen), Move::parse(mv).unwrap())
        .to_text()
        .into_string()
}

#[test]
fn test_plain_move_and_double_push() {
    assert_eq!(
        play(crate::codec::STARTPOS, "e2e4"),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
    assert_eq!(
        play("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1", "g8f6"),
        "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
    );
}

#[test]
fn test_reverse_move_restores_grid() {
    let start = Position::startpos();
    let forward = apply_to_grid(&start.grid, Move::parse("g1f3").unwrap());
    let back = apply_to_grid(&forward, Move::parse("f3g1").unwrap());
    assert_eq!(back, start.grid);
}

#[test]
fn test_castling_with_rights() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    assert_eq!(play(fen, "e1g1"), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    assert_eq!(play(fen, "e1h1"), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    assert_eq!(play(fen, "e1c1"), "r3k2r/8/8/8/8/8/8/2KR3R b kq - 1 1");

    let fen = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1";
    assert_eq!(play(fen, "e8c8"), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2");
    assert_eq!(play(fen, "e8a8"), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2");
}

#[test]
fn test_king_two_files_without_rights_is_plain() {
    let text = play("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1", "e1g1");
    assert_eq!(text, "r3k2r/8/8/8/8/8/8/R5KR b kq - 1 1");
}

#[test]
fn test_king_on_home_square_without_rook_is_plain() {
    // Kingside right is dropped on parse because h1 is empty.
    let text = play("4k3/8/8/8/8/8/8/4K3 w K - 0 1", "e1g1");
    assert_eq!(text, "4k3/8/8/8/8/8/8/6K1 b - - 1 1");
}

#[test]
fn test_rook_moves_and_captures_clear_rights() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    assert_eq!(play(fen, "h1h5"), "r3k2r/8/8/7R/8/8/8/R3K3 b Qkq - 1 1");
    assert_eq!(play(fen, "a1a8"), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
    assert_eq!(play(fen, "e1e2"), "r3k2r/8/8/8/8/8/4K3/R6R b kq - 1 1");
}

#[test]
fn test_promotion_is_always_queen() {
    assert_eq!(play("8/P7/8/8/8/8/8/8 w - - 0 1", "a7a8"), "Q7/8/8/8/8/8/8/8 b - - 0 1");
    assert_eq!(play("8/P7/8/8/8/8/8/8 w - - 0 1", "a7a8q"), "Q7/8/8/8/8/8/8/8 b - - 0 1");
    assert_eq!(play("8/8/8/8/8/8/p7/8 b - - 0 1", "a2a1"), "8/8/8/8/8/8/8/q7 w - - 0 2");
    assert_eq!(play("1r6/P7/8/8/8/8/8/8 w - - 0 1", "a7b8"), "1Q6/8/8/8/8/8/8/8 b - - 0 1");
}

#[test]
fn test_en_passant_capture() {
    assert_eq!(
        play("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5d6"),
        "4k3/8/3P4/8/8/8/8/4K3 b - - 0 1"
    );
    assert_eq!(
        play("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1", "e4d3"),
        "4k3/8/8/8/8/3p4/8/4K3 w - - 0 2"
    );
}

#[test]
fn test_diagonal_pawn_move_without_en_passant_square() {
    // No en-passant square recorded: the neighbouring pawn stays.
    assert_eq!(
        play("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1", "e5d6"),
        "4k3/8/3P4/3p4/8/8/8/4K3 b - - 0 1"
    );
}

#[test]
fn test_legality_is_not_checked() {
    // A black pawn stepping backwards still lands where it is told.
    let grid = position("8/8/8/8/8/8/p7/8 w - - 0 1").grid;
    let after = apply_to_grid(&grid, Move::parse("a2a3").unwrap());
    assert_eq!(crate::codec::placement(&after), "8/8/8/8/8/p7/8/8");
}

#[test]
fn test_apply_to_grid_never_castles() {
    let grid = position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").grid;
    let after = apply_to_grid(&grid, Move::parse("e1g1").unwrap());
    assert_eq!(crate::codec::placement(&after), "r3k2r/8/8/8/8/8/8/R5KR");
}
