use super::*;
use crate::codec::STARTPOS;
use crate::grid::Label;

fn adapter() -> OracleAdapter {
    OracleAdapter::standard()
}

fn text(s: &str) -> PositionText {
    PositionText::from(s)
}

fn mv(s: &str) -> Move {
    Move::parse(s).unwrap()
}

fn move_strings(set: &CandidateSet) -> Vec<String> {
    set.moves().map(|m| m.to_string()).collect()
}

#[test]
fn test_startpos_candidates() {
    let set = adapter().enumerate(&text(STARTPOS)).unwrap();
    assert_eq!(set.len(), 20);
    assert!(set.iter().all(|c| c.position.side_to_move == chess_core::Color::Black));
    let e4 = set.iter().find(|c| c.mv == mv("e2e4")).unwrap();
    assert_eq!(e4.position.grid.get(Square::from_algebraic("e4").unwrap()), Label::WhitePawn);
}

#[test]
fn test_black_candidates_are_mapped_back() {
    let set = adapter()
        .enumerate(&text("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"))
        .unwrap();
    assert_eq!(set.len(), 20);
    let moves = move_strings(&set);
    assert!(moves.contains(&"e7e5".to_string()));
    assert!(moves.contains(&"g8f6".to_string()));
    assert!(!moves.contains(&"e2e4".to_string()));

    let reply = set.iter().find(|c| c.mv == mv("e7e5")).unwrap();
    assert_eq!(
        reply.position.to_text().as_str(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
    );
}

#[test]
fn test_find_by_grid() {
    let start = Position::startpos();
    let set = adapter().enumerate_position(&start).unwrap();
    let target = crate::apply::apply(&start, mv("b1c3")).grid;
    assert_eq!(set.find(&target).map(|c| c.mv), Some(mv("b1c3")));
    assert!(set.find(&start.grid).is_none());
}

#[test]
fn test_lone_kings_legality() {
    let a = adapter();
    let fen = text("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1");
    assert!(a.is_legal(&fen, mv("e1d1")).unwrap());
    assert!(!a.is_legal(&fen, mv("d1e4")).unwrap());

    let fen = text("4k3/8/8/8/8/8/8/4K3 b KQkq - 0 1");
    assert!(a.is_legal(&fen, mv("e8f7")).unwrap());
    assert!(!a.is_legal(&fen, mv("e8g8")).unwrap());

    let fen = text("3K4/8/8/8/8/8/8/3k4 b KQkq - 0 1");
    assert!(a.is_legal(&fen, mv("d1e1")).unwrap());
    assert!(!a.is_legal(&fen, mv("d1e4")).unwrap());

    let fen = text("3K4/8/8/8/8/8/8/3k4 w KQkq - 0 1");
    assert!(a.is_legal(&fen, mv("d8c7")).unwrap());
    assert!(!a.is_legal(&fen, mv("d8h8")).unwrap());
}

#[test]
fn test_reversed_orientation_is_accepted() {
    let a = adapter();
    let start = text(STARTPOS);
    assert_eq!(a.legal_orientation(&start, mv("e4e2")).unwrap(), Some(mv("e2e4")));
    assert_eq!(a.legal_orientation(&start, mv("e2e4")).unwrap(), Some(mv("e2e4")));
    assert_eq!(a.legal_orientation(&start, mv("e2e5")).unwrap(), None);
    assert!(a.is_legal(&start, mv("f3g1")).unwrap());
}

#[test]
fn test_pieces_without_black_king() {
    // Rook a8 has b8/c8, the king five squares, the pawn is blocked.
    let set = adapter().enumerate(&text("R2K4/P7/8/8/8/8/8/8 w KQkq - 0 1")).unwrap();
    assert_eq!(set.len(), 7);
}

#[test]
fn test_promotions_collapse_to_queen() {
    let set = adapter().enumerate(&text("8/P7/8/8/8/8/8/k6K w - - 0 1")).unwrap();
    assert_eq!(set.len(), 4);
    let promo = set.iter().find(|c| c.mv.same_squares(mv("a7a8"))).unwrap();
    assert!(promo.mv.promotion);
    assert_eq!(promo.position.grid.get(Square::from_algebraic("a8").unwrap()), Label::WhiteQueen);

    let set = adapter().enumerate(&text("k6K/8/8/8/8/8/p7/8 b - - 0 1")).unwrap();
    assert_eq!(set.len(), 4);
    let promo = set.iter().find(|c| c.mv.same_squares(mv("a2a1"))).unwrap();
    assert!(promo.mv.promotion);
    assert_eq!(promo.position.grid.get(Square::from_algebraic("a1").unwrap()), Label::BlackQueen);
}

#[test]
fn test_black_castling_and_en_passant_through_reframing() {
    let set = adapter().enumerate(&text("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1")).unwrap();
    let short = set.iter().find(|c| c.mv == mv("e8g8")).unwrap();
    assert_eq!(short.position.to_text().as_str(), "r4rk1/8/8/8/8/8/8/4K3 w - - 1 2");
    assert!(set.iter().any(|c| c.mv == mv("e8c8")));

    let set = adapter().enumerate(&text("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1")).unwrap();
    let ep = set.iter().find(|c| c.mv == mv("e4d3")).unwrap();
    assert_eq!(ep.position.to_text().as_str(), "4k3/8/8/8/8/3p4/8/4K3 w - - 0 2");
}

#[test]
fn test_terminal_positions_have_no_candidates() {
    let mate = text("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert!(adapter().enumerate(&mate).unwrap().is_empty());

    let stalemate = text("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1");
    assert!(adapter().enumerate(&stalemate).unwrap().is_empty());
}

#[test]
fn test_malformed_text_is_rejected() {
    assert!(matches!(
        adapter().enumerate(&text("8/8/8 w - - 0 1")),
        Err(crate::EngineError::Format(_))
    ));
}

struct Fixed(Vec<Move>);

impl RulesOracle for Fixed {
    fn legal_moves(&self, _text: &PositionText) -> Result<Vec<Move>> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_custom_oracle_sees_white_frame() {
    let oracle = Fixed(vec![mv("e2e4")]);
    assert!(oracle.is_legal(&text(STARTPOS), mv("e2e4")).unwrap());
    assert!(!oracle.is_legal(&text(STARTPOS), mv("e4e2")).unwrap());

    let adapter = OracleAdapter::new(oracle);
    let black = text("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    let set = adapter.enumerate(&black).unwrap();
    assert_eq!(move_strings(&set), vec!["e7e5"]);
}
