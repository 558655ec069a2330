use super::*;

fn mv(text: &str) -> Move {
    text.parse().unwrap()
}

#[test]
fn test_mvv_lva_table() {
    assert_eq!(mvv_lva(Piece::Pawn, Piece::Queen), 55);
    assert_eq!(mvv_lva(Piece::Queen, Piece::Pawn), 11);
    assert_eq!(mvv_lva(Piece::King, Piece::Pawn), 10);
    assert_eq!(mvv_lva(Piece::Pawn, Piece::Pawn), 15);
    assert!(mvv_lva(Piece::Knight, Piece::Rook) > mvv_lva(Piece::Rook, Piece::Rook));
}

#[test]
fn test_captures_sorted_before_quiet_moves() {
    // Pawn and knight can both take the queen on d5, the rook can take a8
    let pos = Position::from_fen("r3k3/8/8/3q4/4P3/2N5/8/R3K3 w Q - 0 1").unwrap();
    let mut moves = pos.legal_moves();
    order_moves(&pos, &mut moves, None);

    assert_eq!(moves[0], mv("e4d5"));
    assert_eq!(moves[1], mv("c3d5"));
    assert_eq!(moves[2], mv("a1a8"));

    let scores: Vec<i32> = moves.iter().map(|&m| move_score(&pos, m)).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_castling_gets_bonus() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    let castle = mv("e1h1");
    assert_eq!(move_score(&pos, castle), CASTLE_BONUS);

    let mut moves = pos.legal_moves();
    order_moves(&pos, &mut moves, None);
    assert_eq!(moves[0], castle);
}

#[test]
fn test_en_passant_is_pawn_capture() {
    let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    assert_eq!(move_score(&pos, mv("e5d6")), mvv_lva(Piece::Pawn, Piece::Pawn));
}

#[test]
fn test_hash_move_goes_first_and_order_is_stable() {
    let pos = Position::startpos();
    let generated = pos.legal_moves();

    let mut plain = generated.clone();
    order_moves(&pos, &mut plain, None);
    // No captures in the start position: generation order is kept
    assert_eq!(plain, generated);

    let hash = mv("g1f3");
    let mut with_hash = generated.clone();
    order_moves(&pos, &mut with_hash, Some(hash));
    assert_eq!(with_hash[0], hash);

    let rest: Vec<Move> = generated.iter().copied().filter(|&m| m != hash).collect();
    assert_eq!(&with_hash[1..], &rest[..]);
}

#[test]
fn test_unknown_hash_move_is_ignored() {
    let pos = Position::startpos();
    let mut moves = pos.legal_moves();
    let before = moves.clone();
    order_moves(&pos, &mut moves, Some(mv("e7e5")));
    assert_eq!(moves, before);
}
