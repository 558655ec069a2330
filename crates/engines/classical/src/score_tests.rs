use super::*;

#[test]
fn test_mate_shift_only_touches_mate_scores() {
    assert_eq!(mate_shift(MAX_SCORE), MAX_SCORE - 1);
    assert_eq!(mate_shift(-MAX_SCORE), -MAX_SCORE + 1);
    assert_eq!(mate_shift(WHITE_WIN_THRESHOLD), WHITE_WIN_THRESHOLD);
    assert_eq!(mate_shift(BLACK_WIN_THRESHOLD), BLACK_WIN_THRESHOLD);
    assert_eq!(mate_shift(350), 350);
}

#[test]
fn test_side_helpers() {
    assert_eq!(mated_score(Color::White), -MAX_SCORE);
    assert_eq!(mated_score(Color::Black), MAX_SCORE);
    assert!(improves(Color::White, 10, 5));
    assert!(improves(Color::Black, 5, 10));
    assert!(!improves(Color::White, 5, 5));
}

#[test]
fn test_mate_in_moves() {
    // Mate on the next ply
    assert_eq!(mate_in_moves(MAX_SCORE), Some(1));
    // Mate three plies away (two White moves)
    assert_eq!(mate_in_moves(MAX_SCORE - 2), Some(2));
    assert_eq!(mate_in_moves(-(MAX_SCORE - 1)), Some(-1));
    assert_eq!(mate_in_moves(900), None);
}
