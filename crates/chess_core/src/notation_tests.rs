use super::*;
use crate::uci::parse_uci_move;

fn san(fen: &str, uci: &str) -> String {
    let pos = Position::from_fen(fen).unwrap();
    let mv = parse_uci_move(&pos, uci).unwrap();
    move_to_san(&pos, mv)
}

#[test]
fn test_pawn_and_piece_moves() {
    let start = crate::types::STARTPOS_FEN;
    assert_eq!(san(start, "e2e4"), "e4");
    assert_eq!(san(start, "g1f3"), "Nf3");
}

#[test]
fn test_captures() {
    let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
    assert_eq!(san(fen, "e4d5"), "exd5");

    let ep = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1";
    assert_eq!(san(ep, "e5d6"), "exd6");

    let piece = "4k3/8/8/3p4/8/2N5/8/4K3 w - - 0 1";
    assert_eq!(san(piece, "c3d5"), "Nxd5");
}

#[test]
fn test_castling() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    assert_eq!(san(fen, "e1g1"), "O-O");
    assert_eq!(san(fen, "e1c1"), "O-O-O");
}

#[test]
fn test_promotion_with_check() {
    assert_eq!(san("7k/P7/8/8/8/8/8/K7 w - - 0 1", "a7a8q"), "a8=Q+");
    assert_eq!(san("7k/P7/8/8/8/8/8/K7 w - - 0 1", "a7a8n"), "a8=N");
}

#[test]
fn test_checkmate_suffix() {
    // Scholar's mate
    let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
    assert_eq!(san(fen, "h5f7"), "Qxf7#");
}

#[test]
fn test_disambiguation() {
    // Knights on b1 and f1 can both reach d2
    let by_file = "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1";
    assert_eq!(san(by_file, "b1d2"), "Nbd2");

    // Rooks on a1 and a5 share a file
    let by_rank = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1";
    assert_eq!(san(by_rank, "a1a3"), "R1a3");

    // Queens on a1, a3 and c1 all reach b2
    let by_square = "4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1";
    assert_eq!(san(by_square, "a1b2"), "Qa1b2");
}
