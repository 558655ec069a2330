//! Legal move tree node counts, used to validate the rules layer and the
//! incremental make/unmake path.

use crate::position::Position;
use crate::types::Move;

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    fn inner(pos: &mut Position, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
        let Some((buf, rest)) = layers.split_first_mut() else {
            return 1;
        };

        pos.legal_moves_into(buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in buf.iter().copied() {
            pos.make_move(mv);
            nodes += inner(pos, depth - 1, rest);
            pos.unmake_move();
        }
        nodes
    }

    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(pos, depth, &mut layers[..])
}

/// Per-root-move node counts, sorted by UCI text.
pub fn divide(pos: &mut Position, depth: u8) -> Vec<(String, u64)> {
    let moves = pos.legal_moves();
    let mut out: Vec<(String, u64)> = moves
        .into_iter()
        .map(|mv| {
            let text = crate::uci::move_to_uci(pos.board(), mv);
            pos.make_move(mv);
            let nodes = perft(pos, depth.saturating_sub(1));
            pos.unmake_move();
            (text, nodes)
        })
        .collect();
    out.sort();
    out
}
