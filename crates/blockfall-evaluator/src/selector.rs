use blockfall_engine::{Board, PieceKind, Placement};

use crate::{
    board_metrics::BoardMetrics, evaluate::evaluate, move_gen::enumerate_placements,
    weights::WeightVector,
};

/// Selects the best placement for the active piece, or `None` when no
/// legal placement exists (the game-over signal for the caller).
///
/// Every candidate board is the clone of the input with the piece placed
/// but *not* swept; scores come from [`evaluate`]. The arg-max is stable:
/// on ties the first placement in rotation-then-column enumeration order
/// wins, and no randomness is involved.
#[must_use]
pub fn select_placement(
    board: &Board,
    kind: PieceKind,
    weights: &WeightVector,
) -> Option<Placement> {
    let mut best_score = f64::NEG_INFINITY;
    let mut best_placement = None;

    for placement in enumerate_placements(board, kind) {
        let mut candidate = board.clone();
        candidate.place(placement.grid(), placement.position());
        let metrics = BoardMetrics::new(candidate);
        let score = evaluate(&metrics, weights);
        if score > best_score {
            best_score = score;
            best_placement = Some(placement);
        }
    }

    best_placement
}
