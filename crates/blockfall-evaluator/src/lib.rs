//! Placement evaluation for the blockfall engine.
//!
//! The crate implements the decision side of the game:
//!
//! 1. **Move generation** ([`move_gen`]) - enumerate every legal placement
//!    of the active piece.
//! 2. **Board metrics** ([`board_metrics`]) - lazily measure a candidate
//!    board (heights, lines, holes, bumpiness, ...).
//! 3. **Evaluation** ([`evaluate`]) - score a candidate as a weighted
//!    linear combination of features plus fixed heuristic adjustments.
//! 4. **Selection** ([`selector`]) - stable arg-max over all candidates.
//!
//! Scores are deterministic for a fixed board and weight vector; the
//! evaluator runs on the unswept post-placement board.

pub use self::{
    board_metrics::BoardMetrics,
    evaluate::evaluate,
    move_gen::enumerate_placements,
    selector::select_placement,
    weights::{Feature, WeightVector},
};

pub mod board_metrics;
pub mod evaluate;
pub mod move_gen;
pub mod selector;
pub mod weights;
