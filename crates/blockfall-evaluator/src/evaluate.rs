use crate::{
    board_metrics::BoardMetrics,
    weights::{Feature, WeightVector},
};

/// Bonus per near-full row (a row missing at most two cells).
const NEAR_FULL_ROW_BONUS: f64 = 3.0;
/// Penalty factor per tower cell (adjacent height difference beyond 3).
const TOWER_PENALTY: f64 = 2.0;
/// Penalty per sealed space (a hole walled in on both sides).
const SEALED_SPACE_PENALTY: f64 = 5.0;

/// Scores a board state; higher is better.
///
/// The score is the weighted linear combination of the five features plus
/// three heuristic adjustments that do not depend on the weight vector:
/// a near-full-line bonus, a tower penalty, and a sealed-space penalty.
///
/// The board under `metrics` must be the unswept post-placement state.
/// The computation is deterministic: a fixed board and weight vector
/// always produce the identical score.
#[must_use]
pub fn evaluate(metrics: &BoardMetrics, weights: &WeightVector) -> f64 {
    let weighted: f64 = Feature::ALL
        .into_iter()
        .map(|feature| weights.get(feature) * feature.extract(metrics))
        .sum();

    weighted + NEAR_FULL_ROW_BONUS * f64::from(metrics.near_full_rows())
        - TOWER_PENALTY * f64::from(metrics.tower_overhang())
        - SEALED_SPACE_PENALTY * f64::from(metrics.sealed_spaces())
}

#[cfg(test)]
mod tests {
    use blockfall_engine::Board;

    use super::*;

    #[test]
    fn test_empty_board_scores_zero() {
        let metrics = BoardMetrics::new(Board::new());
        let score = evaluate(&metrics, &WeightVector::DEFAULT);
        assert!((score - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let board = Board::from_ascii(
            r"
            ##..........
            ###....#....
            #######.####
            ",
        );
        let weights = WeightVector::DEFAULT;
        let first = evaluate(&BoardMetrics::new(board.clone()), &weights);
        for _ in 0..10 {
            let again = evaluate(&BoardMetrics::new(board.clone()), &weights);
            assert!(first.to_bits() == again.to_bits(), "score must be bit-stable");
        }
    }

    #[test]
    fn test_weighted_term_follows_weights() {
        let board = Board::from_ascii(
            r"
            #...........
            #...........
            ",
        );
        // aggregate height 2, no other nonzero features or adjustments on
        // this board except bumpiness 2 and wall proximity 2.
        let weights = WeightVector {
            height: 1.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 0.0,
            wall: 0.0,
        };
        let score = evaluate(&BoardMetrics::new(board.clone()), &weights);
        assert!((score - 2.0).abs() < f64::EPSILON);

        let weights = WeightVector {
            height: 0.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 1.0,
            wall: 1.0,
        };
        let score = evaluate(&BoardMetrics::new(board), &weights);
        assert!((score - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_near_full_bonus_applies_without_weights() {
        let zero = WeightVector {
            height: 0.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 0.0,
            wall: 0.0,
        };
        let board = Board::from_ascii(
            r"
            ###########.
            ",
        );
        // One near-full row; all other adjustments zero (bumpiness exists
        // but is unweighted here).
        let score = evaluate(&BoardMetrics::new(board), &zero);
        assert!((score - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sealed_space_penalty_applies_without_weights() {
        let zero = WeightVector {
            height: 0.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 0.0,
            wall: 0.0,
        };
        let board = Board::from_ascii(
            r"
            ###.........
            #.#.........
            ",
        );
        let score = evaluate(&BoardMetrics::new(board), &zero);
        assert!((score - -5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tower_penalty_applies_without_weights() {
        let zero = WeightVector {
            height: 0.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 0.0,
            wall: 0.0,
        };
        let board = Board::from_ascii(
            r"
            #...........
            #...........
            #...........
            #...........
            #...........
            ",
        );
        // heights 5 0 ... -> single tower pair with difference 5.
        let score = evaluate(&BoardMetrics::new(board), &zero);
        assert!((score - -10.0).abs() < f64::EPSILON);
    }
}
