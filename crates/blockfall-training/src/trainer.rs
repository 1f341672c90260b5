use rand::Rng;
use rand_distr::{Distribution as _, Uniform};
use serde::Serialize;

use blockfall_engine::{GameSession, PieceGenerator};
use blockfall_evaluator::{Feature, WeightVector, select_placement};

use crate::cancel::CancelToken;

/// Maximum number of placements per self-play game.
pub const MOVE_LIMIT: usize = 1000;

/// Training score per cleared line.
const LINE_SCORE: u64 = 100;

/// Fixed multiplicative nudge applied after a new session best.
/// The wall weight is deliberately left untouched.
const LINES_NUDGE: f64 = 1.1;
const HEIGHT_NUDGE: f64 = 0.95;
const HOLES_NUDGE: f64 = 0.9;
const BUMPINESS_NUDGE: f64 = 0.95;

/// Half-width of the relative perturbation applied when a game did not
/// improve on the session best: every weight is scaled by `1 + u` with
/// `u` uniform in `[-0.05, 0.05]`.
const PERTURBATION: f64 = 0.05;

/// Lifecycle of one training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TrainerState {
    Idle,
    Running(usize),
    Done,
}

/// Result of one completed training session.
///
/// The caller is responsible for handing `(weights, generation)` to the
/// persistence collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub weights: WeightVector,
    pub generation: u64,
    pub best_score: u64,
    pub total_score: u64,
    pub games_played: usize,
    pub aborted: bool,
}

#[derive(Debug, Clone, Copy)]
struct GameOutcome {
    score: u64,
    cleared_lines: usize,
    moves: usize,
}

/// Hill-climbing weight trainer.
///
/// Runs a fixed number of self-play games. A game that strictly beats the
/// session best records the current weights as the new incumbent and takes
/// a fixed multiplicative step in the direction that just worked; any other
/// game reverts to the incumbent and explores around it with an
/// independent random perturbation of up to +/-5% per weight.
///
/// This is single-chain hill climbing with stochastic restarts around the
/// incumbent. It has no convergence criterion and can plateau; that
/// behavior is part of the contract and must not be "fixed" here.
#[derive(Debug)]
pub struct Trainer {
    weights: WeightVector,
    generation: u64,
    games: usize,
    move_limit: usize,
    state: TrainerState,
}

impl Trainer {
    #[must_use]
    pub fn new(weights: WeightVector, generation: u64, games: usize) -> Self {
        Self {
            weights,
            generation,
            games,
            move_limit: MOVE_LIMIT,
            state: TrainerState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> TrainerState {
        self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs the training session to completion (or until cancelled between
    /// games) and returns the report for the persistence collaborator.
    ///
    /// The session always adopts the best-known weights and increments the
    /// generation counter exactly once, even when aborted early.
    pub fn run<R>(&mut self, rng: &mut R, cancel: &CancelToken) -> TrainingReport
    where
        R: Rng + ?Sized,
    {
        let mut best_weights = self.weights;
        let mut best_score = 0u64;
        let mut total_score = 0u64;
        let mut games_played = 0usize;
        let mut aborted = false;

        tracing::info!(games = self.games, weights = ?self.weights, "training session started");

        for game in 0..self.games {
            if cancel.is_cancelled() {
                aborted = true;
                tracing::info!(game, "training session cancelled");
                break;
            }
            self.state = TrainerState::Running(game);

            let outcome = self.play_game(rng);
            if outcome.score > best_score {
                best_score = outcome.score;
                best_weights = self.weights;
                self.nudge_weights();
            } else {
                self.weights = best_weights;
                self.perturb_weights(rng);
            }
            total_score += outcome.score;
            games_played += 1;

            tracing::debug!(
                game,
                score = outcome.score,
                cleared_lines = outcome.cleared_lines,
                moves = outcome.moves,
                best_score,
                "training game finished",
            );
        }

        self.weights = best_weights;
        self.generation += 1;
        self.state = TrainerState::Done;

        tracing::info!(
            games_played,
            best_score,
            generation = self.generation,
            aborted,
            "training session finished",
        );

        TrainingReport {
            weights: self.weights,
            generation: self.generation,
            best_score,
            total_score,
            games_played,
            aborted,
        }
    }

    /// Plays one self-play game with the current weights.
    ///
    /// The game ends on top-out, when no legal placement exists, or at the
    /// move ceiling. Training score is 100 per cleared line, independent of
    /// the interactive sweep scoring.
    fn play_game<R>(&self, rng: &mut R) -> GameOutcome
    where
        R: Rng + ?Sized,
    {
        let mut session = GameSession::new(PieceGenerator::from_seed(rng.random()));
        let mut score = 0u64;
        let mut cleared_lines = 0usize;
        let mut moves = 0usize;

        while moves < self.move_limit && session.state().is_playing() {
            let Some(placement) =
                select_placement(session.board(), session.active_piece(), &self.weights)
            else {
                session.mark_game_over();
                break;
            };
            let cleared = session
                .apply_placement(&placement)
                .expect("session state checked in loop condition");
            score += LINE_SCORE * u64::try_from(cleared).unwrap();
            cleared_lines += cleared;
            moves += 1;
        }

        GameOutcome {
            score,
            cleared_lines,
            moves,
        }
    }

    /// Greedy ascent step in the direction that just produced a new best.
    fn nudge_weights(&mut self) {
        self.weights.lines *= LINES_NUDGE;
        self.weights.height *= HEIGHT_NUDGE;
        self.weights.holes *= HOLES_NUDGE;
        self.weights.bumpiness *= BUMPINESS_NUDGE;
    }

    /// Independent random scaling of every weight by up to +/-5%.
    fn perturb_weights<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let jitter = Uniform::new_inclusive(-PERTURBATION, PERTURBATION).unwrap();
        for feature in Feature::ALL {
            *self.weights.get_mut(feature) *= 1.0 + jitter.sample(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn test_training_increments_generation_once() {
        let mut trainer = Trainer::new(WeightVector::DEFAULT, 5, 3);
        let mut rng = Pcg64Mcg::seed_from_u64(1);

        let report = trainer.run(&mut rng, &CancelToken::new());

        assert_eq!(report.generation, 6);
        assert_eq!(trainer.generation(), 6);
        assert_eq!(report.games_played, 3);
        assert!(!report.aborted);
        assert!(trainer.state().is_done());
    }

    #[test]
    fn test_training_is_deterministic_for_fixed_seed() {
        let run = |seed: u64| {
            let mut trainer = Trainer::new(WeightVector::DEFAULT, 0, 2);
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            trainer.run(&mut rng, &CancelToken::new())
        };

        let a = run(99);
        let b = run(99);
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.best_score, b.best_score);
        assert_eq!(a.total_score, b.total_score);
    }

    #[test]
    fn test_cancelled_session_still_reports() {
        let mut trainer = Trainer::new(WeightVector::DEFAULT, 0, 50);
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let cancel = CancelToken::new();
        cancel.cancel();

        let report = trainer.run(&mut rng, &cancel);

        assert!(report.aborted);
        assert_eq!(report.games_played, 0);
        assert_eq!(report.generation, 1);
        assert_eq!(report.weights, WeightVector::DEFAULT);
    }

    #[test]
    fn test_nudge_leaves_wall_weight_untouched() {
        let mut trainer = Trainer::new(WeightVector::DEFAULT, 0, 0);
        trainer.nudge_weights();

        let nudged = trainer.weights;
        let default = WeightVector::DEFAULT;
        assert!((nudged.lines - default.lines * 1.1).abs() < 1e-12);
        assert!((nudged.height - default.height * 0.95).abs() < 1e-12);
        assert!((nudged.holes - default.holes * 0.9).abs() < 1e-12);
        assert!((nudged.bumpiness - default.bumpiness * 0.95).abs() < 1e-12);
        assert!((nudged.wall - default.wall).abs() < f64::EPSILON);
    }

    #[test]
    fn test_perturbation_stays_within_five_percent() {
        let mut trainer = Trainer::new(WeightVector::DEFAULT, 0, 0);
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let before = trainer.weights;
        trainer.perturb_weights(&mut rng);

        for feature in Feature::ALL {
            let old = before.get(feature);
            let new = trainer.weights.get(feature);
            let ratio = new / old;
            assert!(
                (0.95..=1.05).contains(&ratio),
                "{feature:?} perturbed by {ratio}",
            );
        }
    }

    #[test]
    fn test_short_session_terminates_and_scores_lines() {
        // A tiny session must terminate well inside the move ceiling and
        // produce non-negative scores in multiples of 100.
        let mut trainer = Trainer::new(WeightVector::DEFAULT, 0, 1);
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        let report = trainer.run(&mut rng, &CancelToken::new());

        assert_eq!(report.games_played, 1);
        assert_eq!(report.total_score % 100, 0);
    }
}
