//! Self-play training for the blockfall placement weights.
//!
//! The trainer plays repeated games with the move selector, keeps the best
//! weight vector seen so far, and alternates between greedy multiplicative
//! nudges (after an improvement) and random exploration around the
//! incumbent (otherwise). Each completed session increments the weight
//! generation by one; persisting the result is the caller's job.

pub use self::{
    cancel::CancelToken,
    trainer::{MOVE_LIMIT, Trainer, TrainerState, TrainingReport},
};

pub mod cancel;
pub mod trainer;
