//! Weight persistence for blockfall.
//!
//! The persistence collaborator is an external key-value endpoint exposing
//! the current weight vector and its generation counter. This crate wraps
//! it behind the [`WeightStore`] trait with two implementations:
//!
//! - [`HttpWeightStore`] - talks to the real endpoint over HTTP
//! - [`MemoryWeightStore`] - in-process store for tests and offline play
//!
//! Load failures are never fatal to the game: [`WeightStore::load_or_default`]
//! falls back to the built-in default weights at generation 0.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use blockfall_evaluator::WeightVector;

pub use self::http::HttpWeightStore;

mod http;

/// A weight vector together with its generation stamp, as held by the
/// persistence endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredWeights {
    pub weights: WeightVector,
    pub generation: u64,
}

impl Default for StoredWeights {
    fn default() -> Self {
        Self {
            weights: WeightVector::DEFAULT,
            generation: 0,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("failed to connect to the weight endpoint: {_0}")]
    Connect(std::io::Error),
    #[display("i/o error while talking to the weight endpoint: {_0}")]
    Io(std::io::Error),
    #[display("weight endpoint answered with HTTP status {status}")]
    Http {
        #[error(not(source))]
        status: u16,
    },
    #[display("invalid HTTP response from the weight endpoint: {_0}")]
    Protocol(#[error(not(source))] String),
    #[display("weight endpoint rejected the save")]
    Rejected,
    #[display("malformed weight payload: {_0}")]
    Malformed(serde_json::Error),
}

/// Access to the persisted weight vector.
pub trait WeightStore {
    /// Reads the current weights and generation.
    fn load(&self) -> Result<StoredWeights, StoreError>;

    /// Writes weights and generation.
    ///
    /// A failed save is reported to the caller; the in-memory weight state
    /// is never rolled back on failure.
    fn save(&self, weights: &WeightVector, generation: u64) -> Result<(), StoreError>;

    /// Reads the current weights, falling back to the built-in defaults at
    /// generation 0 on any failure.
    ///
    /// This is the explicit fallback combinator used at startup: a missing
    /// or malformed persisted vector must never abort the game.
    fn load_or_default(&self) -> StoredWeights {
        match self.load() {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "using default weights");
                StoredWeights::default()
            }
        }
    }
}

/// In-process weight store.
///
/// Used by tests and by offline play where no endpoint is configured.
#[derive(Debug, Default)]
pub struct MemoryWeightStore {
    state: RefCell<StoredWeights>,
}

impl MemoryWeightStore {
    #[must_use]
    pub fn new(stored: StoredWeights) -> Self {
        Self {
            state: RefCell::new(stored),
        }
    }
}

impl WeightStore for MemoryWeightStore {
    fn load(&self) -> Result<StoredWeights, StoreError> {
        Ok(*self.state.borrow())
    }

    fn save(&self, weights: &WeightVector, generation: u64) -> Result<(), StoreError> {
        *self.state.borrow_mut() = StoredWeights {
            weights: *weights,
            generation,
        };
        Ok(())
    }
}
