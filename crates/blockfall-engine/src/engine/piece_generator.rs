use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64Mcg;

use crate::PieceKind;

/// Supplies the stream of upcoming pieces.
///
/// Each piece is an independent uniform draw over the 7 kinds (no bag
/// system). The generator owns its RNG so a seeded generator replays the
/// same piece sequence, which training and tests rely on.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg64Mcg,
}

impl PieceGenerator {
    /// Creates a generator seeded from the OS random source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Pcg64Mcg::from_os_rng(),
        }
    }

    /// Creates a generator with a fixed seed for deterministic piece
    /// sequences.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Draws the next piece kind.
    pub fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
