//! Game engine logic built on top of the core board and piece types.
//!
//! - [`GameSession`] - one game: board, active piece, statistics, lifecycle
//! - [`GameStats`] - score and line-clear bookkeeping
//! - [`PieceGenerator`] - uniform random piece stream, seedable

pub use self::{game_session::*, game_stats::*, piece_generator::*};

pub(crate) mod game_session;
pub(crate) mod game_stats;
pub(crate) mod piece_generator;
