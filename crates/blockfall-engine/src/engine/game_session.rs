use crate::{
    SessionClosedError,
    core::{
        board::Board,
        piece::{PieceKind, Placement},
    },
};

use super::{game_stats::GameStats, piece_generator::PieceGenerator};

/// Lifecycle state of a game session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// One game session: the board, the active piece, the piece stream, and the
/// running statistics.
///
/// All mutation of game state goes through this object; there is no
/// process-wide board. A session is either in interactive play or driven by
/// the trainer, never both at once.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active_piece: PieceKind,
    generator: PieceGenerator,
    stats: GameStats,
    state: SessionState,
}

impl GameSession {
    #[must_use]
    pub fn new(mut generator: PieceGenerator) -> Self {
        let active_piece = generator.next_kind();
        Self {
            board: Board::new(),
            active_piece,
            generator,
            stats: GameStats::new(),
            state: SessionState::Playing,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> PieceKind {
        self.active_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Applies a resolved placement: locks the piece, sweeps full rows,
    /// updates statistics, and spawns the next piece.
    ///
    /// Returns the number of lines cleared by the sweep. The session flips
    /// to `GameOver` when the top row is occupied afterwards.
    pub fn apply_placement(&mut self, placement: &Placement) -> Result<usize, SessionClosedError> {
        if self.state.is_game_over() {
            return Err(SessionClosedError);
        }
        self.board.place(placement.grid(), placement.position());
        let cleared_lines = self.board.sweep();
        self.stats.complete_piece_drop(cleared_lines);
        if self.board.is_topped_out() {
            self.state = SessionState::GameOver;
        } else {
            self.active_piece = self.generator.next_kind();
        }
        Ok(cleared_lines)
    }

    /// Marks the session as over.
    ///
    /// Called by the driving loop when move selection yields no legal
    /// placement, which is the other game-over signal besides topping out.
    pub fn mark_game_over(&mut self) {
        self.state = SessionState::GameOver;
    }

    /// Resets the board and per-game statistics for a fresh game.
    ///
    /// The piece stream continues from where it was and the high score is
    /// retained.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.stats.reset_game();
        self.active_piece = self.generator.next_kind();
        self.state = SessionState::Playing;
    }
}

#[cfg(test)]
mod tests {
    use crate::core::piece::Position;

    use super::*;

    fn session_with_seed(seed: u64) -> GameSession {
        GameSession::new(PieceGenerator::from_seed(seed))
    }

    #[test]
    fn test_new_session_is_playing() {
        let session = session_with_seed(0);
        assert!(session.state().is_playing());
        assert_eq!(session.stats().completed_pieces(), 0);
    }

    #[test]
    fn test_apply_placement_updates_board_and_stats() {
        let mut session = session_with_seed(0);
        let kind = session.active_piece();
        let grid = kind.grid();
        let row = i32::try_from(crate::BOARD_HEIGHT - grid.height()).unwrap();

        let placement = Placement::new(grid, Position::new(0, row));
        let cleared = session.apply_placement(&placement).unwrap();

        assert_eq!(cleared, 0);
        assert_eq!(session.stats().completed_pieces(), 1);
        assert!(session.state().is_playing());
        assert!(!session.board().is_topped_out());
    }

    #[test]
    fn test_top_out_ends_session() {
        let mut session = session_with_seed(0);
        let grid = session.active_piece().grid();
        let placement = Placement::new(grid, Position::new(0, 0));

        session.apply_placement(&placement).unwrap();
        assert!(session.state().is_game_over());

        // Further placements are rejected.
        let grid = session.active_piece().grid();
        let placement = Placement::new(grid, Position::new(4, 0));
        assert!(session.apply_placement(&placement).is_err());
    }

    #[test]
    fn test_reset_restores_playable_state() {
        let mut session = session_with_seed(0);
        let grid = session.active_piece().grid();
        session
            .apply_placement(&Placement::new(grid, Position::new(0, 0)))
            .unwrap();
        assert!(session.state().is_game_over());

        session.reset();
        assert!(session.state().is_playing());
        assert_eq!(session.stats().score(), 0);
        assert!(!session.board().is_topped_out());
    }
}
