use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, PieceKind, Placement, Position};

/// Enumerates every legal placement of the active piece on the board.
///
/// All four rotation states are tried in order (even when some coincide,
/// as for the O-piece), and for each rotation every column where the
/// rotated matrix fits the board width. Gravity is simulated by probing
/// downward from row 0 and backing up to the last non-colliding row; a
/// rotation/column whose probe never fits (collision already at row 0) is
/// discarded.
///
/// The output order - rotation-major, then column - is the tie-break
/// contract relied on by the move selector. No pruning or reordering
/// happens here.
#[must_use]
pub fn enumerate_placements(board: &Board, kind: PieceKind) -> Vec<Placement> {
    let mut placements = Vec::new();
    for grid in kind.grid().rotations() {
        let width = i32::try_from(grid.width()).unwrap();
        for col in 0..=(i32::try_from(BOARD_WIDTH).unwrap() - width) {
            let mut row = 0;
            while row < i32::try_from(BOARD_HEIGHT).unwrap()
                && !board.collides(&grid, Position::new(col, row))
            {
                row += 1;
            }
            row -= 1;

            if (0..i32::try_from(BOARD_HEIGHT).unwrap()).contains(&row) {
                placements.push(Placement::new(grid.clone(), Position::new(col, row)));
            }
        }
    }
    placements
}
