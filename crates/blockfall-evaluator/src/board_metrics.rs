use std::cell::OnceCell;

use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board};

/// Height difference between adjacent columns above which the pair counts
/// as a tower.
const TOWER_THRESHOLD: u8 = 3;

/// Cells that may be missing from a row for it to count as near-full.
const NEAR_FULL_MISSING: usize = 2;

/// Lazily computed measurements of one board state.
///
/// Every metric is recomputed from the stored board on first access and
/// cached; there is no incremental update across placements. The board is
/// expected to be the unswept post-placement state when used for move
/// evaluation.
#[derive(Debug)]
pub struct BoardMetrics {
    board: Board,
    column_heights: OnceCell<[u8; BOARD_WIDTH]>,
    aggregate_height: OnceCell<u32>,
    complete_lines: OnceCell<u32>,
    holes: OnceCell<u32>,
    bumpiness: OnceCell<u32>,
    wall_proximity: OnceCell<u32>,
    near_full_rows: OnceCell<u32>,
    tower_overhang: OnceCell<u32>,
    sealed_spaces: OnceCell<u32>,
}

impl BoardMetrics {
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            complete_lines: OnceCell::new(),
            holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
            wall_proximity: OnceCell::new(),
            near_full_rows: OnceCell::new(),
            tower_overhang: OnceCell::new(),
            sealed_spaces: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[u8; BOARD_WIDTH] {
        self.column_heights.get_or_init(|| self.board.column_heights())
    }

    /// Sum of all column heights.
    #[must_use]
    pub fn aggregate_height(&self) -> u32 {
        *self.aggregate_height.get_or_init(|| {
            self.column_heights().iter().copied().map(u32::from).sum()
        })
    }

    /// Number of rows with no empty cell.
    #[must_use]
    pub fn complete_lines(&self) -> u32 {
        *self.complete_lines.get_or_init(|| {
            let rows = self
                .board
                .rows()
                .filter(|row| row.iter().all(|cell| !cell.is_empty()))
                .count();
            u32::try_from(rows).unwrap()
        })
    }

    /// Number of empty cells strictly below the topmost occupied cell of
    /// their column.
    #[must_use]
    pub fn holes(&self) -> u32 {
        *self.holes.get_or_init(|| {
            let mut holes = 0;
            for (x, &height) in self.column_heights().iter().enumerate() {
                let top = BOARD_HEIGHT - usize::from(height);
                for y in top..BOARD_HEIGHT {
                    if self.board.cell(x, y).is_empty() {
                        holes += 1;
                    }
                }
            }
            holes
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|pair| {
                    let left = i32::from(pair[0]);
                    let right = i32::from(pair[1]);
                    (right - left).unsigned_abs()
                })
                .sum()
        })
    }

    /// Sum of the two edge-column heights.
    #[must_use]
    pub fn wall_proximity(&self) -> u32 {
        *self.wall_proximity.get_or_init(|| {
            let heights = self.column_heights();
            u32::from(heights[0]) + u32::from(heights[BOARD_WIDTH - 1])
        })
    }

    /// Number of rows missing at most two cells from being full, scanned
    /// bottom to top. Full rows count as well.
    #[must_use]
    pub fn near_full_rows(&self) -> u32 {
        *self.near_full_rows.get_or_init(|| {
            let mut count = 0;
            for y in (0..BOARD_HEIGHT).rev() {
                let filled = (0..BOARD_WIDTH)
                    .filter(|&x| !self.board.cell(x, y).is_empty())
                    .count();
                if filled >= BOARD_WIDTH - NEAR_FULL_MISSING {
                    count += 1;
                }
            }
            count
        })
    }

    /// Sum of adjacent-column height differences over pairs whose
    /// difference exceeds the tower threshold of 3.
    #[must_use]
    pub fn tower_overhang(&self) -> u32 {
        *self.tower_overhang.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|pair| {
                    let diff = i32::from(pair[0]).abs_diff(i32::from(pair[1]));
                    if diff > u32::from(TOWER_THRESHOLD) { diff } else { 0 }
                })
                .sum()
        })
    }

    /// Number of empty cells that have an occupied cell somewhere above
    /// them in the same column and are blocked on both sides by occupied
    /// cells or the board edge.
    #[must_use]
    pub fn sealed_spaces(&self) -> u32 {
        *self.sealed_spaces.get_or_init(|| {
            let mut sealed = 0;
            for x in 0..BOARD_WIDTH {
                for y in 0..BOARD_HEIGHT {
                    if !self.board.cell(x, y).is_empty() {
                        continue;
                    }
                    let covered = (0..y).any(|above| !self.board.cell(x, above).is_empty());
                    if !covered {
                        continue;
                    }
                    let left_blocked = x == 0 || !self.board.cell(x - 1, y).is_empty();
                    let right_blocked =
                        x == BOARD_WIDTH - 1 || !self.board.cell(x + 1, y).is_empty();
                    if left_blocked && right_blocked {
                        sealed += 1;
                    }
                }
            }
            sealed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_metrics() {
        let metrics = BoardMetrics::new(Board::new());
        assert_eq!(metrics.aggregate_height(), 0);
        assert_eq!(metrics.complete_lines(), 0);
        assert_eq!(metrics.holes(), 0);
        assert_eq!(metrics.bumpiness(), 0);
        assert_eq!(metrics.wall_proximity(), 0);
        assert_eq!(metrics.near_full_rows(), 0);
        assert_eq!(metrics.tower_overhang(), 0);
        assert_eq!(metrics.sealed_spaces(), 0);
    }

    #[test]
    fn test_aggregate_height_and_bumpiness() {
        let metrics = BoardMetrics::new(Board::from_ascii(
            r"
            #...........
            #.....#.....
            ##....#.....
            ",
        ));
        // heights: 3 1 0 0 0 0 2 0 0 0 0 0
        assert_eq!(metrics.aggregate_height(), 6);
        assert_eq!(metrics.bumpiness(), 2 + 1 + 2 + 2);
        assert_eq!(metrics.wall_proximity(), 3);
    }

    #[test]
    fn test_holes_zero_when_columns_are_solid() {
        // Occupied columns have no empty cell beneath their top.
        let metrics = BoardMetrics::new(Board::from_ascii(
            r"
            ##..........
            ##.....#....
            ##.....#....
            ",
        ));
        assert_eq!(metrics.holes(), 0);
    }

    #[test]
    fn test_holes_counted_per_column() {
        let metrics = BoardMetrics::new(Board::from_ascii(
            r"
            ###.........
            ...#........
            #..#........
            .#.#........
            ",
        ));
        // col 0: top at height 4, empty at the row below top -> 1 hole + row 3 -> 2
        // col 1: top at height 4, holes at rows 2 and 3 below it -> 2... counted below
        let holes = metrics.holes();
        assert_eq!(holes, 2 + 2 + 3);
    }

    #[test]
    fn test_complete_lines() {
        let metrics = BoardMetrics::new(Board::from_ascii(
            r"
            ############
            #####.######
            ############
            ",
        ));
        assert_eq!(metrics.complete_lines(), 2);
    }

    #[test]
    fn test_near_full_rows() {
        let metrics = BoardMetrics::new(Board::from_ascii(
            r"
            #########...
            ##########..
            ###########.
            ############
            ",
        ));
        // Rows missing 3 cells do not count; missing 2, 1, and 0 do.
        assert_eq!(metrics.near_full_rows(), 3);
    }

    #[test]
    fn test_tower_overhang_only_above_threshold() {
        let metrics = BoardMetrics::new(Board::from_ascii(
            r"
            #...........
            #...........
            #...........
            #..#........
            ##.#........
            ",
        ));
        // heights: 5 1 0 2 0 ... -> diffs 4, 1, 2, 2; only 4 > 3 counts
        assert_eq!(metrics.tower_overhang(), 4);
    }

    #[test]
    fn test_sealed_spaces() {
        let metrics = BoardMetrics::new(Board::from_ascii(
            r"
            ###.........
            #.#.........
            #.#.........
            ",
        ));
        // Column 1: covered from above by the full top row, flanked by
        // columns 0 and 2 -> both empty cells below are sealed.
        assert_eq!(metrics.sealed_spaces(), 2);
    }

    #[test]
    fn test_sealed_spaces_use_board_edge() {
        let metrics = BoardMetrics::new(Board::from_ascii(
            r"
            ##..........
            .#..........
            .#..........
            ",
        ));
        // Column 0: covered from above by the top-left cell, left side is
        // the wall, right side is column 1 -> both lower cells are sealed.
        assert_eq!(metrics.sealed_spaces(), 2);
    }
}
