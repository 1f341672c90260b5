use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A single cell of the board or of a piece matrix.
///
/// Cells either are empty or carry the kind of the piece that filled them.
/// The numeric encoding shared with the rendering layer is exposed through
/// [`Cell::color_id`]: 0 for empty, 1-7 for the seven piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Cell filled by a piece of a specific kind.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Returns the cell-value encoding shared with the rendering layer.
    #[must_use]
    pub fn color_id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.color_id(),
        }
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::S,
            3 => PieceKind::Z,
            4 => PieceKind::J,
            5 => PieceKind::L,
            _ => PieceKind::T,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in a fixed order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Returns the color id in the 1-7 encoding shared with the rendering
    /// layer.
    #[must_use]
    pub const fn color_id(self) -> u8 {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::I => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Returns the canonical spawn matrix for this piece kind.
    #[must_use]
    pub fn grid(self) -> PieceGrid {
        let c = Cell::Piece(self);
        let e = Cell::Empty;
        let rows: Vec<Vec<Cell>> = match self {
            PieceKind::I => vec![vec![c, c, c, c]],
            PieceKind::O => vec![vec![c, c], vec![c, c]],
            PieceKind::T => vec![vec![c, c, c], vec![e, c, e]],
            PieceKind::L => vec![vec![c, c, c], vec![c, e, e]],
            PieceKind::J => vec![vec![c, c, c], vec![e, e, c]],
            PieceKind::S => vec![vec![c, c, e], vec![e, c, c]],
            PieceKind::Z => vec![vec![e, c, c], vec![c, c, e]],
        };
        PieceGrid { rows }
    }
}

/// Rectangular cell matrix of a piece in a specific orientation.
///
/// The matrix is as small as the shape allows (the I-piece spawns as 1x4,
/// the O-piece as 2x2, the rest as 2x3). Rotation produces a new grid with
/// width and height swapped; rotating four times reproduces the original
/// matrix exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceGrid {
    rows: Vec<Vec<Cell>>,
}

impl PieceGrid {
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Iterates over the occupied cells of the matrix as `(dx, dy, cell)`
    /// offsets from the top-left corner.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(dx, cell)| (dx, dy, *cell))
        })
    }

    /// Returns the matrix rotated 90 degrees clockwise.
    ///
    /// Implemented as a generic transpose-then-reverse over the rectangular
    /// grid: row `j` of the result reads column `j` of the input from the
    /// bottom up.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let height = self.height();
        let width = self.width();
        let rows = (0..width)
            .map(|x| (0..height).rev().map(|y| self.rows[y][x]).collect())
            .collect();
        Self { rows }
    }

    /// Returns the four rotation states of this matrix, starting with the
    /// current orientation.
    ///
    /// All four states are returned even when some coincide (the O-piece);
    /// enumeration order is part of the move-selection tie-break contract.
    #[must_use]
    pub fn rotations(&self) -> ArrayVec<Self, 4> {
        let mut rotations = ArrayVec::new();
        rotations.push(self.clone());
        for _ in 0..3 {
            let next = rotations.last().unwrap().rotated();
            rotations.push(next);
        }
        rotations
    }
}

/// Position of a piece matrix's top-left corner in board space.
///
/// Coordinates are signed: the gravity probe used by move generation may
/// back up to row -1, which marks a placement as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// A fully resolved placement candidate: a rotated piece matrix together
/// with the column and landing row where it comes to rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    grid: PieceGrid,
    position: Position,
}

impl Placement {
    #[must_use]
    pub fn new(grid: PieceGrid, position: Position) -> Self {
        Self { grid, position }
    }

    #[must_use]
    pub fn grid(&self) -> &PieceGrid {
        &self.grid
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }
}
