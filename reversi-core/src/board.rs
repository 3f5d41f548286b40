//! Board geometry, cell occupancy and the text board codec

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Board edge length
pub const BOARD_SIZE: usize = 8;

/// Number of squares on the board
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Direction vectors (d_row, d_col)
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

// ============================================================================
// CELLS AND SIDES
// ============================================================================

/// Occupancy of a single square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'X',
            Cell::White => 'O',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | '-' => Some(Cell::Empty),
            'X' | 'x' | 'B' | 'b' => Some(Cell::Black),
            'O' | 'o' | 'W' | 'w' => Some(Cell::White),
            _ => None,
        }
    }
}

/// Player identity, which is also the disc color it places
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Cell value of a disc of this color
    pub fn cell(self) -> Cell {
        match self {
            Side::Black => Cell::Black,
            Side::White => Cell::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => f.write_str("black"),
            Side::White => f.write_str("white"),
        }
    }
}

// ============================================================================
// MOVES
// ============================================================================

/// Target square of a placement, indexed `row * 8 + col`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Move(u8);

impl Move {
    /// Validated constructor for indices coming from outside the crate
    pub fn new(index: usize) -> Result<Self, GameError> {
        if index < NUM_SQUARES {
            Ok(Move(index as u8))
        } else {
            Err(GameError::SquareOutOfRange(index))
        }
    }

    pub fn from_row_col(row: usize, col: usize) -> Result<Self, GameError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            let index = row.saturating_mul(BOARD_SIZE).saturating_add(col);
            return Err(GameError::SquareOutOfRange(index));
        }
        Ok(Move((row * BOARD_SIZE + col) as u8))
    }

    /// Internal constructor; an out-of-range index is a programming defect
    pub(crate) fn at(index: usize) -> Self {
        assert!(index < NUM_SQUARES, "square index {} out of range", index);
        Move(index as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn row(self) -> usize {
        self.index() / BOARD_SIZE
    }

    pub fn col(self) -> usize {
        self.index() % BOARD_SIZE
    }

    /// Neighboring square one step in direction (dr, dc), if still on the board
    pub fn step(self, dr: i8, dc: i8) -> Option<Move> {
        let r = self.row() as i8 + dr;
        let c = self.col() as i8 + dc;
        if (0..BOARD_SIZE as i8).contains(&r) && (0..BOARD_SIZE as i8).contains(&c) {
            Some(Move((r as usize * BOARD_SIZE + c as usize) as u8))
        } else {
            None
        }
    }
}

impl TryFrom<usize> for Move {
    type Error = GameError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Move::new(index)
    }
}

impl From<Move> for usize {
    fn from(mv: Move) -> usize {
        mv.index()
    }
}

impl fmt::Display for Move {
    /// Algebraic coordinate: column letter, then 1-based row
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col() as u8) as char;
        write!(f, "{}{}", file, self.row() + 1)
    }
}

// ============================================================================
// PIECE COUNT
// ============================================================================

/// Disc totals, derived from a board on demand
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCount {
    pub black: u8,
    pub white: u8,
}

impl PieceCount {
    pub fn total(&self) -> u8 {
        self.black + self.white
    }

    pub fn empty(&self) -> u8 {
        NUM_SQUARES as u8 - self.total()
    }

    pub fn of(&self, side: Side) -> u8 {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// 8x8 grid of cells (copy to mutate)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    cells: [Cell; NUM_SQUARES],
}

impl Board {
    /// Standard opening: d4/e5 white, e4/d5 black
    pub fn new() -> Self {
        let mut cells = [Cell::Empty; NUM_SQUARES];
        cells[27] = Cell::White;
        cells[28] = Cell::Black;
        cells[35] = Cell::Black;
        cells[36] = Cell::White;
        Self { cells }
    }

    pub fn from_cells(cells: [Cell; NUM_SQUARES]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; NUM_SQUARES] {
        &self.cells
    }

    pub fn get(&self, square: Move) -> Cell {
        self.cells[square.index()]
    }

    pub fn set(&mut self, square: Move, cell: Cell) {
        self.cells[square.index()] = cell;
    }

    /// Linear scan; nothing is cached
    pub fn count(&self) -> PieceCount {
        let mut count = PieceCount::default();
        for cell in &self.cells {
            match cell {
                Cell::Black => count.black += 1,
                Cell::White => count.white += 1,
                Cell::Empty => {}
            }
        }
        count
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Empty).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(BOARD_SIZE) {
            let line: String = row.iter().map(|c| c.to_char()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\n{})", self)
    }
}

impl FromStr for Board {
    type Err = GameError;

    /// Whitespace is ignored; exactly 64 cell characters are required
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Cell::Empty; NUM_SQUARES];
        let mut n = 0;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            let cell = Cell::from_char(c)
                .ok_or_else(|| GameError::InvalidBoard(format!("unexpected character '{}'", c)))?;
            if n >= NUM_SQUARES {
                return Err(GameError::InvalidBoard(format!(
                    "more than {} cells",
                    NUM_SQUARES
                )));
            }
            cells[n] = cell;
            n += 1;
        }

        if n != NUM_SQUARES {
            return Err(GameError::InvalidBoard(format!(
                "expected {} cells, found {}",
                NUM_SQUARES, n
            )));
        }

        Ok(Self { cells })
    }
}

impl TryFrom<String> for Board {
    type Error = GameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Board> for String {
    fn from(board: Board) -> String {
        board.to_string()
    }
}
