//! Triangular board representation
//!
//! The board has six rows; row `r` holds `r + 1` cells, so a cell `(row, col)`
//! exists when `col <= row`. Cells are stored row-major in a flat array.
//!
//! The same `Board` type carries both full positions and fogged views. A
//! position never contains `Cell::Unknown`; a view replaces every cell the
//! observing side cannot reach with it.

use super::moves::Move;
use super::zobrist::ZobristKeys;
use crate::error::{EngineError, Result};
use std::fmt;
use std::str::FromStr;

/// Number of rows in the triangle
pub const ROWS: usize = 6;

/// Number of cells on the board
pub const NUM_CELLS: usize = ROWS * (ROWS + 1) / 2;

const KING_OFFSETS: [(i8, i8); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
];

/// A cell coordinate, `col <= row < ROWS`
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        Coord { row, col }
    }

    /// Build a coordinate from signed components, `None` when off the board
    pub fn checked(row: i8, col: i8) -> Option<Self> {
        if row < 0 || col < 0 || row as usize >= ROWS || col > row {
            return None;
        }
        Some(Coord::new(row as u8, col as u8))
    }

    #[inline]
    pub const fn is_on_board(self) -> bool {
        (self.row as usize) < ROWS && self.col <= self.row
    }

    /// Flat index into the cell array
    #[inline]
    pub const fn index(self) -> usize {
        let row = self.row as usize;
        row * (row + 1) / 2 + self.col as usize
    }

    pub fn from_index(idx: usize) -> Self {
        let mut row = 0;
        while (row + 1) * (row + 2) / 2 <= idx {
            row += 1;
        }
        Coord::new(row as u8, (idx - row * (row + 1) / 2) as u8)
    }

    #[inline]
    pub fn offset(self, drow: i8, dcol: i8) -> Option<Self> {
        Coord::checked(self.row as i8 + drow, self.col as i8 + dcol)
    }

    /// All cells in row-major order
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..NUM_CELLS).map(Coord::from_index)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Coord {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || EngineError::ParseMove(s.to_string());
        let (row, col) = s.trim().split_once(',').ok_or_else(err)?;
        let row: i8 = row.trim().parse().map_err(|_| err())?;
        let col: i8 = col.trim().parse().map_err(|_| err())?;
        Coord::checked(row, col).ok_or_else(err)
    }
}

/// The two players. `Us` is the engine, `Them` the opponent.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Side {
    Us,
    Them,
}

impl Side {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Us => Side::Them,
            Side::Them => Side::Us,
        }
    }
}

impl std::ops::Not for Side {
    type Output = Side;
    fn not(self) -> Self::Output {
        self.opposite()
    }
}

/// Piece kind
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PieceKind {
    King,
    Knight,
}

/// A piece owned by a side
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Piece { side, kind }
    }

    /// Upper case for our pieces, lower case for theirs
    pub const fn to_char(self) -> char {
        match (self.side, self.kind) {
            (Side::Us, PieceKind::King) => 'K',
            (Side::Us, PieceKind::Knight) => 'N',
            (Side::Them, PieceKind::King) => 'k',
            (Side::Them, PieceKind::Knight) => 'n',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'K' => Some(Piece::new(Side::Us, PieceKind::King)),
            'N' => Some(Piece::new(Side::Us, PieceKind::Knight)),
            'k' => Some(Piece::new(Side::Them, PieceKind::King)),
            'n' => Some(Piece::new(Side::Them, PieceKind::Knight)),
            _ => None,
        }
    }
}

/// Content of a single cell
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Unknown,
    Piece(Piece),
}

impl Cell {
    pub const fn king(side: Side) -> Self {
        Cell::Piece(Piece::new(side, PieceKind::King))
    }

    pub const fn knight(side: Side) -> Self {
        Cell::Piece(Piece::new(side, PieceKind::Knight))
    }

    /// Index used for Zobrist keys (0-5)
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::Unknown => 1,
            Cell::Piece(p) => {
                2 + (p.side as usize) * 2 + match p.kind {
                    PieceKind::King => 0,
                    PieceKind::Knight => 1,
                }
            }
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Unknown => '#',
            Cell::Piece(p) => p.to_char(),
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Unknown),
            _ => Piece::from_char(c).map(Cell::Piece),
        }
    }
}

/// A full position or a fogged view
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Board {
    cells: [Cell; NUM_CELLS],
}

impl Board {
    /// Board with every cell empty
    pub const fn empty() -> Self {
        Board { cells: [Cell::Empty; NUM_CELLS] }
    }

    /// Board with every cell fogged
    pub const fn blind() -> Self {
        Board { cells: [Cell::Unknown; NUM_CELLS] }
    }

    /// The standard starting position
    pub fn start() -> Self {
        let mut board = Board::empty();
        board.set(Coord::new(1, 0), Cell::knight(Side::Them));
        board.set(Coord::new(1, 1), Cell::king(Side::Them));
        board.set(Coord::new(3, 0), Cell::knight(Side::Them));
        board.set(Coord::new(4, 4), Cell::king(Side::Us));
        board.set(Coord::new(5, 2), Cell::knight(Side::Us));
        board.set(Coord::new(5, 4), Cell::knight(Side::Us));
        board
    }

    #[inline]
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.index()]
    }

    #[inline]
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        self.cells[coord.index()] = cell;
    }

    /// Coordinates holding `cell`, in row-major order
    pub fn find_pieces(&self, cell: Cell) -> Vec<Coord> {
        Coord::all().filter(|&c| self.get(c) == cell).collect()
    }

    #[inline]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    #[inline]
    pub fn has_king(&self, side: Side) -> bool {
        self.cells.contains(&Cell::king(side))
    }

    #[inline]
    pub fn knights(&self, side: Side) -> usize {
        self.count(Cell::knight(side))
    }

    /// Number of fogged cells
    #[inline]
    pub fn unknown_count(&self) -> usize {
        self.count(Cell::Unknown)
    }

    /// Whether `side` may play `mv` here.
    ///
    /// The target must be a known empty cell; no piece is ever captured. On a
    /// fogged view an `Unknown` target is refused, so moves listed from a view
    /// are exactly the moves legal in every position behind it.
    pub fn is_valid_move(&self, mv: Move, side: Side) -> bool {
        if !mv.from.is_on_board() || !mv.to.is_on_board() {
            return false;
        }
        let piece = match self.get(mv.from) {
            Cell::Piece(p) if p.side == side => p,
            _ => return false,
        };
        if self.get(mv.to) != Cell::Empty {
            return false;
        }
        let (drow, dcol) = mv.delta();
        match piece.kind {
            PieceKind::Knight => (drow == 2 && dcol == 1) || (drow == 1 && dcol == 2),
            PieceKind::King => drow <= 1 && dcol <= 1 && mv.from != mv.to,
        }
    }

    /// Legal moves for `side`: king moves first, then knight moves
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();

        if let Some(&king) = self.find_pieces(Cell::king(side)).first() {
            for &(drow, dcol) in KING_OFFSETS.iter() {
                if let Some(to) = king.offset(drow, dcol) {
                    let mv = Move::new(king, to);
                    if self.is_valid_move(mv, side) {
                        moves.push(mv);
                    }
                }
            }
        }

        for knight in self.find_pieces(Cell::knight(side)) {
            for &(drow, dcol) in KNIGHT_OFFSETS.iter() {
                if let Some(to) = knight.offset(drow, dcol) {
                    let mv = Move::new(knight, to);
                    if self.is_valid_move(mv, side) {
                        moves.push(mv);
                    }
                }
            }
        }

        moves
    }

    /// Play `mv` for `side`, returning the new board
    pub fn apply_move(&self, mv: Move, side: Side) -> Result<Board> {
        if !self.is_valid_move(mv, side) {
            return Err(EngineError::InvalidMove { mv, side });
        }
        let mut next = *self;
        next.set(mv.to, self.get(mv.from));
        next.set(mv.from, Cell::Empty);
        Ok(next)
    }

    /// What `side` sees: the origin and target of each of its legal moves
    pub fn view(&self, side: Side) -> Board {
        let mut view = Board::blind();
        for mv in self.legal_moves(side) {
            view.set(mv.from, self.get(mv.from));
            view.set(mv.to, self.get(mv.to));
        }
        view
    }

    /// Same board with the roles of the two sides exchanged
    pub fn swap_sides(&self) -> Board {
        let mut swapped = *self;
        for cell in swapped.cells.iter_mut() {
            if let Cell::Piece(p) = cell {
                p.side = !p.side;
            }
        }
        swapped
    }

    /// Zobrist hash of the cell contents
    pub fn zobrist(&self) -> u64 {
        let keys = ZobristKeys::instance();
        self.cells
            .iter()
            .enumerate()
            .fold(0, |h, (idx, &cell)| h ^ keys.cell(idx, cell))
    }

    /// Triangle drawing for terminal output
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&"-".repeat(5));
        out.push('\n');
        for row in 0..ROWS {
            let line = (0..=row)
                .map(|col| match self.get(Coord::new(row as u8, col as u8)) {
                    Cell::Empty => ' ',
                    cell => cell.to_char(),
                })
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" | ");
            out.push_str(&format!("| {} |\n", line));
            let pad = if row + 1 < ROWS { 8 } else { 4 };
            out.push_str(&"-".repeat(line.len() + pad));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            if row > 0 {
                write!(f, "/")?;
            }
            for col in 0..=row {
                write!(f, "{}", self.get(Coord::new(row as u8, col as u8)).to_char())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self)
    }
}

impl FromStr for Board {
    type Err = EngineError;

    /// Parse the compact notation: rows separated by `/`, `.` for empty,
    /// `#` for unknown, `KNkn` for pieces.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let rows: Vec<&str> = s.trim().split('/').collect();
        if rows.len() != ROWS {
            return Err(EngineError::ParseBoard(format!(
                "expected {} rows, got {}",
                ROWS,
                rows.len()
            )));
        }

        let mut board = Board::empty();
        for (row, text) in rows.iter().enumerate() {
            let chars: Vec<char> = text.chars().collect();
            if chars.len() != row + 1 {
                return Err(EngineError::ParseBoard(format!(
                    "row {} must have {} cells: {:?}",
                    row,
                    row + 1,
                    text
                )));
            }
            for (col, &c) in chars.iter().enumerate() {
                let cell = Cell::from_char(c).ok_or_else(|| {
                    EngineError::ParseBoard(format!("bad cell {:?} in row {}", c, row))
                })?;
                board.set(Coord::new(row as u8, col as u8), cell);
            }
        }

        for side in [Side::Us, Side::Them] {
            if board.count(Cell::king(side)) > 1 {
                return Err(EngineError::ParseBoard(format!("more than one {:?} king", side)));
            }
        }

        Ok(board)
    }
}
