use std::fmt;

use super::piece::{Piece, PieceColor, PieceKind};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell locked by a piece of the given kind and color.
    Fixed { kind: PieceKind, color: PieceColor },
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }
}

/// Fixed-size occupancy grid the pieces fall into.
///
/// The grid always holds exactly `height` rows of `width` cells. It only changes
/// through [`Board::fix`], which locks a piece's cells, and [`Board::clear_lines`],
/// which removes complete rows and refills the top with empty ones.
///
/// Cells above the top row (`y < 0`) are not part of the grid. Pieces are allowed
/// to overlap that region while they move; it counts as empty.
///
/// # Example
///
/// ```
/// use polyfall_engine::{Board, PieceFactory, PieceFamily, PieceKind};
///
/// let mut board = Board::new(10, 20);
/// let factory = PieceFactory::new(&PieceFamily::TETROMINO);
/// let piece = factory.create(PieceKind::I).unwrap().moved_by(0, 19);
///
/// assert!(board.can_place(&piece));
/// board.fix(&piece);
/// assert!(!board.can_place(&piece));
/// assert_eq!(board.clear_lines(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Block>>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or does not fit in an `i32`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must not be empty");
        assert!(
            i32::try_from(width).is_ok() && i32::try_from(height).is_ok(),
            "board is too large"
        );
        Self {
            width,
            height,
            rows: vec![vec![Block::Empty; width]; height],
        }
    }

    /// Builds a board from text rows, top row first.
    ///
    /// `.` is an empty cell; any other character is a fixed cell whose kind is
    /// that character. Rows must all have the same length.
    ///
    /// # Panics
    ///
    /// Panics if the rows are empty or ragged.
    ///
    /// # Example
    ///
    /// ```
    /// use polyfall_engine::Board;
    ///
    /// let board = Board::from_rows(&["....", "##.#"]);
    /// assert_eq!((board.width(), board.height()), (4, 2));
    /// assert!(board.block_at(2, 1).is_some_and(|b| b.is_empty()));
    /// assert!(board.block_at(3, 1).is_some_and(|b| !b.is_empty()));
    /// ```
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut board = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.chars().count(), width, "row {y} has the wrong width");
            for (x, c) in row.chars().enumerate() {
                if c != '.' {
                    board.rows[y][x] = Block::Fixed {
                        kind: PieceKind::from_char(c),
                        color: PieceColor::Brown,
                    };
                }
            }
        }
        board
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns the block at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn block_at(&self, x: usize, y: usize) -> Option<Block> {
        self.rows.get(y)?.get(x).copied()
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn fill_block_at(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y][x] = block;
    }

    /// Returns `true` if every cell of `piece` is inside the walls, above the
    /// floor, and either above the top row or on an empty cell.
    #[must_use]
    pub fn can_place(&self, piece: &Piece) -> bool {
        piece.positions().all(|(x, y)| {
            let Some(col) = self.column(x) else {
                return false;
            };
            if y < 0 {
                return true;
            }
            usize::try_from(y)
                .ok()
                .and_then(|row| self.block_at(col, row))
                .is_some_and(Block::is_empty)
        })
    }

    /// Same rule as [`Self::can_place`], checked when a new piece enters play.
    #[must_use]
    pub fn can_spawn(&self, piece: &Piece) -> bool {
        self.can_place(piece)
    }

    /// Locks the piece's cells into the grid.
    ///
    /// Cells outside the grid, including those above the top row, are skipped.
    pub fn fix(&mut self, piece: &Piece) {
        let block = Block::Fixed {
            kind: piece.kind(),
            color: piece.color(),
        };
        for (x, y) in piece.positions() {
            let (Some(col), Ok(row)) = (self.column(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = block;
            }
        }
    }

    /// Removes every complete row and returns how many were removed.
    ///
    /// Rows above a removed row shift down; the same number of empty rows is
    /// inserted at the top, so the row count never changes.
    pub fn clear_lines(&mut self) -> usize {
        self.rows
            .retain(|row| row.iter().any(|block| block.is_empty()));
        let cleared = self.height - self.rows.len();
        if cleared > 0 {
            let empty = (0..cleared).map(|_| vec![Block::Empty; self.width]);
            self.rows.splice(0..0, empty);
        }
        cleared
    }

    fn column(&self, x: i32) -> Option<usize> {
        usize::try_from(x).ok().filter(|&col| col < self.width)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for block in row {
                match block {
                    Block::Empty => f.write_str(".")?,
                    Block::Fixed { kind, .. } => write!(f, "{kind}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::{PiecePosition, RotationCenter};

    fn piece_at(shape: &[(i32, i32)], x: i32, y: i32) -> Piece {
        Piece::new(
            PieceKind::T,
            shape,
            PieceColor::Purple,
            RotationCenter::cell(1, 1),
            PiecePosition::new(x, y),
        )
    }

    fn i_piece(x: i32, y: i32) -> Piece {
        piece_at(&[(0, 0), (1, 0), (2, 0), (3, 0)], x, y)
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20);
        assert_eq!(board.rows().count(), 20);
        for row in board.rows() {
            assert_eq!(row.len(), 10);
            assert!(row.iter().all(|b| b.is_empty()));
        }
    }

    #[test]
    fn test_can_place_respects_walls_and_floor() {
        let board = Board::new(10, 20);
        assert!(board.can_place(&i_piece(0, 0)));
        assert!(board.can_place(&i_piece(6, 19)));
        assert!(!board.can_place(&i_piece(-1, 0)), "left wall");
        assert!(!board.can_place(&i_piece(7, 0)), "right wall");
        assert!(!board.can_place(&i_piece(0, 20)), "floor");
    }

    #[test]
    fn test_can_place_allows_cells_above_top() {
        let board = Board::new(10, 20);
        let vertical = piece_at(&[(0, -2), (0, -1), (0, 0), (0, 1)], 3, 0);
        assert!(board.can_place(&vertical));
        assert!(board.can_place(&i_piece(2, -5)));
        // Walls still apply above the top.
        assert!(!board.can_place(&i_piece(-1, -5)));
        assert!(!board.can_place(&i_piece(8, -5)));
    }

    #[test]
    fn test_can_place_rejects_occupied_cells() {
        let mut board = Board::new(10, 20);
        board.fill_block_at(
            5,
            10,
            Block::Fixed {
                kind: PieceKind::O,
                color: PieceColor::Yellow,
            },
        );
        assert!(!board.can_place(&i_piece(2, 10)));
        assert!(board.can_place(&i_piece(6, 10)));
        assert!(board.can_place(&i_piece(2, 9)));
        assert!(board.can_spawn(&i_piece(2, 9)));
    }

    #[test]
    fn test_fix_then_can_place_fails() {
        let mut board = Board::new(10, 20);
        let piece = i_piece(3, 7);
        board.fix(&piece);
        assert!(!board.can_place(&piece));
        for x in 3..7 {
            assert_eq!(
                board.block_at(x, 7),
                Some(Block::Fixed {
                    kind: PieceKind::T,
                    color: PieceColor::Purple
                })
            );
        }
    }

    #[test]
    fn test_fix_skips_cells_above_top() {
        let mut board = Board::new(10, 20);
        let vertical = piece_at(&[(0, -2), (0, -1), (0, 0), (0, 1)], 3, 0);
        board.fix(&vertical);
        assert!(!board.block_at(3, 0).unwrap().is_empty());
        assert!(!board.block_at(3, 1).unwrap().is_empty());
        let filled = board.rows().flatten().filter(|b| !b.is_empty()).count();
        assert_eq!(filled, 2);

        // A piece entirely above the top leaves the board untouched and stays placeable.
        let mut board = Board::new(10, 20);
        let above = i_piece(0, -3);
        board.fix(&above);
        assert_eq!(board, Board::new(10, 20));
        assert!(board.can_place(&above));
    }

    #[test]
    fn test_clear_lines_without_full_rows_is_noop() {
        let mut board = Board::from_rows(&[
            "....", //
            ".#..", //
            "##.#", //
        ]);
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_lines_shifts_rows_down() {
        let mut board = Board::from_rows(&[
            "....", //
            ".A..", //
            "####", //
            "B..C", //
            "####", //
        ]);
        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.height(), 5);
        assert_eq!(
            board.to_string(),
            ["....", "....", "....", ".A..", "B..C", ""].join("\n")
        );
    }

    #[test]
    fn test_clear_lines_after_filling_gap() {
        let mut board = Board::new(10, 20);
        for x in 1..10 {
            board.fill_block_at(
                x,
                19,
                Block::Fixed {
                    kind: PieceKind::S,
                    color: PieceColor::Green,
                },
            );
        }
        let marker = Block::Fixed {
            kind: PieceKind::Z,
            color: PieceColor::Red,
        };
        board.fill_block_at(3, 18, marker);

        // Vertical bar whose bottom cell plugs (0, 19).
        let bar = piece_at(&[(0, 0), (0, 1), (0, 2), (0, 3)], 0, 16);
        board.fix(&bar);
        assert_eq!(board.clear_lines(), 1);

        assert_eq!(board.height(), 20);
        assert!(board.rows().next().unwrap().iter().all(|b| b.is_empty()));
        assert_eq!(board.block_at(3, 19), Some(marker));
        for y in 17..20 {
            assert!(!board.block_at(0, y).unwrap().is_empty(), "bar at row {y}");
        }
        assert!(board.block_at(0, 16).unwrap().is_empty());
    }

    #[test]
    fn test_block_at_out_of_range() {
        let board = Board::new(4, 4);
        assert_eq!(board.block_at(4, 0), None);
        assert_eq!(board.block_at(0, 4), None);
    }
}
